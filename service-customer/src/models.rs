use serde::{Deserialize, Serialize};
use shopkit_core::validation::{require_id, require_text, FieldViolation, Validate};
use shopkit_core::Entity;

/// A customer record.
///
/// `region_id` is a weak reference to a [`Region`]; the region's lifecycle is
/// independent of the customers pointing at it. `number_id` is the external
/// identifier and must stay unique across all customers.
///
/// All fields default on deserialization so that a missing field reaches the
/// explicit validator and is reported in the structured error payload instead
/// of failing JSON extraction.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub number_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub region_id: u64,
    #[serde(default = "created_state")]
    pub state: String,
}

impl Entity for Customer {
    fn id(&self) -> u64 {
        self.id
    }
    fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }
}

impl Validate for Customer {
    fn validate(&self) -> Vec<FieldViolation> {
        [
            require_text("numberId", &self.number_id),
            require_text("firstName", &self.first_name),
            require_text("lastName", &self.last_name),
            require_text("email", &self.email),
            require_id("regionId", self.region_id),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn created_state() -> String {
    "CREATED".to_string()
}

/// A geographic region. Referenced by customers by id; seeded at startup and
/// exposed read-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Region {
    pub id: u64,
    pub name: String,
}

impl Entity for Region {
    fn id(&self) -> u64 {
        self.id
    }
    fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }
}

/// Seed data for the region listing.
pub fn seed_regions() -> Vec<Region> {
    ["North", "South", "East", "West"]
        .iter()
        .enumerate()
        .map(|(idx, name)| Region {
            id: idx as u64 + 1,
            name: (*name).to_string(),
        })
        .collect()
}
