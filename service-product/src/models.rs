use serde::{Deserialize, Serialize};
use shopkit_core::validation::{require_id, require_text, FieldViolation, Validate};
use shopkit_core::Entity;

/// A product record. This service is the sole owner of `stock`; every other
/// service adjusts it through the stock endpoint, never by writing a copy.
///
/// Fields default on deserialization so missing input reaches the explicit
/// validator instead of failing JSON extraction.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub category_id: u64,
    #[serde(default = "created_state")]
    pub state: String,
}

impl Entity for Product {
    fn id(&self) -> u64 {
        self.id
    }
    fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }
}

impl Validate for Product {
    fn validate(&self) -> Vec<FieldViolation> {
        [
            require_text("name", &self.name),
            (self.price < 0.0).then(|| FieldViolation::new("price", "must not be negative")),
            require_id("categoryId", self.category_id),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn created_state() -> String {
    "CREATED".to_string()
}

/// A product category. Partition key for the product listing; seeded at
/// startup and exposed read-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

impl Entity for Category {
    fn id(&self) -> u64 {
        self.id
    }
    fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }
}

/// Seed data for the category listing.
pub fn seed_categories() -> Vec<Category> {
    ["Books", "Electronics", "Home"]
        .iter()
        .enumerate()
        .map(|(idx, name)| Category {
            id: idx as u64 + 1,
            name: (*name).to_string(),
        })
        .collect()
}

/// Catalog entries loaded by the service binary at startup.
pub fn seed_products() -> Vec<Product> {
    let entry = |name: &str, price: f64, stock: u32, category_id: u64| Product {
        id: 0,
        name: name.to_string(),
        description: String::new(),
        price,
        stock,
        category_id,
        state: created_state(),
    };
    vec![
        entry("Rust Programming Book", 39.99, 50, 1),
        entry("Ergonomic Keyboard", 149.99, 15, 2),
        entry("Monitor Stand", 79.99, 0, 3),
    ]
}
