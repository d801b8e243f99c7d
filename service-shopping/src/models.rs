use serde::{Deserialize, Serialize};
use shopkit_core::validation::{require_id, require_positive, require_text, FieldViolation, Validate};
use shopkit_core::Entity;

/// An invoice. `customer_id` and the item `product_id`s are by-id references
/// to records owned by the peer services — never cached copies treated as
/// authoritative.
///
/// Fields default on deserialization so missing input reaches the explicit
/// validator instead of failing JSON extraction.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub customer_id: u64,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    #[serde(default = "created_state")]
    pub state: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    #[serde(default)]
    pub product_id: u64,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: f64,
}

impl Entity for Invoice {
    fn id(&self) -> u64 {
        self.id
    }
    fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }
}

impl Validate for Invoice {
    fn validate(&self) -> Vec<FieldViolation> {
        let mut violations: Vec<FieldViolation> = [
            require_text("number", &self.number),
            require_id("customerId", self.customer_id),
            self.items
                .is_empty()
                .then(|| FieldViolation::new("items", "must contain at least one item")),
        ]
        .into_iter()
        .flatten()
        .collect();

        for (idx, item) in self.items.iter().enumerate() {
            violations.extend(require_id(
                &format!("items[{idx}].productId"),
                item.product_id,
            ));
            violations.extend(require_positive(
                &format!("items[{idx}].quantity"),
                item.quantity,
            ));
        }
        violations
    }
}

fn created_state() -> String {
    "CREATED".to_string()
}

/// Snapshot of a customer owned by the customer service.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: u64,
    pub number_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub region_id: u64,
}

/// Snapshot of a product owned by the product service.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub stock: u32,
}

/// Invoice enriched with peer snapshots for a detail read. Lookup failures
/// degrade to `None` — the read never fails because a peer is down.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    pub invoice: Invoice,
    pub customer: Option<Customer>,
    pub items: Vec<ItemDetail>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    pub product_id: u64,
    pub quantity: u32,
    pub product: Option<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_invoice_reports_header_fields() {
        let invoice: Invoice = serde_json::from_str("{}").unwrap();
        let violations = invoice.validate();
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["number", "customerId", "items"]);
    }

    #[test]
    fn zero_quantity_item_is_reported_with_its_index() {
        let invoice: Invoice = serde_json::from_str(
            r#"{
                "number": "INV-1",
                "customerId": 1,
                "items": [
                    { "productId": 1, "quantity": 2, "price": 5.0 },
                    { "productId": 2, "quantity": 0, "price": 5.0 }
                ]
            }"#,
        )
        .unwrap();
        let violations = invoice.validate();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "items[1].quantity");
    }
}
