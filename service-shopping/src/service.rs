use shopkit_core::{ensure_valid, Entity, Repository, ServiceError};
use tracing::{error, info, warn};

use crate::clients::{CustomerClient, StockClient};
use crate::models::{Invoice, InvoiceDetail, ItemDetail};

/// Checkout and invoice business rules.
///
/// Stock is owned by the product service; this service only ever asks the
/// owner to adjust it and fails the checkout when that ask fails.
#[derive(Clone)]
pub struct ShoppingService<R> {
    invoices: R,
    stock: StockClient,
    customers: CustomerClient,
}

impl<R: Repository<Invoice>> ShoppingService<R> {
    pub fn new(invoices: R, stock: StockClient, customers: CustomerClient) -> Self {
        Self {
            invoices,
            stock,
            customers,
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Invoice>, ServiceError> {
        Ok(self.invoices.find_all().await?)
    }

    pub async fn list_by_customer(&self, customer_id: u64) -> Result<Vec<Invoice>, ServiceError> {
        let invoices = self
            .invoices
            .find_where(|i| i.customer_id == customer_id)
            .await?;
        if invoices.is_empty() {
            error!(customer_id, "Invoices with customer id not found");
            return Err(ServiceError::NotFound(format!(
                "no invoices for customer {customer_id}"
            )));
        }
        Ok(invoices)
    }

    pub async fn get(&self, id: u64) -> Result<Invoice, ServiceError> {
        info!(id, "Fetching invoice");
        match self.invoices.find_by_id(id).await? {
            Some(invoice) => Ok(invoice),
            None => {
                error!(id, "Invoice not found");
                Err(ServiceError::NotFound(format!("invoice {id}")))
            }
        }
    }

    /// Checkout: reserve stock for every item at the owner, then persist.
    ///
    /// The invoice is persisted only after every adjustment succeeded, so a
    /// stored invoice always has its stock reserved. Any stock failure
    /// aborts the checkout and propagates; items adjusted before a
    /// mid-flight failure are logged for reconciliation — rolling them back
    /// would need an orchestration layer this system deliberately lacks.
    pub async fn create(&self, invoice: Invoice) -> Result<Invoice, ServiceError> {
        info!(number = %invoice.number, "Creating invoice");
        ensure_valid(&invoice)?;

        let mut adjusted: Vec<(u64, u32)> = Vec::new();
        for item in &invoice.items {
            match self.stock.adjust_stock(item.product_id, item.quantity).await {
                Ok(product) => {
                    info!(
                        product_id = item.product_id,
                        quantity = item.quantity,
                        remaining = product.stock,
                        "Reserved stock"
                    );
                    adjusted.push((item.product_id, item.quantity));
                }
                Err(err) => {
                    if !adjusted.is_empty() {
                        warn!(
                            ?adjusted,
                            %err,
                            "Checkout aborted after partial stock adjustment; reconciliation required"
                        );
                    }
                    return Err(err.into());
                }
            }
        }

        Ok(self.invoices.insert(invoice).await?)
    }

    /// Detail read: the invoice enriched with customer and product
    /// snapshots. Peer lookups that fail degrade to `None`.
    pub async fn detail(&self, id: u64) -> Result<InvoiceDetail, ServiceError> {
        let invoice = self.get(id).await?;

        let customer = match self.customers.get_customer(invoice.customer_id).await {
            Ok(customer) => Some(customer),
            Err(err) => {
                warn!(customer_id = invoice.customer_id, %err, "Could not enrich invoice with customer");
                None
            }
        };

        let mut items = Vec::with_capacity(invoice.items.len());
        for item in &invoice.items {
            let product = match self.stock.get_product(item.product_id).await {
                Ok(product) => Some(product),
                Err(err) => {
                    warn!(product_id = item.product_id, %err, "Could not enrich invoice item with product");
                    None
                }
            };
            items.push(ItemDetail {
                product_id: item.product_id,
                quantity: item.quantity,
                product,
            });
        }

        Ok(InvoiceDetail {
            invoice,
            customer,
            items,
        })
    }

    /// Update invoice fields. Stock is not re-adjusted here: reservations
    /// belong to checkout, not to later edits of the paperwork.
    pub async fn update(&self, id: u64, invoice: Invoice) -> Result<Invoice, ServiceError> {
        info!(id, "Updating invoice");
        match self.invoices.update(invoice.with_id(id)).await? {
            Some(updated) => Ok(updated),
            None => {
                error!(id, "Unable to update invoice: not found");
                Err(ServiceError::NotFound(format!("invoice {id}")))
            }
        }
    }

    pub async fn delete(&self, id: u64) -> Result<Invoice, ServiceError> {
        info!(id, "Fetching & deleting invoice");
        match self.invoices.delete(id).await? {
            Some(invoice) => Ok(invoice),
            None => {
                error!(id, "Unable to delete invoice: not found");
                Err(ServiceError::NotFound(format!("invoice {id}")))
            }
        }
    }
}
