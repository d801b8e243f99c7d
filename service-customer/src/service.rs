use shopkit_core::validation::FieldViolation;
use shopkit_core::{
    ensure_valid, Entity, ErrorMessage, InMemoryRepository, Repository, ServiceError,
};
use tracing::{error, info};

use crate::models::{seed_regions, Customer, Region};

/// Business rules for the customer registry atop the record store.
#[derive(Clone)]
pub struct CustomerService<R> {
    customers: R,
    regions: InMemoryRepository<Region>,
}

impl<R: Repository<Customer>> CustomerService<R> {
    pub fn new(customers: R) -> Self {
        Self {
            customers,
            regions: InMemoryRepository::seeded(seed_regions()),
        }
    }

    /// Unfiltered listing. An empty result is a valid outcome; the boundary
    /// reports it as "no content", not "not found".
    pub async fn list_all(&self) -> Result<Vec<Customer>, ServiceError> {
        Ok(self.customers.find_all().await?)
    }

    /// Region-scoped listing. Zero matches is reported as not found since the
    /// region id itself is unverified here.
    pub async fn list_by_region(&self, region_id: u64) -> Result<Vec<Customer>, ServiceError> {
        let customers = self
            .customers
            .find_where(|c| c.region_id == region_id)
            .await?;
        if customers.is_empty() {
            error!(region_id, "Customers with region id not found");
            return Err(ServiceError::NotFound(format!(
                "no customers in region {region_id}"
            )));
        }
        Ok(customers)
    }

    pub async fn get(&self, id: u64) -> Result<Customer, ServiceError> {
        info!(id, "Fetching customer");
        match self.customers.find_by_id(id).await? {
            Some(customer) => Ok(customer),
            None => {
                error!(id, "Customer not found");
                Err(ServiceError::NotFound(format!("customer {id}")))
            }
        }
    }

    pub async fn create(&self, customer: Customer) -> Result<Customer, ServiceError> {
        info!(number_id = %customer.number_id, "Creating customer");
        ensure_valid(&customer)?;
        let duplicates = self
            .customers
            .find_where(|c| c.number_id == customer.number_id)
            .await?;
        if !duplicates.is_empty() {
            return Err(ServiceError::Validation(ErrorMessage::validation(vec![
                FieldViolation::new("numberId", "must be unique"),
            ])));
        }
        Ok(self.customers.insert(customer).await?)
    }

    /// Update an existing customer. The path id is authoritative: any id in
    /// the body is overwritten before the write, so one record cannot be
    /// redirected onto another.
    pub async fn update(&self, id: u64, customer: Customer) -> Result<Customer, ServiceError> {
        info!(id, "Updating customer");
        match self.customers.update(customer.with_id(id)).await? {
            Some(updated) => Ok(updated),
            None => {
                error!(id, "Unable to update customer: not found");
                Err(ServiceError::NotFound(format!("customer {id}")))
            }
        }
    }

    /// Read-then-delete; the removed record is returned for confirmation.
    pub async fn delete(&self, id: u64) -> Result<Customer, ServiceError> {
        info!(id, "Fetching & deleting customer");
        match self.customers.delete(id).await? {
            Some(customer) => Ok(customer),
            None => {
                error!(id, "Unable to delete customer: not found");
                Err(ServiceError::NotFound(format!("customer {id}")))
            }
        }
    }

    pub async fn regions(&self) -> Result<Vec<Region>, ServiceError> {
        Ok(self.regions.find_all().await?)
    }
}
