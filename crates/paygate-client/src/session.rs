//! Single-slot "current customer" cache.
//!
//! A [`CustomerSession`] remembers the customer returned by the most recent
//! customer-returning call:
//!
//! - `create_customer`, `retrieve_customer` and `update_customer` replace the
//!   slot on success (last write wins);
//! - `delete_customer` empties the slot when it held the deleted customer;
//! - a failed call leaves the slot untouched and returns the error.
//!
//! Methods take `&mut self`, so a session cannot be shared between concurrent
//! callers without a lock the caller chooses. Create one session per request.

use paygate_core::{CustomerId, NewCustomer, SourceId};

use crate::error::Result;
use crate::gateway::PaymentGateway;
use crate::provider::PaymentProvider;
use crate::types::{Customer, DeletedObject};

/// Gateway wrapper holding at most one current customer.
#[derive(Debug)]
pub struct CustomerSession<'g, P> {
    gateway: &'g PaymentGateway<P>,
    current: Option<Customer>,
}

impl<'g, P: PaymentProvider> CustomerSession<'g, P> {
    /// Create an empty session over a gateway.
    #[must_use]
    pub fn new(gateway: &'g PaymentGateway<P>) -> Self {
        Self {
            gateway,
            current: None,
        }
    }

    /// The cached customer, or `None` before any successful fetch.
    #[must_use]
    pub fn customer(&self) -> Option<&Customer> {
        self.current.as_ref()
    }

    /// Drop the cached customer.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Consume the session, returning the cached customer.
    #[must_use]
    pub fn into_customer(self) -> Option<Customer> {
        self.current
    }

    /// Create a customer and make it current.
    ///
    /// # Errors
    ///
    /// See [`PaymentGateway::create_customer`].
    pub async fn create_customer(&mut self, customer: &NewCustomer) -> Result<&Customer> {
        let created = self.gateway.create_customer(customer).await?;
        Ok(self.current.insert(created))
    }

    /// Retrieve a customer and make it current.
    ///
    /// # Errors
    ///
    /// See [`PaymentGateway::retrieve_customer`].
    pub async fn retrieve_customer(&mut self, customer_id: &CustomerId) -> Result<&Customer> {
        let customer = self.gateway.retrieve_customer(customer_id).await?;
        Ok(self.current.insert(customer))
    }

    /// Set a customer's default source and make the updated customer current.
    ///
    /// # Errors
    ///
    /// See [`PaymentGateway::update_customer`].
    pub async fn update_customer(
        &mut self,
        customer_id: &CustomerId,
        source_id: &SourceId,
    ) -> Result<&Customer> {
        let updated = self.gateway.update_customer(customer_id, source_id).await?;
        Ok(self.current.insert(updated))
    }

    /// Delete a customer, dropping it from the cache if it was current.
    ///
    /// # Errors
    ///
    /// See [`PaymentGateway::delete_customer`].
    pub async fn delete_customer(&mut self, customer_id: &CustomerId) -> Result<DeletedObject> {
        let deleted = self.gateway.delete_customer(customer_id).await?;
        if self.current.as_ref().is_some_and(|c| &c.id == customer_id) {
            self.current = None;
        }
        Ok(deleted)
    }
}
