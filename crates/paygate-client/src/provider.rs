//! Payment provider abstraction.

use async_trait::async_trait;
use paygate_core::{CardDetails, CustomerId, NewCustomer, SourceId, TokenId};

use crate::error::Result;
use crate::types::{Card, Customer, DeletedObject, PaymentSource, StripeList, Token};

/// Payment provider trait.
///
/// One method per remote endpoint, with no business logic. The gateway
/// composes these calls; [`crate::StripeClient`] implements them over HTTP and
/// tests substitute an in-memory double.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a customer.
    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer>;

    /// Retrieve a customer. Deleted customers are returned with `deleted` set.
    async fn retrieve_customer(&self, customer_id: &CustomerId) -> Result<Customer>;

    /// Set the customer's default payment source.
    async fn update_default_source(
        &self,
        customer_id: &CustomerId,
        source_id: &SourceId,
    ) -> Result<Customer>;

    /// Delete a customer.
    async fn delete_customer(&self, customer_id: &CustomerId) -> Result<DeletedObject>;

    /// List one page of the customer's sources of the given object type.
    async fn list_sources(
        &self,
        customer_id: &CustomerId,
        object: &str,
        limit: u32,
        starting_after: Option<&SourceId>,
    ) -> Result<StripeList<PaymentSource>>;

    /// Attach a card built from a single-use token to the customer.
    async fn create_source(&self, customer_id: &CustomerId, token_id: &TokenId) -> Result<Card>;

    /// Retrieve one of the customer's sources.
    async fn retrieve_source(
        &self,
        customer_id: &CustomerId,
        source_id: &SourceId,
    ) -> Result<PaymentSource>;

    /// Detach and delete one of the customer's sources.
    async fn delete_source(
        &self,
        customer_id: &CustomerId,
        source_id: &SourceId,
    ) -> Result<DeletedObject>;

    /// Create a single-use card token from raw card fields.
    async fn create_card_token(&self, card: &CardDetails) -> Result<Token>;
}
