//! Customer and card operations against the payment provider.
//!
//! Every operation returns its failure to the caller. Failures are also
//! logged once, at the operation boundary, with the provider's status and
//! error code.

use paygate_core::{CardDetails, CustomerId, NewCustomer, SourceId, TokenId};

use crate::client::StripeClient;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::provider::PaymentProvider;
use crate::session::CustomerSession;
use crate::types::{Card, Customer, DeletedObject, PaymentSource, CARD_OBJECT};

/// Page size used when listing sources.
const LIST_PAGE_SIZE: u32 = 100;

/// Payment gateway holding a configured provider.
///
/// The gateway itself is stateless. Callers that want a "current customer"
/// slot use [`PaymentGateway::session`].
#[derive(Debug, Clone)]
pub struct PaymentGateway<P = StripeClient> {
    provider: P,
}

impl PaymentGateway<StripeClient> {
    /// Create a gateway talking to Stripe.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if the configuration is invalid.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let provider = StripeClient::new(config)?;
        tracing::info!(base_url = %provider.base_url(), "Payment gateway configured");
        Ok(Self { provider })
    }
}

impl<P: PaymentProvider> PaymentGateway<P> {
    /// Create a gateway over any provider implementation.
    #[must_use]
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    /// The underlying provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Start a session that remembers the most recently returned customer.
    #[must_use]
    pub fn session(&self) -> CustomerSession<'_, P> {
        CustomerSession::new(self)
    }

    /// Register a customer with the provider.
    ///
    /// # Errors
    ///
    /// Returns the provider error if the customer could not be created.
    pub async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer> {
        let created = self
            .provider
            .create_customer(customer)
            .await
            .map_err(|e| failed("create_customer", None, e))?;

        tracing::info!(customer_id = %created.id, "Customer created");
        Ok(created)
    }

    /// Retrieve a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CustomerDeleted`] if the customer has been
    /// deleted, or the provider error if retrieval failed.
    pub async fn retrieve_customer(&self, customer_id: &CustomerId) -> Result<Customer> {
        self.fetch_customer(customer_id)
            .await
            .map_err(|e| failed("retrieve_customer", Some(customer_id), e))
    }

    /// Set the customer's default payment source.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer cannot be retrieved or updated.
    pub async fn update_customer(
        &self,
        customer_id: &CustomerId,
        source_id: &SourceId,
    ) -> Result<Customer> {
        let updated = self
            .set_default_source(customer_id, source_id)
            .await
            .map_err(|e| failed("update_customer", Some(customer_id), e))?;

        tracing::info!(
            customer_id = %customer_id,
            source_id = %source_id,
            "Default source updated"
        );
        Ok(updated)
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer cannot be retrieved or deleted.
    pub async fn delete_customer(&self, customer_id: &CustomerId) -> Result<DeletedObject> {
        let deleted = self
            .remove_customer(customer_id)
            .await
            .map_err(|e| failed("delete_customer", Some(customer_id), e))?;

        tracing::info!(customer_id = %customer_id, "Customer deleted");
        Ok(deleted)
    }

    /// List all cards attached to a customer, in provider order.
    ///
    /// Pages through the full source list. Sources that are not cards are
    /// dropped even if the provider returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer cannot be retrieved or any page fails.
    pub async fn list_cards(&self, customer_id: &CustomerId) -> Result<Vec<Card>> {
        self.collect_cards(customer_id)
            .await
            .map_err(|e| failed("list_cards", Some(customer_id), e))
    }

    /// Tokenize raw card data and attach the resulting card to a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if tokenization or card creation fails. No card is
    /// created when tokenization fails.
    pub async fn create_card_token(
        &self,
        customer_id: &CustomerId,
        card: &CardDetails,
    ) -> Result<Card> {
        let token = self
            .provider
            .create_card_token(card)
            .await
            .map_err(|e| failed("create_card_token", Some(customer_id), e))?;

        tracing::debug!(token_id = %token.id, last4 = %card.last4(), "Card token created");
        self.create_card(customer_id, &token.id).await
    }

    /// Attach a card built from a single-use token to a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer cannot be retrieved or the card
    /// cannot be created.
    pub async fn create_card(&self, customer_id: &CustomerId, token_id: &TokenId) -> Result<Card> {
        let card = self
            .attach_card(customer_id, token_id)
            .await
            .map_err(|e| failed("create_card", Some(customer_id), e))?;

        tracing::info!(customer_id = %customer_id, card_id = %card.id, "Card created");
        Ok(card)
    }

    /// Delete one of a customer's cards.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotACard`] if the source is not a card, or an
    /// error if the customer or card cannot be retrieved or deleted.
    pub async fn delete_card(
        &self,
        customer_id: &CustomerId,
        card_id: &SourceId,
    ) -> Result<DeletedObject> {
        let deleted = self
            .remove_card(customer_id, card_id)
            .await
            .map_err(|e| failed("delete_card", Some(customer_id), e))?;

        tracing::info!(customer_id = %customer_id, card_id = %card_id, "Card deleted");
        Ok(deleted)
    }

    async fn fetch_customer(&self, customer_id: &CustomerId) -> Result<Customer> {
        let customer = self.provider.retrieve_customer(customer_id).await?;
        if customer.deleted {
            return Err(GatewayError::CustomerDeleted {
                customer_id: customer_id.clone(),
            });
        }
        Ok(customer)
    }

    async fn set_default_source(
        &self,
        customer_id: &CustomerId,
        source_id: &SourceId,
    ) -> Result<Customer> {
        self.fetch_customer(customer_id).await?;
        self.provider
            .update_default_source(customer_id, source_id)
            .await
    }

    async fn remove_customer(&self, customer_id: &CustomerId) -> Result<DeletedObject> {
        self.fetch_customer(customer_id).await?;
        self.provider.delete_customer(customer_id).await
    }

    async fn attach_card(&self, customer_id: &CustomerId, token_id: &TokenId) -> Result<Card> {
        self.fetch_customer(customer_id).await?;
        self.provider.create_source(customer_id, token_id).await
    }

    async fn remove_card(
        &self,
        customer_id: &CustomerId,
        card_id: &SourceId,
    ) -> Result<DeletedObject> {
        self.fetch_customer(customer_id).await?;
        match self.provider.retrieve_source(customer_id, card_id).await? {
            PaymentSource::Card(_) => self.provider.delete_source(customer_id, card_id).await,
            PaymentSource::Other { .. } => Err(GatewayError::NotACard {
                source_id: card_id.clone(),
            }),
        }
    }

    async fn collect_cards(&self, customer_id: &CustomerId) -> Result<Vec<Card>> {
        self.fetch_customer(customer_id).await?;

        let mut cards = Vec::new();
        let mut cursor: Option<SourceId> = None;

        loop {
            let page = self
                .provider
                .list_sources(customer_id, CARD_OBJECT, LIST_PAGE_SIZE, cursor.as_ref())
                .await?;

            // The cursor is the id of the last entry on the page, card or not
            let last = page.data.last().map(|source| source.id().clone());
            cards.extend(page.data.into_iter().filter_map(PaymentSource::into_card));

            match (page.has_more, last) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        Ok(cards)
    }
}

/// Log a failed operation and hand the error back.
fn failed(
    operation: &'static str,
    customer_id: Option<&CustomerId>,
    error: GatewayError,
) -> GatewayError {
    tracing::error!(
        operation,
        customer_id = ?customer_id.map(CustomerId::as_str),
        status = ?error.status(),
        code = ?error.code(),
        error = %error,
        "Payment gateway operation failed"
    );
    error
}
