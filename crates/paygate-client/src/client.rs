//! Stripe API client implementation.

use async_trait::async_trait;
use paygate_core::{CardDetails, CustomerId, NewCustomer, SourceId, TokenId};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::provider::PaymentProvider;
use crate::types::{
    Card, Customer, DeletedObject, PaymentSource, StripeErrorResponse, StripeList, Token,
};

/// Stripe API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl StripeClient {
    /// Create a new Stripe client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key().to_string(),
            base_url: format!("{}/v1", config.api_base.trim_end_matches('/')),
        })
    }

    /// The versioned API base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: std::result::Result<StripeErrorResponse, _> = response.json().await;

        match error_body {
            Ok(stripe_error) => Err(GatewayError::Api {
                status: status.as_u16(),
                error_type: stripe_error.error.error_type,
                message: stripe_error.error.message,
                code: stripe_error.error.code,
                param: stripe_error.error.param,
            }),
            Err(_) => Err(GatewayError::Api {
                status: status.as_u16(),
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
                param: None,
            }),
        }
    }
}

impl fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer> {
        tracing::debug!("POST /v1/customers");

        let response = self
            .client
            .post(format!("{}/customers", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&[("email", customer.email.as_str())])
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn retrieve_customer(&self, customer_id: &CustomerId) -> Result<Customer> {
        tracing::debug!(customer_id = %customer_id, "GET /v1/customers/{{id}}");

        let response = self
            .client
            .get(format!("{}/customers/{}", self.base_url, customer_id))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn update_default_source(
        &self,
        customer_id: &CustomerId,
        source_id: &SourceId,
    ) -> Result<Customer> {
        tracing::debug!(customer_id = %customer_id, "POST /v1/customers/{{id}}");

        let response = self
            .client
            .post(format!("{}/customers/{}", self.base_url, customer_id))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&[("default_source", source_id.as_str())])
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn delete_customer(&self, customer_id: &CustomerId) -> Result<DeletedObject> {
        tracing::debug!(customer_id = %customer_id, "DELETE /v1/customers/{{id}}");

        let response = self
            .client
            .delete(format!("{}/customers/{}", self.base_url, customer_id))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn list_sources(
        &self,
        customer_id: &CustomerId,
        object: &str,
        limit: u32,
        starting_after: Option<&SourceId>,
    ) -> Result<StripeList<PaymentSource>> {
        let limit = limit.clamp(1, 100).to_string();
        let mut query = vec![("object", object), ("limit", limit.as_str())];
        if let Some(cursor) = starting_after {
            query.push(("starting_after", cursor.as_str()));
        }

        tracing::debug!(
            customer_id = %customer_id,
            object = %object,
            starting_after = ?starting_after,
            "GET /v1/customers/{{id}}/sources"
        );

        let response = self
            .client
            .get(format!("{}/customers/{}/sources", self.base_url, customer_id))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .query(&query)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn create_source(&self, customer_id: &CustomerId, token_id: &TokenId) -> Result<Card> {
        tracing::debug!(customer_id = %customer_id, "POST /v1/customers/{{id}}/sources");

        let response = self
            .client
            .post(format!("{}/customers/{}/sources", self.base_url, customer_id))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&[("source", token_id.as_str())])
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn retrieve_source(
        &self,
        customer_id: &CustomerId,
        source_id: &SourceId,
    ) -> Result<PaymentSource> {
        tracing::debug!(
            customer_id = %customer_id,
            source_id = %source_id,
            "GET /v1/customers/{{id}}/sources/{{source}}"
        );

        let response = self
            .client
            .get(format!(
                "{}/customers/{}/sources/{}",
                self.base_url, customer_id, source_id
            ))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn delete_source(
        &self,
        customer_id: &CustomerId,
        source_id: &SourceId,
    ) -> Result<DeletedObject> {
        tracing::debug!(
            customer_id = %customer_id,
            source_id = %source_id,
            "DELETE /v1/customers/{{id}}/sources/{{source}}"
        );

        let response = self
            .client
            .delete(format!(
                "{}/customers/{}/sources/{}",
                self.base_url, customer_id, source_id
            ))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn create_card_token(&self, card: &CardDetails) -> Result<Token> {
        let mut params = vec![
            ("card[number]", card.number.clone()),
            ("card[exp_month]", card.exp_month.to_string()),
            ("card[exp_year]", card.exp_year.to_string()),
            ("card[cvc]", card.cvc.clone()),
        ];
        if let Some(name) = &card.name {
            params.push(("card[name]", name.clone()));
        }

        // Never log the PAN or CVC
        tracing::debug!(last4 = %card.last4(), "POST /v1/tokens");

        let response = self
            .client
            .post(format!("{}/tokens", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
