//! Common test utilities for paygate integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use paygate_client::{
    Card, CardDetails, Customer, CustomerId, DeletedObject, GatewayError, NewCustomer,
    PaymentProvider, PaymentSource, Result, SourceId, StripeList, Token, TokenId,
};

/// In-memory stand-in for the provider, with Stripe-like behavior:
/// ids are prefixed, tokens are single use, missing objects are 404s.
#[derive(Default)]
pub struct InMemoryProvider {
    state: Mutex<State>,
    next_id: AtomicUsize,
    /// When set, the next customer retrieval fails like a dropped connection.
    pub fail_next_retrieve: AtomicBool,
}

#[derive(Default)]
struct State {
    customers: HashMap<String, Customer>,
    sources: HashMap<String, Vec<PaymentSource>>,
    tokens: HashMap<String, Card>,
}

impl InMemoryProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Attach a non-card source (a bank account) to a customer.
    pub fn add_bank_account(&self, customer_id: &CustomerId) -> SourceId {
        let id = SourceId::new(self.next("ba")).expect("valid id");
        self.state
            .lock()
            .unwrap()
            .sources
            .entry(customer_id.to_string())
            .or_default()
            .push(PaymentSource::Other {
                id: id.clone(),
                object: "bank_account".into(),
            });
        id
    }

    /// Card ids currently attached to a customer.
    pub fn card_ids(&self, customer_id: &CustomerId) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .sources
            .get(customer_id.as_str())
            .map(|sources| {
                sources
                    .iter()
                    .filter_map(|s| match s {
                        PaymentSource::Card(card) => Some(card.id.to_string()),
                        PaymentSource::Other { .. } => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub fn not_found(kind: &str, id: &str) -> GatewayError {
    GatewayError::Api {
        status: 404,
        error_type: "invalid_request_error".into(),
        message: format!("No such {kind}: '{id}'"),
        code: Some("resource_missing".into()),
        param: Some("id".into()),
    }
}

#[async_trait]
impl PaymentProvider for InMemoryProvider {
    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer> {
        let id = CustomerId::new(self.next("cus"))?;
        let created = Customer {
            id: id.clone(),
            email: Some(customer.email.clone()),
            name: None,
            description: None,
            default_source: None,
            metadata: serde_json::json!({}),
            created: 1_700_000_000,
            deleted: false,
        };
        self.state
            .lock()
            .unwrap()
            .customers
            .insert(id.to_string(), created.clone());
        Ok(created)
    }

    async fn retrieve_customer(&self, customer_id: &CustomerId) -> Result<Customer> {
        if self.fail_next_retrieve.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::Api {
                status: 503,
                error_type: "api_error".into(),
                message: "connection reset".into(),
                code: None,
                param: None,
            });
        }
        self.state
            .lock()
            .unwrap()
            .customers
            .get(customer_id.as_str())
            .cloned()
            .ok_or_else(|| not_found("customer", customer_id.as_str()))
    }

    async fn update_default_source(
        &self,
        customer_id: &CustomerId,
        source_id: &SourceId,
    ) -> Result<Customer> {
        let mut state = self.state.lock().unwrap();
        let customer = state
            .customers
            .get_mut(customer_id.as_str())
            .ok_or_else(|| not_found("customer", customer_id.as_str()))?;
        customer.default_source = Some(source_id.clone());
        Ok(customer.clone())
    }

    async fn delete_customer(&self, customer_id: &CustomerId) -> Result<DeletedObject> {
        let mut state = self.state.lock().unwrap();
        let customer = state
            .customers
            .get_mut(customer_id.as_str())
            .ok_or_else(|| not_found("customer", customer_id.as_str()))?;
        // Stripe keeps a deleted stub that can still be retrieved
        customer.deleted = true;
        state.sources.remove(customer_id.as_str());
        Ok(DeletedObject {
            id: customer_id.to_string(),
            object: Some("customer".into()),
            deleted: true,
        })
    }

    async fn list_sources(
        &self,
        customer_id: &CustomerId,
        _object: &str,
        limit: u32,
        starting_after: Option<&SourceId>,
    ) -> Result<StripeList<PaymentSource>> {
        let state = self.state.lock().unwrap();
        let sources = state
            .sources
            .get(customer_id.as_str())
            .cloned()
            .unwrap_or_default();

        // Deliberately ignores the object filter to exercise client-side filtering
        let start = match starting_after {
            Some(cursor) => sources
                .iter()
                .position(|s| s.id() == cursor)
                .map_or(sources.len(), |idx| idx + 1),
            None => 0,
        };
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let page: Vec<PaymentSource> = sources.iter().skip(start).take(limit).cloned().collect();
        let has_more = start + page.len() < sources.len();

        Ok(StripeList {
            object: "list".into(),
            data: page,
            has_more,
            url: Some(format!("/v1/customers/{customer_id}/sources")),
        })
    }

    async fn create_source(&self, customer_id: &CustomerId, token_id: &TokenId) -> Result<Card> {
        let mut state = self.state.lock().unwrap();
        if !state.customers.contains_key(customer_id.as_str()) {
            return Err(not_found("customer", customer_id.as_str()));
        }
        let mut card = state
            .tokens
            .remove(token_id.as_str())
            .ok_or_else(|| not_found("token", token_id.as_str()))?;
        card.customer = Some(customer_id.clone());
        state
            .sources
            .entry(customer_id.to_string())
            .or_default()
            .push(PaymentSource::Card(card.clone()));
        Ok(card)
    }

    async fn retrieve_source(
        &self,
        customer_id: &CustomerId,
        source_id: &SourceId,
    ) -> Result<PaymentSource> {
        let state = self.state.lock().unwrap();
        state
            .sources
            .get(customer_id.as_str())
            .and_then(|sources| {
                sources
                    .iter()
                    .find(|s| s.id() == source_id)
                    .cloned()
            })
            .ok_or_else(|| not_found("source", source_id.as_str()))
    }

    async fn delete_source(
        &self,
        customer_id: &CustomerId,
        source_id: &SourceId,
    ) -> Result<DeletedObject> {
        let mut state = self.state.lock().unwrap();
        let sources = state
            .sources
            .get_mut(customer_id.as_str())
            .ok_or_else(|| not_found("source", source_id.as_str()))?;
        let before = sources.len();
        sources.retain(|s| s.id() != source_id);
        if sources.len() == before {
            return Err(not_found("source", source_id.as_str()));
        }
        Ok(DeletedObject {
            id: source_id.to_string(),
            object: Some("card".into()),
            deleted: true,
        })
    }

    async fn create_card_token(&self, card: &CardDetails) -> Result<Token> {
        let token_id = TokenId::new(self.next("tok"))?;
        let stored = Card {
            id: SourceId::new(self.next("card"))?,
            brand: "Visa".into(),
            last4: card.last4().to_string(),
            exp_month: card.exp_month,
            exp_year: card.exp_year,
            funding: Some("credit".into()),
            country: Some("US".into()),
            fingerprint: None,
            name: card.name.clone(),
            customer: None,
        };
        self.state
            .lock()
            .unwrap()
            .tokens
            .insert(token_id.to_string(), stored.clone());
        Ok(Token {
            id: token_id,
            card: Some(stored),
            created: 1_700_000_000,
            used: false,
            livemode: false,
        })
    }
}
