//! Paygate Client.
//!
//! This crate forwards customer and payment-card operations to Stripe:
//!
//! - Customer create, retrieve, update (default source) and delete
//! - Card listing, creation from a token, and deletion
//! - Tokenization of raw card data
//!
//! Every operation returns a [`Result`]; failures are also logged through
//! `tracing`. An optional [`CustomerSession`] remembers the most recently
//! returned customer.
//!
//! # Example
//!
//! ```no_run
//! use paygate_client::{GatewayConfig, NewCustomer, PaymentGateway};
//!
//! # async fn example() -> Result<(), paygate_client::GatewayError> {
//! let config = GatewayConfig::from_env()?;
//! let gateway = PaymentGateway::new(&config)?;
//!
//! let mut session = gateway.session();
//! let customer = session.create_customer(&NewCustomer::new("a@b.com")).await?;
//! let customer_id = customer.id.clone();
//!
//! for card in gateway.list_cards(&customer_id).await? {
//!     println!("{} ending in {}", card.brand, card.last4);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
pub mod config;
mod error;
mod gateway;
mod provider;
mod session;
pub mod types;

pub use client::StripeClient;
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use gateway::PaymentGateway;
pub use paygate_core::{CardDetails, CustomerId, IdError, NewCustomer, SourceId, TokenId};
pub use provider::PaymentProvider;
pub use session::CustomerSession;
pub use types::*;
