//! Core types for paygate.
//!
//! This crate provides the types shared between the gateway client and the
//! code that calls it:
//!
//! - **Identifiers**: `CustomerId`, `SourceId`, `TokenId`
//! - **Requests**: `NewCustomer`, `CardDetails`
//!
//! Identifiers are opaque strings assigned by the payment provider. They are
//! only checked for being non-empty and URL-path safe; the provider remains
//! the authority on whether an id exists.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;
pub mod request;

pub use ids::{CustomerId, IdError, SourceId, TokenId};
pub use request::{CardDetails, NewCustomer};
