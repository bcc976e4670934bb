//! Inbound request records.
//!
//! These are the plain data records calling code (typically a web handler)
//! hands to the gateway. They derive `Deserialize` so they can be bound
//! directly from a request body.

use serde::Deserialize;
use std::fmt;

/// Data for registering a new customer with the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCustomer {
    /// Customer email address.
    pub email: String,
}

impl NewCustomer {
    /// Create a new customer request.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Raw card fields used to create a single-use token.
///
/// The card number and CVC are never printed: `Debug` shows only the last
/// four digits of the number.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CardDetails {
    /// Primary account number.
    #[serde(alias = "card_number")]
    pub number: String,
    /// Expiry month (1-12).
    pub exp_month: u32,
    /// Expiry year (four digits).
    pub exp_year: u32,
    /// Card verification code.
    pub cvc: String,
    /// Cardholder name.
    #[serde(default)]
    pub name: Option<String>,
}

impl CardDetails {
    /// Create card details without a cardholder name.
    #[must_use]
    pub fn new(
        number: impl Into<String>,
        exp_month: u32,
        exp_year: u32,
        cvc: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            exp_month,
            exp_year,
            cvc: cvc.into(),
            name: None,
        }
    }

    /// Set the cardholder name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Last four digits of the card number, for logging.
    #[must_use]
    pub fn last4(&self) -> &str {
        let digits = self.number.trim();
        let start = digits
            .char_indices()
            .rev()
            .nth(3)
            .map_or(0, |(idx, _)| idx);
        &digits[start..]
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &format_args!("**** {}", self.last4()))
            .field("exp_month", &self.exp_month)
            .field("exp_year", &self.exp_year)
            .field("cvc", &"***")
            .field("name", &self.name)
            .finish()
    }
}
