//! Stripe API types.

use chrono::{DateTime, Utc};
use paygate_core::{CustomerId, SourceId, TokenId};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Object tag the provider uses for card sources.
pub const CARD_OBJECT: &str = "card";

/// Stripe customer object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Stripe customer ID.
    pub id: CustomerId,
    /// Customer email.
    #[serde(default)]
    pub email: Option<String>,
    /// Customer name.
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Default payment source used for charges.
    #[serde(default)]
    pub default_source: Option<SourceId>,
    /// Metadata attached to the customer.
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Created timestamp (Unix).
    #[serde(default)]
    pub created: i64,
    /// Set when the provider returns a deleted customer stub.
    #[serde(default)]
    pub deleted: bool,
}

impl Customer {
    /// Creation time, if the timestamp is representable.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created, 0)
    }
}

/// Stripe card object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Card ID (a source ID).
    pub id: SourceId,
    /// Card brand (Visa, `MasterCard`, ...).
    #[serde(default)]
    pub brand: String,
    /// Last four digits of the card number.
    #[serde(default)]
    pub last4: String,
    /// Expiry month.
    #[serde(default)]
    pub exp_month: u32,
    /// Expiry year.
    #[serde(default)]
    pub exp_year: u32,
    /// Funding type (credit, debit, prepaid, unknown).
    #[serde(default)]
    pub funding: Option<String>,
    /// Issuing country code.
    #[serde(default)]
    pub country: Option<String>,
    /// Fingerprint uniquely identifying the card number.
    #[serde(default)]
    pub fingerprint: Option<String>,
    /// Cardholder name.
    #[serde(default)]
    pub name: Option<String>,
    /// Customer the card belongs to.
    #[serde(default)]
    pub customer: Option<CustomerId>,
}

/// A payment source attached to a customer, tagged by its `object` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentSource {
    /// A card source.
    Card(Card),
    /// Any other source type (bank account, legacy source, ...).
    Other {
        /// Source ID, still needed as a pagination cursor.
        id: SourceId,
        /// The source's `object` tag.
        object: String,
    },
}

impl PaymentSource {
    /// ID of the source, whatever its type.
    #[must_use]
    pub fn id(&self) -> &SourceId {
        match self {
            Self::Card(card) => &card.id,
            Self::Other { id, .. } => id,
        }
    }

    /// Return the card if this source is one.
    #[must_use]
    pub fn into_card(self) -> Option<Card> {
        match self {
            Self::Card(card) => Some(card),
            Self::Other { .. } => None,
        }
    }
}

impl<'de> Deserialize<'de> for PaymentSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let object = value
            .get("object")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();

        if object == CARD_OBJECT {
            return serde_json::from_value(value)
                .map(Self::Card)
                .map_err(de::Error::custom);
        }

        let id = value
            .get("id")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| de::Error::missing_field("id"))?;
        Ok(Self::Other {
            id: SourceId::new(id).map_err(de::Error::custom)?,
            object,
        })
    }
}

/// Stripe single-use token object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Token {
    /// Token ID.
    pub id: TokenId,
    /// The card the token represents.
    #[serde(default)]
    pub card: Option<Card>,
    /// Created timestamp (Unix).
    #[serde(default)]
    pub created: i64,
    /// Whether the token has already been used.
    #[serde(default)]
    pub used: bool,
    /// Whether the token was created in live mode.
    #[serde(default)]
    pub livemode: bool,
}

/// Deletion confirmation returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedObject {
    /// ID of the deleted object.
    pub id: String,
    /// Object type of the deleted object.
    #[serde(default)]
    pub object: Option<String>,
    /// Always true for a successful deletion.
    #[serde(default)]
    pub deleted: bool,
}

/// Stripe list response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    /// Object type (always "list").
    #[serde(default)]
    pub object: String,
    /// Data items.
    pub data: Vec<T>,
    /// Whether there are more items.
    #[serde(default)]
    pub has_more: bool,
    /// URL for the list endpoint.
    #[serde(default)]
    pub url: Option<String>,
}

/// Stripe API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    /// Error details.
    pub error: StripeErrorDetail,
}

/// Stripe error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorDetail {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Parameter that caused the error.
    #[serde(default)]
    pub param: Option<String>,
}
