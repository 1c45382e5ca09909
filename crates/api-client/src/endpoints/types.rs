//! Request parameters and response helpers shared by the endpoint groups

use crate::response::JsonPayload;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Similarity threshold used when the caller has no preference
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Currencies accepted by the pricing and quoting endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US dollar
    #[default]
    Usd,
    /// Euro
    Eur,
    /// Pound sterling
    Gbp,
}

/// Lifecycle of an asynchronous quote request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteState {
    /// Queued, not started
    Pending = 10,
    /// Being priced
    Running = 20,
    /// Finished, quote available
    Done = 30,
    /// Finished without a quote
    Error = 40,
}

impl QuoteState {
    /// State for the numeric code the API reports
    #[must_use]
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            10 => Some(Self::Pending),
            20 => Some(Self::Running),
            30 => Some(Self::Done),
            40 => Some(Self::Error),
            _ => None,
        }
    }

    /// Numeric code
    #[must_use]
    pub fn code(self) -> u64 {
        self as u64
    }

    /// Whether polling can stop
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

impl fmt::Display for QuoteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Done => "done",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

impl JsonPayload {
    /// Quote state from a quote status response (`state` field)
    #[must_use]
    pub fn quote_state(&self) -> Option<QuoteState> {
        self.response
            .get("state")
            .and_then(serde_json::Value::as_u64)
            .and_then(QuoteState::from_code)
    }
}

/// Export formats for a finished quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteFileType {
    /// PDF document
    Pdf,
    /// Excel workbook
    #[default]
    Excel,
}

impl QuoteFileType {
    /// Path segment for this format
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "excel",
        }
    }
}

impl fmt::Display for QuoteFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional parameters of a quote request
///
/// Unset fields are left out of the request body so the server (or the
/// selected scheme) supplies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteOptions {
    /// Customer email; defaults server-side to the token owner's
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// Customer full name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Quote currency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    /// Predefined quote request scheme
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// Amount per compound in mg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
    /// Smallest acceptable amount per compound in mg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<u32>,
    /// Upper bound for the total price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    /// Target volume per compound in µl
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_volume: Option<f64>,
    /// Target concentration in mM
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_cc: Option<f64>,
    /// Maximum delivery time in days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<u32>,
    /// Minimum purity in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purity: Option<u32>,
}

impl QuoteOptions {
    /// Builder-style method to set the customer email
    #[must_use]
    pub fn with_customer_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self
    }

    /// Builder-style method to set the customer name
    #[must_use]
    pub fn with_customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    /// Builder-style method to set the currency
    #[must_use]
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Builder-style method to set the scheme
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Builder-style method to set the amount per compound
    #[must_use]
    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Builder-style method to set the price cap
    #[must_use]
    pub fn with_max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    /// Builder-style method to set the delivery time
    #[must_use]
    pub fn with_delivery_time(mut self, days: u32) -> Self {
        self.delivery_time = Some(days);
        self
    }
}
