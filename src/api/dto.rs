//! Data Transfer Objects
//!
//! Response shapes of the dashboard API. Every endpoint wraps its payload in
//! an [`ApiResponse`] envelope.

use serde::{Deserialize, Serialize};

use super::error::ClientError;

// ============================================
// Envelope
// ============================================

/// Common response envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub pagination: Option<Pagination>,
    pub latest_update: Option<UpdateInfo>,
}

impl<T> ApiResponse<T> {
    /// The payload, or the server's error when the envelope reports failure
    pub fn into_data(self) -> Result<T, ClientError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(ClientError::Rejected("Response carried no data".to_string())),
            (false, _) => Err(ClientError::Rejected(
                self.error.unwrap_or_else(|| "Request failed".to_string()),
            )),
        }
    }
}

/// Paging information for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u64,
}

// ============================================
// Tickers
// ============================================

/// A tracked instrument with its holder count
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Ticker {
    pub ts_code: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub list_date: Option<String>,
    #[serde(default)]
    pub holder_count: u64,
}

/// A ticker with its latest top holders
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TickerDetail {
    pub ts_code: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub list_date: Option<String>,
    #[serde(default)]
    pub holders: Vec<Holder>,
    #[serde(default)]
    pub latest_holder_date: Option<String>,
}

/// One shareholder record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Holder {
    pub holder_name: String,
    #[serde(default)]
    pub ann_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub hold_amount: Option<f64>,
    #[serde(default)]
    pub hold_ratio: Option<f64>,
    #[serde(default)]
    pub holder_type: Option<String>,
    #[serde(default)]
    pub hold_change: Option<f64>,
}

/// Query for `GET /api/tickers`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub multiple_holders: bool,
    pub min_holders: Option<u32>,
}

impl TickerQuery {
    /// Query string including the leading `?`, or empty
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(format!("page={}", page));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(format!("per_page={}", per_page));
        }
        if self.multiple_holders {
            pairs.push("multiple_holders=true".to_string());
        }
        if let Some(min) = self.min_holders {
            pairs.push(format!("min_holders={}", min));
        }

        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}

// ============================================
// Holders
// ============================================

/// An individual holder and how many tickers they appear in
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HolderSummary {
    pub holder_name: String,
    #[serde(default)]
    pub ticker_count: u64,
}

/// Every holding of one holder
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HolderTickers {
    pub holder_name: String,
    #[serde(default)]
    pub tickers: Vec<HolderHolding>,
}

/// One ticker held by a holder, from their latest report
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HolderHolding {
    pub ts_code: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hold_amount: Option<f64>,
    #[serde(default)]
    pub hold_ratio: Option<f64>,
    #[serde(default)]
    pub hold_change: Option<f64>,
    #[serde(default)]
    pub end_date: Option<String>,
}

// ============================================
// Updates
// ============================================

/// Response of `POST /api/update-data`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateOutcome {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Latest data refresh recorded by the server
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateInfo {
    pub last_data_update: Option<String>,
    pub log_timestamp: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}
