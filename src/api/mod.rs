//! Dashboard API
//!
//! JSON client for the stock dashboard server.
//!
//! # Endpoints
//!
//! - `GET /api/tickers` - Tickers with holder counts
//! - `GET /api/tickers/{ts_code}/holders` - Latest top holders of a ticker
//! - `POST /api/update-data` - Trigger a server-side data refresh
//! - `GET /api/update-info` - Latest refresh recorded by the server
//! - `GET /api/holders` - Individual holders with ticker counts
//! - `GET /api/holders/{name}/tickers` - Holdings of one holder
//!
//! # Example
//!
//! ```rust,no_run
//! use stockdash::api::ApiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::with_base_url("http://localhost:5000");
//!     let tickers = client.get_tickers().await?.into_data()?;
//!     println!("{} tickers", tickers.len());
//!     Ok(())
//! }
//! ```

mod client;
pub mod dto;
pub mod error;

pub use client::{ApiClient, ClientConfig, RequestOptions};
pub use dto::{
    ApiResponse, Holder, HolderHolding, HolderSummary, HolderTickers, Pagination, Ticker,
    TickerDetail, TickerQuery, UpdateInfo, UpdateOutcome,
};
pub use error::{ClientError, ClientResult};

#[cfg(test)]
pub(crate) use client::tests::spawn_server;
