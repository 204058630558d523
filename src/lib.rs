//! # Stockdash
//!
//! Presentation helpers and API client for a stock holder dashboard.
//!
//! ## Modules
//!
//! - [`format`]: Number and date display formatting
//! - [`notify`]: Toasts, inline errors and loading states
//! - [`page`]: Rendering targets and the in-memory [`Document`]
//! - [`api`]: JSON client for the dashboard server
//! - [`update`]: The shared "update data" action
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stockdash::{ApiClient, Document, UpdateAction};
//! use tokio::sync::Mutex;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut doc = Document::new();
//!     doc.add_element("updateStatus");
//!     doc.add_modal("updateModal");
//!     let page = Arc::new(Mutex::new(doc));
//!
//!     let client = ApiClient::with_base_url("http://localhost:5000");
//!     let report = UpdateAction::new(client, Arc::clone(&page)).run(None).await;
//!
//!     if let Some(follow_up) = report.follow_up {
//!         let _ = follow_up.await;
//!     }
//!     println!("{}", page.lock().await.render_toasts());
//! }
//! ```

pub mod api;
pub mod config;
pub mod format;
pub mod notify;
pub mod page;
pub mod update;

pub use api::{ApiClient, ApiResponse, ClientConfig, ClientError, RequestOptions};
pub use config::{Config, ConfigError, LoadedConfig, LoggingConfig};
pub use format::{format_date, format_date_time, format_number};
pub use notify::{
    hide_loading, show_error, show_loading, show_success, show_toast, Severity, Toast, ToastId,
};
pub use page::{init_affordances, Affordance, Document, Page, SharedPage};
pub use update::{Refresh, UpdateAction, UpdateReport, UpdateResult, UpdateSettings};
