//! Update Data Action
//!
//! Shared by every dashboard page: asks the server to refresh its data,
//! reports progress in the update modal, and on success hands control back
//! to the page through an optional [`Refresh`] callback.
//!
//! ## Flow
//!
//! 1. Spinner in the status container, modal shown
//! 2. `POST /api/update-data`
//! 3. Success: status alert + toast, then after the refresh delay the modal
//!    is hidden and the page refreshes itself
//! 4. Failure: inline and toast error, the modal stays open

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::notify::{render_alert, show_error, show_loading, show_success, Severity};
use crate::page::{Page, SharedPage};

/// Toast shown after a successful update
pub const SUCCESS_MESSAGE: &str = "Data updated successfully";

/// Prefix of every failure message
pub const FAILURE_PREFIX: &str = "Failed to update data";

/// Page-specific reload, e.g. reloading the ticker list
#[async_trait]
pub trait Refresh: Send + Sync {
    async fn refresh(&self);
}

/// Element ids and timing of the update action
#[derive(Debug, Clone)]
pub struct UpdateSettings {
    pub modal_id: String,
    pub status_id: String,
    /// Delay between the success message and the page refresh
    pub refresh_delay: Duration,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            modal_id: "updateModal".to_string(),
            status_id: "updateStatus".to_string(),
            refresh_delay: Duration::from_secs(2),
        }
    }
}

/// How an update ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateResult {
    /// Server message
    Succeeded(String),
    /// Failure detail without the prefix
    Failed(String),
}

/// Result of [`UpdateAction::run`]
#[derive(Debug)]
pub struct UpdateReport {
    pub result: UpdateResult,
    /// Delayed modal hide and refresh. Detached unless awaited.
    pub follow_up: Option<JoinHandle<()>>,
}

impl UpdateReport {
    pub fn is_success(&self) -> bool {
        matches!(self.result, UpdateResult::Succeeded(_))
    }
}

/// The "update data" button behavior
pub struct UpdateAction<P> {
    client: ApiClient,
    page: SharedPage<P>,
    settings: UpdateSettings,
}

impl<P: Page + Send + 'static> UpdateAction<P> {
    pub fn new(client: ApiClient, page: SharedPage<P>) -> Self {
        Self::with_settings(client, page, UpdateSettings::default())
    }

    pub fn with_settings(client: ApiClient, page: SharedPage<P>, settings: UpdateSettings) -> Self {
        Self {
            client,
            page,
            settings,
        }
    }

    pub fn settings(&self) -> &UpdateSettings {
        &self.settings
    }

    /// Run the update. `refresh` is invoked once the modal has closed.
    pub async fn run(&self, refresh: Option<Arc<dyn Refresh>>) -> UpdateReport {
        {
            let mut page = self.page.lock().await;
            show_loading(&mut *page, &self.settings.status_id, Some("Updating data..."));
            if !page.show_modal(&self.settings.modal_id) {
                tracing::warn!(modal = %self.settings.modal_id, "Update modal not found");
            }
        }

        match self.request_update().await {
            Ok(message) => {
                tracing::info!(message = %message, "Data update succeeded");
                {
                    let mut page = self.page.lock().await;
                    page.set_content(
                        &self.settings.status_id,
                        render_alert(Severity::Success, &message),
                    );
                    show_success(&mut *page, SUCCESS_MESSAGE);
                }

                UpdateReport {
                    result: UpdateResult::Succeeded(message),
                    follow_up: Some(self.schedule_refresh(refresh)),
                }
            }
            Err(detail) => {
                tracing::warn!(error = %detail, "Data update failed");
                let text = format!("{}: {}", FAILURE_PREFIX, detail);
                {
                    let mut page = self.page.lock().await;
                    page.set_content(
                        &self.settings.status_id,
                        render_alert(Severity::Danger, &text),
                    );
                    show_error(&mut *page, &text, None);
                }

                UpdateReport {
                    result: UpdateResult::Failed(detail),
                    follow_up: None,
                }
            }
        }
    }

    async fn request_update(&self) -> Result<String, String> {
        let outcome = self.client.update_data().await.map_err(|e| e.to_string())?;

        if outcome.success {
            Ok(outcome.message.unwrap_or_default())
        } else {
            Err(outcome.error.unwrap_or_else(|| "Update failed".to_string()))
        }
    }

    fn schedule_refresh(&self, refresh: Option<Arc<dyn Refresh>>) -> JoinHandle<()> {
        let page = Arc::clone(&self.page);
        let modal_id = self.settings.modal_id.clone();
        let delay = self.settings.refresh_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            page.lock().await.hide_modal(&modal_id);

            if let Some(refresh) = refresh {
                tracing::debug!("Refreshing page after update");
                refresh.refresh().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::spawn_server;
    use crate::page::Document;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    struct CountingRefresh(AtomicUsize);

    #[async_trait]
    impl Refresh for CountingRefresh {
        async fn refresh(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn page() -> SharedPage<Document> {
        let mut doc = Document::new();
        doc.add_element("updateStatus");
        doc.add_modal("updateModal");
        Arc::new(Mutex::new(doc))
    }

    fn settings() -> UpdateSettings {
        UpdateSettings {
            refresh_delay: Duration::from_millis(50),
            ..UpdateSettings::default()
        }
    }

    async fn action(router: Router, page: SharedPage<Document>) -> UpdateAction<Document> {
        let base = spawn_server(router).await;
        UpdateAction::with_settings(ApiClient::with_base_url(base), page, settings())
    }

    #[tokio::test]
    async fn test_update_success_refreshes_after_delay() {
        let router = Router::new().route(
            "/api/update-data",
            post(|| async { Json(json!({"success": true, "message": "ok"})) }),
        );
        let page = page();
        let action = action(router, Arc::clone(&page)).await;
        let refresh = Arc::new(CountingRefresh(AtomicUsize::new(0)));

        let report = action.run(Some(refresh.clone() as Arc<dyn Refresh>)).await;
        assert_eq!(report.result, UpdateResult::Succeeded("ok".to_string()));

        {
            let mut doc = page.lock().await;
            let toasts: Vec<_> = doc.toasts().iter().collect();
            assert_eq!(toasts.len(), 1);
            assert_eq!(toasts[0].severity, Severity::Success);
            assert_eq!(toasts[0].message, SUCCESS_MESSAGE);
            assert_eq!(
                doc.content("updateStatus"),
                Some(r#"<div class="alert alert-success">ok</div>"#)
            );
            assert!(doc.is_modal_open("updateModal"));
        }
        assert_eq!(refresh.0.load(Ordering::SeqCst), 0);

        report.follow_up.unwrap().await.unwrap();

        assert!(!page.lock().await.is_modal_open("updateModal"));
        assert_eq!(refresh.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_success_without_refresh() {
        let router = Router::new().route(
            "/api/update-data",
            post(|| async { Json(json!({"success": true, "message": "done"})) }),
        );
        let page = page();
        let action = action(router, Arc::clone(&page)).await;

        let report = action.run(None).await;
        assert!(report.is_success());

        report.follow_up.unwrap().await.unwrap();
        assert!(!page.lock().await.is_modal_open("updateModal"));
    }

    #[tokio::test]
    async fn test_update_http_failure() {
        let router = Router::new().route(
            "/api/update-data",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"success": false}))) }),
        );
        let page = page();
        let action = action(router, Arc::clone(&page)).await;
        let refresh = Arc::new(CountingRefresh(AtomicUsize::new(0)));

        let report = action.run(Some(refresh.clone() as Arc<dyn Refresh>)).await;
        assert_eq!(
            report.result,
            UpdateResult::Failed("HTTP error! status: 500".to_string())
        );
        assert!(report.follow_up.is_none());

        tokio::time::sleep(Duration::from_millis(100)).await;

        let mut doc = page.lock().await;
        let status = doc.content("updateStatus").unwrap();
        assert!(status.contains("alert-danger"));
        assert!(status.contains("Failed to update data: HTTP error! status: 500"));

        let toasts: Vec<_> = doc.toasts().iter().collect();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].severity, Severity::Danger);
        assert_eq!(toasts[0].message, "Failed to update data: HTTP error! status: 500");

        assert!(doc.is_modal_open("updateModal"));
        assert_eq!(refresh.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_rejected_by_server() {
        let router = Router::new().route(
            "/api/update-data",
            post(|| async { Json(json!({"success": false, "error": "Tushare quota exceeded"})) }),
        );
        let page = page();
        let action = action(router, Arc::clone(&page)).await;

        let report = action.run(None).await;
        assert_eq!(
            report.result,
            UpdateResult::Failed("Tushare quota exceeded".to_string())
        );

        let doc = page.lock().await;
        assert!(doc
            .content("updateStatus")
            .unwrap()
            .contains("Failed to update data: Tushare quota exceeded"));
    }

    #[tokio::test]
    async fn test_update_rejected_without_detail() {
        let router = Router::new().route(
            "/api/update-data",
            post(|| async { Json(json!({"success": false})) }),
        );
        let action = action(router, page()).await;

        let report = action.run(None).await;
        assert_eq!(report.result, UpdateResult::Failed("Update failed".to_string()));
    }
}
