//! Popup state: status line, domain slot, rendered dossier, and the copy action.

use crate::backend::BackendClient;
use dossier_core::render::PLACEHOLDER_DASH;
use dossier_core::{render, resolve_domain, PopupSession, RenderedView};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const STATUS_DETECTING: &str = "Detecting domain...";
pub const STATUS_NO_DOMAIN: &str = "Could not detect domain. Open a normal https:// page.";
pub const STATUS_DONE: &str = "Done!";
pub const STATUS_FETCH_FAILED: &str = "Error fetching info. Is backend running?";

pub const COPY_LABEL: &str = "Copy JSON";
pub const COPIED_LABEL: &str = "Copied!";
const COPIED_FOR: Duration = Duration::from_millis(1500);

pub struct Popup {
    backend: BackendClient,
    session: Arc<PopupSession>,
    statuses: Vec<String>,
    domain_text: String,
    view: RenderedView,
    copied_at: Option<Instant>,
}

impl Popup {
    pub fn new(backend: BackendClient) -> Self {
        Self::with_session(backend, Arc::new(PopupSession::new()))
    }

    pub fn with_session(backend: BackendClient, session: Arc<PopupSession>) -> Self {
        Self {
            backend,
            session,
            statuses: Vec::new(),
            domain_text: PLACEHOLDER_DASH.to_string(),
            view: render(None),
            copied_at: None,
        }
    }

    /// Current status line.
    pub fn status(&self) -> &str {
        self.statuses.last().map(String::as_str).unwrap_or("")
    }

    /// Every status shown during the last action, oldest first.
    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    pub fn domain_text(&self) -> &str {
        &self.domain_text
    }

    pub fn view(&self) -> &RenderedView {
        &self.view
    }

    pub fn copy_enabled(&self) -> bool {
        self.session.can_export()
    }

    pub fn copy_label(&self) -> &'static str {
        match self.copied_at {
            Some(at) if at.elapsed() < COPIED_FOR => COPIED_LABEL,
            _ => COPY_LABEL,
        }
    }

    fn set_status(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!(status = %text, "popup status");
        self.statuses.push(text);
    }

    /// Fetch action: resolve the tab's domain, call the relay, and populate every slot.
    pub async fn fetch(&mut self, tab_url: Option<&str>) {
        self.statuses.clear();
        let session = Arc::clone(&self.session);
        let guard = match session.begin_fetch() {
            Ok(g) => g,
            Err(e) => {
                self.set_status(format!("Busy: {}.", e));
                return;
            }
        };
        self.set_status(STATUS_DETECTING);
        self.copied_at = None;

        let Some(domain) = resolve_domain(tab_url) else {
            self.set_status(STATUS_NO_DOMAIN);
            return;
        };

        self.domain_text = domain.to_string();
        self.set_status(format!("Calling backend for {}...", domain));

        match self.backend.fetch_dossier(&domain).await {
            Ok(dossier) => {
                tracing::debug!(domain = %domain, "got dossier");
                let stored = guard.complete(dossier).await;
                self.view = render(Some(&stored));
                self.set_status(STATUS_DONE);
            }
            Err(e) => {
                tracing::error!(domain = %domain, error = %e, "Error in popup fetch");
                self.set_status(STATUS_FETCH_FAILED);
            }
        }
    }

    /// Copy action: the last completed dossier as pretty JSON. `None` while copy is disabled.
    pub async fn copy(&mut self) -> Option<String> {
        let text = self.session.export().await.ok()?;
        match write_clipboard(&text) {
            Ok(()) => self.copied_at = Some(Instant::now()),
            Err(e) => tracing::error!(error = %e, "Clipboard error"),
        }
        Some(text)
    }
}

#[cfg(feature = "clipboard")]
fn write_clipboard(text: &str) -> Result<(), String> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
    clipboard.set_text(text.to_string()).map_err(|e| e.to_string())
}

#[cfg(not(feature = "clipboard"))]
fn write_clipboard(_text: &str) -> Result<(), String> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use dossier_core::{normalize, BadgeTone};
    use serde_json::Value;
    use std::collections::HashMap;

    async fn spawn_relay(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn acme_relay() -> Router {
        Router::new().route(
            "/api/startup-info",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                let name = if q.get("domain").map(String::as_str) == Some("example.com") {
                    "Acme"
                } else {
                    "Other"
                };
                let raw = format!(r#"{{"companyProfile":{{"companyName":"{}"}}}}"#, name);
                Json(serde_json::to_value(normalize(&raw)).unwrap())
            }),
        )
    }

    #[tokio::test]
    async fn fetch_populates_slots_and_enables_copy() {
        let base = spawn_relay(acme_relay()).await;
        let mut popup = Popup::new(BackendClient::new(&base).unwrap());
        assert!(!popup.copy_enabled());
        assert_eq!(popup.copy().await, None);

        popup.fetch(Some("https://www.example.com/about")).await;
        assert_eq!(
            popup.statuses(),
            [STATUS_DETECTING, "Calling backend for example.com...", STATUS_DONE]
        );
        assert_eq!(popup.domain_text(), "example.com");
        assert_eq!(popup.view().text("companyName"), Some("Acme"));
        assert_eq!(popup.view().text("fundingStage"), Some("N/A"));
        assert_eq!(popup.view().badge.tone, BadgeTone::Muted);
        assert!(popup.copy_enabled());

        let text = popup.copy().await.unwrap();
        let exported: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(exported["companyName"], "Acme");
        assert_eq!(exported["fundingStage"], Value::Null);
        assert_eq!(popup.copy_label(), COPIED_LABEL);
    }

    #[tokio::test]
    async fn unresolvable_tab_stops_before_the_backend() {
        let mut popup = Popup::new(BackendClient::new("http://127.0.0.1:9").unwrap());
        popup.fetch(Some("chrome://newtab")).await;
        assert_eq!(popup.status(), STATUS_NO_DOMAIN);
        assert_eq!(popup.domain_text(), "—");
        popup.fetch(None).await;
        assert_eq!(popup.status(), STATUS_NO_DOMAIN);
        assert!(!popup.copy_enabled());
    }

    #[tokio::test]
    async fn server_error_disables_copy() {
        let ok = spawn_relay(acme_relay()).await;
        let failing = spawn_relay(Router::new().route(
            "/api/startup-info",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;

        let session = Arc::new(PopupSession::new());
        let mut popup = Popup::with_session(BackendClient::new(&ok).unwrap(), Arc::clone(&session));
        popup.fetch(Some("https://example.com")).await;
        assert!(popup.copy_enabled());

        let mut popup = Popup::with_session(BackendClient::new(&failing).unwrap(), session);
        popup.fetch(Some("https://example.com")).await;
        assert_eq!(popup.status(), STATUS_FETCH_FAILED);
        assert!(!popup.copy_enabled());
        assert_eq!(popup.copy().await, None);
    }

    #[tokio::test]
    async fn shared_session_rejects_overlapping_fetch() {
        let session = Arc::new(PopupSession::new());
        let _held = session.begin_fetch().unwrap();
        let mut popup = Popup::with_session(BackendClient::new("http://127.0.0.1:9").unwrap(), Arc::clone(&session));
        popup.fetch(Some("https://example.com")).await;
        assert!(popup.status().starts_with("Busy"));
        assert_eq!(popup.domain_text(), "—");
    }
}
