//! Popup session: the last successful dossier and the one-fetch-at-a-time rule.
//!
//! Only a completed fetch replaces the stored record. Exports read an `Arc` snapshot, so a
//! later fetch never changes text that is already being copied. A fetch that starts while
//! another is in flight is rejected rather than raced.

use crate::dossier::CanonicalDossier;
use crate::error::SessionError;
use crate::render::export_json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct PopupSession {
    in_flight: AtomicBool,
    copy_enabled: AtomicBool,
    last: RwLock<Option<Arc<CanonicalDossier>>>,
}

impl PopupSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the session for one fetch. Copy stays disabled until the fetch completes.
    pub fn begin_fetch(&self) -> Result<FetchGuard<'_>, SessionError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SessionError::FetchInProgress)?;
        self.copy_enabled.store(false, Ordering::Release);
        Ok(FetchGuard {
            session: self,
            finished: false,
        })
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn can_export(&self) -> bool {
        self.copy_enabled.load(Ordering::Acquire)
    }

    /// The last completed record, if copy is currently enabled.
    pub async fn snapshot(&self) -> Option<Arc<CanonicalDossier>> {
        if !self.can_export() {
            return None;
        }
        self.last.read().await.clone()
    }

    /// Pretty JSON of the last completed record.
    pub async fn export(&self) -> Result<String, SessionError> {
        let snapshot = self.snapshot().await.ok_or(SessionError::NothingToExport)?;
        export_json(&snapshot).map_err(|e| SessionError::Serialize(e.to_string()))
    }
}

/// Exclusive right to finish the current fetch. Dropping it without `complete` counts as a
/// failed fetch: the session is released and copy stays disabled.
#[derive(Debug)]
pub struct FetchGuard<'a> {
    session: &'a PopupSession,
    finished: bool,
}

impl FetchGuard<'_> {
    /// Stores the record as the session's last result and re-enables copy.
    pub async fn complete(mut self, dossier: CanonicalDossier) -> Arc<CanonicalDossier> {
        let stored = Arc::new(dossier);
        *self.session.last.write().await = Some(Arc::clone(&stored));
        self.session.copy_enabled.store(true, Ordering::Release);
        self.finished = true;
        self.session.in_flight.store(false, Ordering::Release);
        stored
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.session.in_flight.store(false, Ordering::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;

    #[tokio::test]
    async fn export_unavailable_before_first_fetch() {
        let session = PopupSession::new();
        assert_eq!(session.export().await, Err(SessionError::NothingToExport));
        assert!(session.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn overlapping_fetch_is_rejected() {
        let session = PopupSession::new();
        let guard = session.begin_fetch().unwrap();
        assert!(session.is_fetching());
        assert_eq!(session.begin_fetch().unwrap_err(), SessionError::FetchInProgress);
        drop(guard);
        assert!(!session.is_fetching());
        assert!(session.begin_fetch().is_ok());
    }

    #[tokio::test]
    async fn completed_fetch_replaces_last_and_snapshot_is_stable() {
        let session = PopupSession::new();
        let first = normalize(r#"{"companyProfile":{"companyName":"Acme"}}"#);
        session.begin_fetch().unwrap().complete(first.clone()).await;

        let held = session.snapshot().await.unwrap();
        let exported = session.export().await.unwrap();
        assert!(exported.contains("\"Acme\""));

        let second = normalize(r#"{"companyProfile":{"companyName":"Globex"}}"#);
        session.begin_fetch().unwrap().complete(second).await;
        assert_eq!(*held, first);
        assert_eq!(session.snapshot().await.unwrap().text("companyName"), Some("Globex"));
    }

    #[tokio::test]
    async fn failed_fetch_disables_copy() {
        let session = PopupSession::new();
        session.begin_fetch().unwrap().complete(normalize("{}")).await;
        assert!(session.can_export());

        let guard = session.begin_fetch().unwrap();
        assert!(!session.can_export());
        drop(guard);
        assert_eq!(session.export().await, Err(SessionError::NothingToExport));
    }
}
