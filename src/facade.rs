//! High-level façade providing library-consumable entry points.
//!
//! `LinkSentinel` owns the scan session state: the classifier capability,
//! the bounded history, the current result, and the request-generation
//! guard. It performs no printing or styling — the binary (or any other
//! embedder) renders results however it likes.
//!
//! One scan is in flight at a time: `scan` holds `&mut self` across the
//! service call, so submissions are serialized structurally. The token
//! guard additionally protects embedders that drive `begin`/`commit`
//! themselves against committing a response that a newer request has
//! already superseded.

use crate::analyzer::{analyze, GeminiClassifier, UrlClassifier};
use crate::config::Config;
use crate::errors::Result;
use crate::history::{ScanGuard, ScanHistory, ScanToken};
use crate::report::{AnalysisResult, HistoryItem};
use crate::urlnorm::normalize;

/// A scanning session: classifier + bounded history + current result.
pub struct LinkSentinel {
    classifier: Box<dyn UrlClassifier>,
    history: ScanHistory,
    guard: ScanGuard,
    current: Option<HistoryItem>,
}

impl LinkSentinel {
    /// Build a session backed by the production classifier.
    pub fn new(config: &Config) -> Result<Self> {
        let classifier = GeminiClassifier::new(&config.api, &config.network)?;
        Ok(Self::with_classifier(Box::new(classifier)))
    }

    /// Build a session with a custom classifier (stubs in tests, alternate
    /// providers in embedders).
    pub fn with_classifier(classifier: Box<dyn UrlClassifier>) -> Self {
        Self {
            classifier,
            history: ScanHistory::new(),
            guard: ScanGuard::new(),
            current: None,
        }
    }

    /// Validate, analyze, and record one URL.
    ///
    /// Errors only on validation (`EmptyInput`, `MalformedUrl`) — those are
    /// surfaced inline and no service call is issued. Every service failure
    /// comes back as a recorded sentinel result instead.
    pub async fn scan(&mut self, input: &str) -> Result<HistoryItem> {
        let url = normalize(input)?;
        let token = self.begin();
        let result = analyze(self.classifier.as_ref(), &url).await;
        let item = self
            .commit(token, result)
            .expect("token issued by this scan is still current");
        Ok(item)
    }

    /// Issue a request token, superseding any earlier in-flight request.
    pub fn begin(&mut self) -> ScanToken {
        self.guard.begin()
    }

    /// Commit a completed analysis. Returns `None` (and records nothing) if
    /// the token was superseded by a newer request — a stale response never
    /// displaces the current result.
    pub fn commit(&mut self, token: ScanToken, result: AnalysisResult) -> Option<HistoryItem> {
        if !self.guard.is_current(token) {
            log::debug!("discarding stale analysis result for {}", result.url);
            return None;
        }
        let item = self.history.record(result);
        self.current = Some(item.clone());
        Some(item)
    }

    /// Session history, most-recent-first.
    pub fn history(&self) -> &ScanHistory {
        &self.history
    }

    /// The currently-displayed result, if any scan has committed.
    pub fn current(&self) -> Option<&HistoryItem> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ClassifierVerdict;
    use crate::errors::LinkSentinelError;
    use crate::history::HISTORY_CAPACITY;
    use crate::verdict::RiskLevel;
    use async_trait::async_trait;

    /// Stub returning a fixed verdict for every URL.
    struct StubClassifier {
        verdict: ClassifierVerdict,
    }

    #[async_trait]
    impl UrlClassifier for StubClassifier {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn classify(&self, _url: &str) -> Result<ClassifierVerdict> {
            Ok(self.verdict.clone())
        }
    }

    /// Stub that always fails like a dead network.
    struct OfflineClassifier;

    #[async_trait]
    impl UrlClassifier for OfflineClassifier {
        fn name(&self) -> &'static str {
            "offline"
        }

        async fn classify(&self, _url: &str) -> Result<ClassifierVerdict> {
            Err(LinkSentinelError::service_unavailable(
                "connect",
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
            ))
        }
    }

    fn typosquat_session() -> LinkSentinel {
        LinkSentinel::with_classifier(Box::new(StubClassifier {
            verdict: ClassifierVerdict {
                risk_score: 95.0,
                threat_type: "Fake Site".to_string(),
                explanation: "Misspelling of a well-known domain".to_string(),
                technical_flags: vec!["Misspelled domain".to_string()],
            },
        }))
    }

    #[tokio::test]
    async fn end_to_end_typosquat_scan() {
        let mut session = typosquat_session();

        let item = session.scan("g0ogle.com").await.unwrap();
        assert_eq!(item.result.url, "https://g0ogle.com");
        assert_eq!(item.result.risk_level, RiskLevel::Malicious);
        assert_eq!(item.result.risk_score, 95);

        // Recorded at the head of the history.
        let head = session.history().list().next().unwrap();
        assert_eq!(head.id, item.id);
        assert_eq!(session.current().unwrap().id, item.id);
    }

    #[tokio::test]
    async fn validation_errors_do_not_touch_history() {
        let mut session = typosquat_session();

        assert!(matches!(
            session.scan("   ").await,
            Err(LinkSentinelError::EmptyInput)
        ));
        assert!(matches!(
            session.scan("https://").await,
            Err(LinkSentinelError::MalformedUrl { .. })
        ));
        assert!(session.history().is_empty());
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn service_failure_is_recorded_as_sentinel() {
        let mut session = LinkSentinel::with_classifier(Box::new(OfflineClassifier));

        let item = session.scan("example.com").await.unwrap();
        assert_eq!(item.result.risk_level, RiskLevel::Unknown);
        assert_eq!(item.result.threat_type, "Error");
        assert_eq!(item.result.url, "https://example.com");
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn history_is_capped_across_scans() {
        let mut session = typosquat_session();
        for i in 0..(HISTORY_CAPACITY + 3) {
            session.scan(&format!("site{i}.test")).await.unwrap();
        }
        assert_eq!(session.history().len(), HISTORY_CAPACITY);
        assert_eq!(
            session.history().latest().unwrap().result.url,
            format!("https://site{}.test", HISTORY_CAPACITY + 2)
        );
    }

    #[tokio::test]
    async fn stale_completion_cannot_displace_newer_result() {
        let mut session = typosquat_session();

        let stale_token = session.begin();
        let fresh_token = session.begin();

        let fresh = session
            .commit(
                fresh_token,
                AnalysisResult::from_verdict("https://fresh.test", 10.0, "Safe", "", vec![]),
            )
            .expect("fresh token commits");

        let stale = session.commit(
            stale_token,
            AnalysisResult::from_verdict("https://stale.test", 99.0, "Phishing", "", vec![]),
        );

        assert!(stale.is_none());
        assert_eq!(session.current().unwrap().id, fresh.id);
        assert_eq!(session.history().len(), 1);
    }
}
