//! Test utilities for handler testing.
//!
//! [`SpyNavigator`] stands in for the navigation capability: it returns a
//! scripted outcome and records how it was called. The fixture road network
//! is also exposed for end-to-end tests against the real engine.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};

use async_trait::async_trait;

use navigator_lib::{
    Coordinate, Error, ErrorCode, Maneuver, NavigationContext, NavigationFailure, NavigationStep,
    NavigatorOptions, PathResult, ShortestPathEta,
};

use crate::state::AppState;

/// Path to the fixture road network.
pub const TEST_FIXTURE_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../docs/fixtures/minimal_road_network.json"
);

static FIXTURE_STATE: OnceLock<AppState> = OnceLock::new();

pub fn fixture_network_path() -> PathBuf {
    PathBuf::from(TEST_FIXTURE_PATH)
}

/// Shared state backed by the real navigator over the fixture network.
///
/// # Panics
///
/// Panics if the fixture cannot be loaded.
pub fn fixture_state() -> AppState {
    FIXTURE_STATE
        .get_or_init(|| {
            let path = fixture_network_path();
            AppState::load(&path, NavigatorOptions::default())
                .unwrap_or_else(|e| panic!("failed to load fixture from {:?}: {}", path, e))
        })
        .clone()
}

/// What a [`SpyNavigator`] answers with.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    Success(PathResult),
    /// Failure with the given `found` flag. `code: None` produces an
    /// unclassified engine error.
    Failure {
        found: bool,
        code: Option<ErrorCode>,
        message: String,
    },
}

/// Recording test double for [`ShortestPathEta`].
#[derive(Debug)]
pub struct SpyNavigator {
    outcome: ScriptedOutcome,
    calls: AtomicUsize,
    last_call: Mutex<Option<RecordedCall>>,
}

/// Arguments of the most recent capability call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub request_id: String,
    pub source: Coordinate,
    pub destination: Coordinate,
}

impl SpyNavigator {
    pub fn new(outcome: ScriptedOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        }
    }

    /// Answers with [`sample_path_result`].
    pub fn succeeding() -> Self {
        Self::new(ScriptedOutcome::Success(sample_path_result()))
    }

    pub fn returning(result: PathResult) -> Self {
        Self::new(ScriptedOutcome::Success(result))
    }

    pub fn failing(found: bool, code: Option<ErrorCode>, message: impl Into<String>) -> Self {
        Self::new(ScriptedOutcome::Failure {
            found,
            code,
            message: message.into(),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.last_call
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ShortestPathEta for SpyNavigator {
    async fn shortest_path_eta(
        &self,
        ctx: &NavigationContext,
        source: Coordinate,
        destination: Coordinate,
    ) -> Result<PathResult, NavigationFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_call
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(RecordedCall {
            request_id: ctx.request_id().to_string(),
            source,
            destination,
        });

        match &self.outcome {
            ScriptedOutcome::Success(result) => Ok(result.clone()),
            ScriptedOutcome::Failure {
                found,
                code,
                message,
            } => {
                let error = match code {
                    Some(code) => Error::domain(*code, message.clone()),
                    None => Error::Engine {
                        message: message.clone(),
                    },
                };
                Err(NavigationFailure {
                    found: *found,
                    error,
                })
            }
        }
    }
}

/// Result used by the shortest-path handler tests.
///
/// Distance and ETA carry more than two decimals so rounding is observable.
pub fn sample_path_result() -> PathResult {
    let origin = Coordinate::new(-6.2, 106.8);
    let destination = Coordinate::new(-6.9, 107.6);
    PathResult {
        path: "A->B->C".to_string(),
        distance: 15321.4567,
        steps: vec![
            NavigationStep {
                maneuver: Maneuver::Depart,
                street: "Jalan Sudirman".to_string(),
                distance: 15321.4567,
                eta: 842.9012,
                location: origin,
            },
            NavigationStep {
                maneuver: Maneuver::Arrive,
                street: "Jalan Sudirman".to_string(),
                distance: 0.0,
                eta: 0.0,
                location: destination,
            },
        ],
        found: true,
        route: vec![origin, destination],
        eta: 842.9012,
    }
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    format!("test-{}", COUNTER.fetch_add(1, Ordering::SeqCst))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_path_exists() {
        let path = fixture_network_path();
        assert!(path.exists(), "fixture network not found at {:?}", path);
    }

    #[test]
    fn test_fixture_state_loads() {
        assert_eq!(fixture_state().nodes_loaded(), Some(8));
    }

    #[tokio::test]
    async fn test_spy_records_calls() {
        let spy = SpyNavigator::succeeding();
        let ctx = NavigationContext::new("req-1");
        let source = Coordinate::new(-6.2, 106.8);
        let destination = Coordinate::new(-6.9, 107.6);

        let result = spy
            .shortest_path_eta(&ctx, source, destination)
            .await
            .unwrap();
        assert_eq!(result, sample_path_result());
        assert_eq!(spy.calls(), 1);
        assert_eq!(
            spy.last_call(),
            Some(RecordedCall {
                request_id: "req-1".to_string(),
                source,
                destination,
            })
        );
    }

    #[tokio::test]
    async fn test_spy_scripted_failure() {
        let spy = SpyNavigator::failing(false, Some(ErrorCode::NotFound), "no node");
        let ctx = NavigationContext::new("req-2");
        let failure = spy
            .shortest_path_eta(&ctx, Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 2.0))
            .await
            .unwrap_err();
        assert!(!failure.found);
        assert_eq!(failure.error.code(), Some(ErrorCode::NotFound));

        let spy = SpyNavigator::failing(true, None, "engine exploded");
        let failure = spy
            .shortest_path_eta(&ctx, Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 2.0))
            .await
            .unwrap_err();
        assert!(failure.found);
        assert_eq!(failure.error.code(), None);
    }

    #[test]
    fn test_request_id_unique() {
        assert_ne!(test_request_id(), test_request_id());
    }
}
