//! Application state for the HTTP services.
//!
//! Handlers reach the navigation capability through [`AppState`]; the
//! capability is injected at construction so the HTTP layer never knows which
//! implementation it talks to.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use navigator_lib::{load_network, Navigator, NavigatorOptions, ShortestPathEta};

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable; share it via axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use navigator_service_shared::AppState;
///
/// let state = AppState::load("/data/road_network.json", options)?;
/// let app = Router::new()
///     .route("/api/navigations/shortestPath", post(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    navigator: Arc<dyn ShortestPathEta>,
    nodes_loaded: Option<usize>,
}

impl AppState {
    /// Wrap any capability implementation.
    pub fn new(navigator: impl ShortestPathEta + 'static) -> Self {
        Self::from_arc(Arc::new(navigator))
    }

    /// Wrap an already shared capability implementation.
    pub fn from_arc(navigator: Arc<dyn ShortestPathEta>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                navigator,
                nodes_loaded: None,
            }),
        }
    }

    /// Load the road network at `path` and serve it with the in-memory
    /// [`Navigator`].
    ///
    /// # Errors
    ///
    /// Returns the library error when the file is missing or invalid.
    pub fn load(
        path: impl AsRef<Path>,
        options: NavigatorOptions,
    ) -> Result<Self, navigator_lib::Error> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "loading road network");
        let network = load_network(path)?;
        let nodes = network.node_count();
        tracing::info!(
            nodes,
            ways = network.ways.len(),
            algorithm = %options.algorithm,
            "road network loaded"
        );

        Ok(Self::new(Navigator::new(network, options)).with_nodes_loaded(nodes))
    }

    /// Report how many road nodes back the capability (used by readiness).
    pub fn with_nodes_loaded(self, nodes: usize) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                navigator: Arc::clone(&self.inner.navigator),
                nodes_loaded: Some(nodes),
            }),
        }
    }

    pub fn navigator(&self) -> &dyn ShortestPathEta {
        self.inner.navigator.as_ref()
    }

    pub fn nodes_loaded(&self) -> Option<usize> {
        self.inner.nodes_loaded
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("nodes_loaded", &self.inner.nodes_loaded)
            .finish_non_exhaustive()
    }
}
