//! The shortest-path/ETA capability and its in-memory implementation.
//!
//! Transport layers depend only on [`ShortestPathEta`]. [`Navigator`] is the
//! road-network backed implementation shipped with this crate; tests and other
//! deployments can substitute any type implementing the trait.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::Error;
use crate::geo::{bearing_delta, initial_bearing};
use crate::graph::{build_graph, Edge, Graph, GraphOptions};
use crate::model::{Coordinate, Maneuver, NavigationStep, NodeId, PathResult};
use crate::network::RoadNetwork;
use crate::path::{find_route, CancelToken, RouteAlgorithm};
use crate::spatial::NodeIndex;

/// Default maximum distance between a requested coordinate and its road node.
pub const DEFAULT_MAX_SNAP_METERS: f64 = 500.0;

/// Per-request context handed to the capability.
///
/// Dropping the context cancels its token, so an abandoned request (client
/// disconnect, deadline) stops any computation still holding a clone.
#[derive(Debug)]
pub struct NavigationContext {
    request_id: String,
    cancel: CancelToken,
}

impl NavigationContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            cancel: CancelToken::new(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Token observed by long-running work on behalf of this request.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for NavigationContext {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Failed navigation outcome.
///
/// `found` reports whether both endpoints were resolvable in the graph, which
/// is what callers use to tell bad input apart from engine faults.
#[derive(Debug)]
pub struct NavigationFailure {
    pub found: bool,
    pub error: Error,
}

impl NavigationFailure {
    /// The query could not be resolved against the graph.
    pub fn not_found(error: Error) -> Self {
        Self {
            found: false,
            error,
        }
    }

    /// The query resolved but the computation failed.
    pub fn internal(error: Error) -> Self {
        Self { found: true, error }
    }
}

impl fmt::Display for NavigationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (found: {})", self.error, self.found)
    }
}

impl std::error::Error for NavigationFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Capability computing the shortest path and ETA between two coordinates.
///
/// Implementations are shared across concurrent requests and must be safe
/// for concurrent use.
#[async_trait]
pub trait ShortestPathEta: Send + Sync {
    async fn shortest_path_eta(
        &self,
        ctx: &NavigationContext,
        source: Coordinate,
        destination: Coordinate,
    ) -> Result<PathResult, NavigationFailure>;
}

/// Tunables for [`Navigator`].
#[derive(Debug, Clone, Copy)]
pub struct NavigatorOptions {
    pub algorithm: RouteAlgorithm,
    /// Coordinates farther than this from every node are unresolvable.
    pub max_snap_distance: f64,
    pub graph: GraphOptions,
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self {
            algorithm: RouteAlgorithm::default(),
            max_snap_distance: DEFAULT_MAX_SNAP_METERS,
            graph: GraphOptions::default(),
        }
    }
}

/// Road-network backed [`ShortestPathEta`] implementation.
///
/// Cheap to clone; the network, graph and index live behind an `Arc`.
#[derive(Clone)]
pub struct Navigator {
    inner: Arc<NavigatorInner>,
}

struct NavigatorInner {
    network: RoadNetwork,
    graph: Graph,
    index: NodeIndex,
    options: NavigatorOptions,
}

impl Navigator {
    /// Build the graph and spatial index for `network`.
    pub fn new(network: RoadNetwork, options: NavigatorOptions) -> Self {
        let graph = build_graph(&network, &options.graph);
        let index = NodeIndex::build(&network);
        debug!(
            nodes = network.node_count(),
            edges = graph.edge_count(),
            algorithm = %options.algorithm,
            "navigator ready"
        );
        Self {
            inner: Arc::new(NavigatorInner {
                network,
                graph,
                index,
                options,
            }),
        }
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.inner.network
    }

    pub fn options(&self) -> &NavigatorOptions {
        &self.inner.options
    }

    /// Synchronous path computation.
    pub fn compute(
        &self,
        source: Coordinate,
        destination: Coordinate,
        cancel: &CancelToken,
    ) -> Result<PathResult, NavigationFailure> {
        let start = self.resolve(source)?;
        let goal = self.resolve(destination)?;

        let inner = &self.inner;
        let nodes = find_route(
            &inner.graph,
            &inner.network,
            start,
            goal,
            inner.options.algorithm,
            cancel,
        )
        .map_err(NavigationFailure::internal)?
        .ok_or_else(|| NavigationFailure::not_found(Error::RouteNotFound { start, goal }))?;

        self.assemble(&nodes).map_err(NavigationFailure::internal)
    }

    fn resolve(&self, point: Coordinate) -> Result<NodeId, NavigationFailure> {
        if !point.is_valid() {
            return Err(NavigationFailure::not_found(Error::InvalidCoordinate {
                latitude: point.latitude,
                longitude: point.longitude,
            }));
        }

        let max_distance = self.inner.options.max_snap_distance;
        self.inner.index.snap(point, max_distance).ok_or_else(|| {
            NavigationFailure::not_found(Error::NodeNotFound {
                latitude: point.latitude,
                longitude: point.longitude,
                max_distance,
            })
        })
    }

    fn assemble(&self, nodes: &[NodeId]) -> Result<PathResult, Error> {
        let network = &self.inner.network;

        let route = nodes
            .iter()
            .map(|id| {
                network.coordinate(*id).ok_or_else(|| Error::Engine {
                    message: format!("path references unknown node {id}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let edges = nodes
            .windows(2)
            .map(|pair| {
                self.inner
                    .graph
                    .edge_between(pair[0], pair[1])
                    .ok_or_else(|| Error::Engine {
                        message: format!("no edge between {} and {}", pair[0], pair[1]),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let distance: f64 = edges.iter().map(|edge| edge.distance).sum();
        let eta: f64 = edges.iter().map(|edge| edge.travel_time()).sum();
        let steps = build_steps(network, &route, &edges);
        let path = nodes
            .iter()
            .map(NodeId::to_string)
            .collect::<Vec<_>>()
            .join("->");

        Ok(PathResult {
            path,
            distance,
            steps,
            found: true,
            route,
            eta,
        })
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("node_count", &self.inner.network.node_count())
            .field("edge_count", &self.inner.graph.edge_count())
            .field("algorithm", &self.inner.options.algorithm)
            .finish()
    }
}

#[async_trait]
impl ShortestPathEta for Navigator {
    async fn shortest_path_eta(
        &self,
        ctx: &NavigationContext,
        source: Coordinate,
        destination: Coordinate,
    ) -> Result<PathResult, NavigationFailure> {
        let navigator = self.clone();
        let cancel = ctx.cancel_token();

        match tokio::task::spawn_blocking(move || navigator.compute(source, destination, &cancel))
            .await
        {
            Ok(outcome) => outcome,
            Err(join_error) => {
                warn!(request_id = %ctx.request_id(), error = %join_error, "navigation worker failed");
                Err(NavigationFailure::internal(Error::Engine {
                    message: join_error.to_string(),
                }))
            }
        }
    }
}

/// Collapse consecutive edges on the same street into navigation steps.
///
/// `route` holds one coordinate per node and `edges[i]` joins `route[i]` to
/// `route[i + 1]`.
fn build_steps(network: &RoadNetwork, route: &[Coordinate], edges: &[&Edge]) -> Vec<NavigationStep> {
    let Some(&last) = route.last() else {
        return Vec::new();
    };

    let mut steps: Vec<NavigationStep> = Vec::new();
    let mut previous_bearing: Option<f64> = None;

    for (index, edge) in edges.iter().enumerate() {
        let from = route[index];
        let to = route[index + 1];
        let bearing = initial_bearing(from, to);

        let same_street = index > 0 && edges[index - 1].way == edge.way;
        match steps.last_mut() {
            Some(current) if same_street => {
                current.distance += edge.distance;
                current.eta += edge.travel_time();
            }
            _ => {
                let maneuver = match previous_bearing {
                    None => Maneuver::Depart,
                    Some(previous) => {
                        Maneuver::from_bearing_delta(bearing_delta(previous, bearing))
                    }
                };
                steps.push(NavigationStep {
                    maneuver,
                    street: street_name(network, edge),
                    distance: edge.distance,
                    eta: edge.travel_time(),
                    location: from,
                });
            }
        }
        previous_bearing = Some(bearing);
    }

    let arrive_street = edges
        .last()
        .map(|edge| street_name(network, edge))
        .unwrap_or_default();
    steps.push(NavigationStep {
        maneuver: Maneuver::Arrive,
        street: arrive_street,
        distance: 0.0,
        eta: 0.0,
        location: last,
    });

    steps
}

fn street_name(network: &RoadNetwork, edge: &Edge) -> String {
    network
        .ways
        .get(edge.way)
        .map(|way| way.display_name().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{RoadNode, RoadWay};

    fn network() -> RoadNetwork {
        RoadNetwork::new(
            vec![
                RoadNode { id: 1, lat: -6.2, lon: 106.8 },
                RoadNode { id: 2, lat: -6.2, lon: 106.81 },
                RoadNode { id: 3, lat: -6.2, lon: 106.82 },
                RoadNode { id: 4, lat: -6.21, lon: 106.82 },
                RoadNode { id: 9, lat: -6.5, lon: 107.2 },
                RoadNode { id: 10, lat: -6.5, lon: 107.21 },
            ],
            vec![
                RoadWay {
                    id: 100,
                    name: Some("Jalan Sudirman".into()),
                    nodes: vec![1, 2, 3],
                    max_speed_kmh: Some(36.0),
                    oneway: false,
                },
                RoadWay {
                    id: 101,
                    name: Some("Jalan Thamrin".into()),
                    nodes: vec![3, 4],
                    max_speed_kmh: Some(18.0),
                    oneway: false,
                },
                RoadWay {
                    id: 102,
                    name: None,
                    nodes: vec![9, 10],
                    max_speed_kmh: None,
                    oneway: false,
                },
            ],
        )
        .unwrap()
    }

    fn navigator() -> Navigator {
        Navigator::new(network(), NavigatorOptions::default())
    }

    #[test]
    fn compute_builds_full_result() {
        let result = navigator()
            .compute(
                Coordinate::new(-6.2, 106.8),
                Coordinate::new(-6.21, 106.82),
                &CancelToken::new(),
            )
            .unwrap();

        assert!(result.found);
        assert_eq!(result.path, "1->2->3->4");
        assert_eq!(result.route.len(), 4);
        assert!(result.distance > 3000.0 && result.distance < 3500.0);

        let maneuvers: Vec<Maneuver> = result.steps.iter().map(|s| s.maneuver).collect();
        // Heading east on Sudirman, then south on Thamrin: a right turn.
        assert_eq!(
            maneuvers,
            vec![Maneuver::Depart, Maneuver::Right, Maneuver::Arrive]
        );
        assert_eq!(result.steps[0].street, "Jalan Sudirman");
        assert_eq!(result.steps[1].street, "Jalan Thamrin");

        let step_distance: f64 = result.steps.iter().map(|s| s.distance).sum();
        assert!((step_distance - result.distance).abs() < 1e-6);
        let step_eta: f64 = result.steps.iter().map(|s| s.eta).sum();
        assert!((step_eta - result.eta).abs() < 1e-6);
    }

    #[test]
    fn eta_uses_way_speed() {
        let result = navigator()
            .compute(
                Coordinate::new(-6.2, 106.8),
                Coordinate::new(-6.2, 106.82),
                &CancelToken::new(),
            )
            .unwrap();
        // 36 km/h == 10 m/s.
        assert!((result.eta - result.distance / 10.0).abs() < 1e-6);
    }

    #[test]
    fn unresolvable_coordinate_is_not_found() {
        let failure = navigator()
            .compute(
                Coordinate::new(-7.5, 110.0),
                Coordinate::new(-6.2, 106.8),
                &CancelToken::new(),
            )
            .unwrap_err();
        assert!(!failure.found);
        assert!(matches!(failure.error, Error::NodeNotFound { .. }));
    }

    #[test]
    fn invalid_coordinate_is_not_found() {
        let failure = navigator()
            .compute(
                Coordinate::new(-6.2, 106.8),
                Coordinate::new(120.0, 106.8),
                &CancelToken::new(),
            )
            .unwrap_err();
        assert!(!failure.found);
        assert!(matches!(failure.error, Error::InvalidCoordinate { .. }));
    }

    #[test]
    fn disconnected_components_are_not_found() {
        let failure = navigator()
            .compute(
                Coordinate::new(-6.2, 106.8),
                Coordinate::new(-6.5, 107.2),
                &CancelToken::new(),
            )
            .unwrap_err();
        assert!(!failure.found);
        assert!(matches!(
            failure.error,
            Error::RouteNotFound { start: 1, goal: 9 }
        ));
    }

    #[test]
    fn same_node_yields_arrival_only() {
        let result = navigator()
            .compute(
                Coordinate::new(-6.2, 106.8),
                Coordinate::new(-6.2001, 106.8001),
                &CancelToken::new(),
            )
            .unwrap();
        assert_eq!(result.path, "1");
        assert_eq!(result.distance, 0.0);
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].maneuver, Maneuver::Arrive);
    }

    #[test]
    fn dropping_context_cancels_token() {
        let ctx = NavigationContext::new("req-1");
        let token = ctx.cancel_token();
        assert!(!token.is_cancelled());
        drop(ctx);
        assert!(token.is_cancelled());
    }

    #[test]
    fn failure_display_includes_found_flag() {
        let failure = NavigationFailure::internal(Error::Cancelled);
        assert!(failure.to_string().contains("found: true"));
    }

    #[tokio::test]
    async fn capability_runs_on_blocking_pool() {
        let navigator = navigator();
        let ctx = NavigationContext::new("req-async");
        let result = navigator
            .shortest_path_eta(
                &ctx,
                Coordinate::new(-6.2, 106.8),
                Coordinate::new(-6.2, 106.82),
            )
            .await
            .unwrap();
        assert_eq!(result.path, "1->2->3");
    }
}
