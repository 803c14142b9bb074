use std::collections::HashMap;
use std::sync::Arc;

use crate::geo::haversine_distance;
use crate::model::NodeId;
use crate::network::RoadNetwork;

/// Speed assumed for ways that do not declare one.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Options controlling how the routing graph is derived from a network.
#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
    pub default_speed_kmh: f64,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            default_speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

/// Directed edge within the routing graph.
#[derive(Debug, Clone)]
pub struct Edge {
    pub target: NodeId,
    /// Segment length in meters.
    pub distance: f64,
    /// Travel speed in meters per second.
    pub speed: f64,
    /// Index of the originating way in [`RoadNetwork::ways`].
    pub way: usize,
}

impl Edge {
    /// Seconds needed to traverse this edge.
    pub fn travel_time(&self) -> f64 {
        self.distance / self.speed
    }
}

/// Graph structure used by pathfinding algorithms.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: Arc<HashMap<NodeId, Vec<Edge>>>,
}

impl Graph {
    /// Return the outgoing edges of a node.
    pub fn neighbours(&self, node: NodeId) -> &[Edge] {
        self.adjacency
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Shortest direct edge from `from` to `to`, if the nodes are adjacent.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.neighbours(from)
            .iter()
            .filter(|edge| edge.target == to)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}

/// Build the routing graph for a road network.
///
/// Each consecutive node pair of a way becomes an edge; two-way streets get
/// the reverse edge as well.
pub fn build_graph(network: &RoadNetwork, options: &GraphOptions) -> Graph {
    let mut adjacency: HashMap<NodeId, Vec<Edge>> = HashMap::new();

    for (way_index, way) in network.ways.iter().enumerate() {
        let speed = way.max_speed_kmh.unwrap_or(options.default_speed_kmh) / 3.6;

        for pair in way.nodes.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let (Some(a), Some(b)) = (network.coordinate(from), network.coordinate(to)) else {
                continue;
            };
            let distance = haversine_distance(a, b);

            adjacency.entry(from).or_default().push(Edge {
                target: to,
                distance,
                speed,
                way: way_index,
            });
            if !way.oneway {
                adjacency.entry(to).or_default().push(Edge {
                    target: from,
                    distance,
                    speed,
                    way: way_index,
                });
            }
        }
    }

    Graph {
        adjacency: Arc::new(adjacency),
    }
}
