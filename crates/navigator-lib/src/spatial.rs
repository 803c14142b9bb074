//! KD-tree index for snapping coordinates onto road nodes.
//!
//! Node positions are stored as unit-sphere cartesian points so that the
//! nearest point by squared Euclidean distance is also the nearest node along
//! the great circle. The reported distance is recomputed with haversine.

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::debug;

use crate::geo::{haversine_distance, to_unit_vector};
use crate::model::{Coordinate, NodeId};
use crate::network::RoadNetwork;

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Nearest-node index over a road network.
pub struct NodeIndex {
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    nodes: Vec<(NodeId, Coordinate)>,
}

impl NodeIndex {
    /// Build the index from every node of the network.
    pub fn build(network: &RoadNetwork) -> Self {
        let mut nodes: Vec<(NodeId, Coordinate)> = network
            .nodes
            .values()
            .map(|node| (node.id, node.coordinate()))
            .collect();
        // Stable insertion order keeps tie-breaking deterministic.
        nodes.sort_by_key(|(id, _)| *id);

        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        for (index, (_, coordinate)) in nodes.iter().enumerate() {
            tree.add(&to_unit_vector(*coordinate), index);
        }

        debug!(node_count = nodes.len(), "built node index");

        Self { tree, nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find the node closest to `point`.
    ///
    /// Returns the node identifier and its great-circle distance in meters.
    pub fn nearest(&self, point: Coordinate) -> Option<(NodeId, f64)> {
        if self.nodes.is_empty() {
            return None;
        }

        let neighbour = self
            .tree
            .nearest_one::<SquaredEuclidean>(&to_unit_vector(point));
        let (id, coordinate) = *self.nodes.get(neighbour.item)?;
        Some((id, haversine_distance(point, coordinate)))
    }

    /// Find the closest node no farther than `max_distance` meters away.
    pub fn snap(&self, point: Coordinate, max_distance: f64) -> Option<NodeId> {
        self.nearest(point)
            .filter(|(_, distance)| *distance <= max_distance)
            .map(|(id, _)| id)
    }
}

impl std::fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeIndex")
            .field("node_count", &self.nodes.len())
            .finish()
    }
}
