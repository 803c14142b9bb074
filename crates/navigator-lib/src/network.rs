//! Road network loading and validation.
//!
//! The network file is a JSON document listing nodes (with WGS84 positions)
//! and ways (ordered node sequences that form streets):
//!
//! ```json
//! {
//!   "nodes": [{"id": 1, "lat": -6.2, "lon": 106.8}, {"id": 2, "lat": -6.2, "lon": 106.81}],
//!   "ways": [{"id": 10, "name": "Jalan Sudirman", "nodes": [1, 2], "max_speed_kmh": 50}]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Coordinate, NodeId};

/// A road network node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadNode {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

impl RoadNode {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// An ordered sequence of nodes sharing a street name and speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadWay {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    pub nodes: Vec<NodeId>,
    #[serde(default)]
    pub max_speed_kmh: Option<f64>,
    #[serde(default)]
    pub oneway: bool,
}

impl RoadWay {
    /// Display name used in navigation steps.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed road")
    }
}

#[derive(Debug, Deserialize)]
struct RawNetwork {
    nodes: Vec<RoadNode>,
    #[serde(default)]
    ways: Vec<RoadWay>,
}

/// In-memory road network with a node lookup table.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    pub nodes: HashMap<NodeId, RoadNode>,
    pub ways: Vec<RoadWay>,
}

impl RoadNetwork {
    /// Build a network from nodes and ways, enforcing structural invariants.
    pub fn new(nodes: Vec<RoadNode>, ways: Vec<RoadWay>) -> Result<Self> {
        let mut lookup = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if !node.coordinate().is_valid() {
                return Err(Error::InvalidNetwork {
                    message: format!("node {} has out-of-range position", node.id),
                });
            }
            if lookup.insert(node.id, node).is_some() {
                return Err(Error::DuplicateNode { id: node.id });
            }
        }

        let mut way_ids = HashSet::with_capacity(ways.len());
        for way in &ways {
            if !way_ids.insert(way.id) {
                return Err(Error::InvalidNetwork {
                    message: format!("duplicate way id {}", way.id),
                });
            }
            if way.nodes.len() < 2 {
                return Err(Error::InvalidNetwork {
                    message: format!("way {} must reference at least two nodes", way.id),
                });
            }
            if let Some(missing) = way.nodes.iter().find(|id| !lookup.contains_key(id)) {
                return Err(Error::InvalidNetwork {
                    message: format!("way {} references unknown node {}", way.id, missing),
                });
            }
            if let Some(speed) = way.max_speed_kmh {
                if !(speed.is_finite() && speed > 0.0) {
                    return Err(Error::InvalidNetwork {
                        message: format!("way {} has non-positive speed", way.id),
                    });
                }
            }
        }

        Ok(Self {
            nodes: lookup,
            ways,
        })
    }

    /// Parse a network from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawNetwork = serde_json::from_str(json)?;
        Self::new(raw.nodes, raw.ways)
    }

    /// Look up a node by identifier.
    pub fn node(&self, id: NodeId) -> Option<&RoadNode> {
        self.nodes.get(&id)
    }

    /// Position of a node, if present.
    pub fn coordinate(&self, id: NodeId) -> Option<Coordinate> {
        self.nodes.get(&id).map(RoadNode::coordinate)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Load a road network from a JSON file on disk.
pub fn load_network(path: &Path) -> Result<RoadNetwork> {
    if !path.exists() {
        return Err(Error::NetworkNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = std::fs::read_to_string(path)?;
    let network = RoadNetwork::from_json(&contents)?;
    debug!(
        path = %path.display(),
        nodes = network.node_count(),
        ways = network.ways.len(),
        "loaded road network"
    );
    Ok(network)
}
