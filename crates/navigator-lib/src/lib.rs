//! Navigator library entry points.
//!
//! This crate defines the navigation domain model, the closed set of domain
//! error codes, and the [`ShortestPathEta`] capability that transport layers
//! depend on. It also ships [`Navigator`], an in-memory road network engine
//! implementing that capability. Higher-level consumers (HTTP services)
//! should only depend on the items exported here.

#![deny(warnings)]

pub mod error;
pub mod geo;
pub mod graph;
pub mod model;
pub mod navigation;
pub mod network;
pub mod path;
pub mod spatial;

pub use error::{Error, ErrorCode, Result};
pub use geo::round_float;
pub use graph::{build_graph, Graph, GraphOptions};
pub use model::{Coordinate, Maneuver, NavigationStep, NodeId, PathResult};
pub use navigation::{
    NavigationContext, NavigationFailure, Navigator, NavigatorOptions, ShortestPathEta,
};
pub use network::{load_network, RoadNetwork, RoadNode, RoadWay};
pub use path::{find_route, CancelToken, RouteAlgorithm};
pub use spatial::NodeIndex;
