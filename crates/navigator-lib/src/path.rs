use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::haversine_distance;
use crate::graph::Graph;
use crate::model::NodeId;
use crate::network::RoadNetwork;

/// Number of queue pops between cancellation checks.
const CANCEL_CHECK_INTERVAL: usize = 256;

/// Supported shortest-path algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm (uninformed, weighted by distance).
    Dijkstra,
    /// A* search with a great-circle heuristic (default).
    #[default]
    AStar,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dijkstra" => Ok(RouteAlgorithm::Dijkstra),
            "a-star" | "astar" | "a_star" => Ok(RouteAlgorithm::AStar),
            other => Err(format!("unknown route algorithm '{other}'")),
        }
    }
}

/// Shared flag used to abort an in-flight search.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, AtomicOrdering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(AtomicOrdering::Acquire)
    }
}

/// Find the shortest path between two nodes with the selected algorithm.
///
/// Returns `Ok(None)` when the nodes are not connected and
/// `Err(Error::Cancelled)` once `cancel` fires.
pub fn find_route(
    graph: &Graph,
    network: &RoadNetwork,
    start: NodeId,
    goal: NodeId,
    algorithm: RouteAlgorithm,
    cancel: &CancelToken,
) -> Result<Option<Vec<NodeId>>> {
    match algorithm {
        RouteAlgorithm::Dijkstra => find_route_dijkstra(graph, start, goal, cancel),
        RouteAlgorithm::AStar => find_route_a_star(graph, network, start, goal, cancel),
    }
}

/// Run Dijkstra's algorithm to find the lowest-distance path.
pub fn find_route_dijkstra(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    cancel: &CancelToken,
) -> Result<Option<Vec<NodeId>>> {
    search(graph, start, goal, cancel, |_| 0.0)
}

/// Run A* search guided by the straight-line distance to the goal.
pub fn find_route_a_star(
    graph: &Graph,
    network: &RoadNetwork,
    start: NodeId,
    goal: NodeId,
    cancel: &CancelToken,
) -> Result<Option<Vec<NodeId>>> {
    let goal_position = network.coordinate(goal);
    search(graph, start, goal, cancel, |node| {
        match (goal_position, network.coordinate(node)) {
            (Some(target), Some(current)) => haversine_distance(current, target),
            _ => 0.0,
        }
    })
}

fn search<H>(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    cancel: &CancelToken,
    heuristic: H,
) -> Result<Option<Vec<NodeId>>>
where
    H: Fn(NodeId) -> f64,
{
    if start == goal {
        return Ok(Some(vec![start]));
    }

    let mut g_score: HashMap<NodeId, f64> = HashMap::new();
    let mut parents: HashMap<NodeId, Option<NodeId>> = HashMap::new();
    let mut queue = BinaryHeap::new();

    g_score.insert(start, 0.0);
    parents.insert(start, None);
    queue.push(QueueEntry::new(start, 0.0, heuristic(start)));

    let mut pops = 0usize;
    while let Some(entry) = queue.pop() {
        pops += 1;
        if pops % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let current_score = match g_score.get(&entry.node) {
            Some(score) if *score < entry.cost.0 => continue,
            Some(score) => *score,
            None => continue,
        };

        if entry.node == goal {
            return Ok(Some(reconstruct_path(&parents, start, goal)));
        }

        for edge in graph.neighbours(entry.node) {
            let next = edge.target;
            let tentative = current_score + edge.distance;
            if tentative < *g_score.get(&next).unwrap_or(&f64::INFINITY) {
                g_score.insert(next, tentative);
                parents.insert(next, Some(entry.node));
                queue.push(QueueEntry::new(next, tentative, heuristic(next)));
            }
        }
    }

    Ok(None)
}

fn reconstruct_path(
    parents: &HashMap<NodeId, Option<NodeId>>,
    start: NodeId,
    goal: NodeId,
) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents.get(&node).copied().flatten();
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeId,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl QueueEntry {
    fn new(node: NodeId, cost: f64, heuristic: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by estimate.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
