//! Environment-driven service configuration.
//!
//! # Environment Variables
//!
//! - `SERVICE_PORT`: HTTP port (default: `8080`)
//! - `NAVIGATOR_NETWORK_PATH`: Road network JSON file (default: `/data/road_network.json`)
//! - `REQUEST_TIMEOUT_SECS`: Per-request deadline in seconds (default: `30`)
//! - `NAVIGATOR_MAX_SNAP_METERS`: Max distance from a coordinate to its road node (default: `500`)
//! - `NAVIGATOR_DEFAULT_SPEED_KMH`: Speed for ways without one (default: `40`)
//! - `NAVIGATOR_ALGORITHM`: `a-star` (default) or `dijkstra`

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use navigator_lib::graph::DEFAULT_SPEED_KMH;
use navigator_lib::navigation::DEFAULT_MAX_SNAP_METERS;
use navigator_lib::{GraphOptions, NavigatorOptions, RouteAlgorithm};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_NETWORK_PATH: &str = "/data/road_network.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the HTTP service and its navigation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub port: u16,
    pub network_path: PathBuf,
    pub request_timeout_secs: u64,
    pub max_snap_meters: f64,
    pub default_speed_kmh: f64,
    pub algorithm: RouteAlgorithm,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            network_path: PathBuf::from(DEFAULT_NETWORK_PATH),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_snap_meters: DEFAULT_MAX_SNAP_METERS,
            default_speed_kmh: DEFAULT_SPEED_KMH,
            algorithm: RouteAlgorithm::default(),
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// Unparseable or non-positive values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = lookup("SERVICE_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);
        let network_path = lookup("NAVIGATOR_NETWORK_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.network_path);
        let request_timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|v: &u64| *v > 0)
            .unwrap_or(defaults.request_timeout_secs);
        let max_snap_meters = positive_f64(lookup("NAVIGATOR_MAX_SNAP_METERS"))
            .unwrap_or(defaults.max_snap_meters);
        let default_speed_kmh = positive_f64(lookup("NAVIGATOR_DEFAULT_SPEED_KMH"))
            .unwrap_or(defaults.default_speed_kmh);
        let algorithm = match lookup("NAVIGATOR_ALGORITHM") {
            Some(value) => value.parse().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "falling back to default route algorithm");
                defaults.algorithm
            }),
            None => defaults.algorithm,
        };

        Self {
            port,
            network_path,
            request_timeout_secs,
            max_snap_meters,
            default_speed_kmh,
            algorithm,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Engine options derived from this configuration.
    pub fn navigator_options(&self) -> NavigatorOptions {
        NavigatorOptions {
            algorithm: self.algorithm,
            max_snap_distance: self.max_snap_meters,
            graph: GraphOptions {
                default_speed_kmh: self.default_speed_kmh,
            },
        }
    }
}

fn positive_f64(value: Option<String>) -> Option<f64> {
    value
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
}
