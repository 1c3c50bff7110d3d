//! Path finding and bandwidth-aware path ranking.
//!
//! Shortest paths are enumerated on hop count alone; ties are then ranked
//! by live per-link traffic asymmetry fetched from the controller.

pub mod adjacency;
pub mod paths;
pub mod telemetry;
pub mod cost;
pub mod optimal;

pub use adjacency::{AdjacencyIndex, Neighbor};
pub use paths::{shortest_paths, PathError};
pub use telemetry::{BandwidthSample, LinkRef, TelemetryCollector, UnmeasuredLink};
pub use cost::{LinkCost, PathCost, UnmeasuredPolicy};
pub use optimal::{optimal_paths, CostContext, OptimalPaths, NO_OPTIMAL_PATH};
