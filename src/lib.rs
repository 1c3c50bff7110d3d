//! # sdn-pathfinder - Topology discovery and path selection for SDN controllers
//!
//! This library discovers a software-defined network's live topology from a
//! controller's REST interface and selects the lowest-cost path between two
//! endpoints, where cost comes from real-time per-link bandwidth telemetry
//! rather than hop count alone.
//!
//! ## Pipeline
//!
//! - **Fetch**: GET the link list and the device list from the controller
//! - **Ingest**: build switch nodes and switch-switch edges from links, then
//!   host / station / docker-host nodes and their attachment edges from
//!   devices, applying the operator's remap tables
//! - **Classify**: refine generic node types from label prefixes
//! - **Index**: derive a switch-only neighbor-and-port index
//! - **Find**: enumerate every minimum-hop path between two labels
//! - **Rank**: price each tied path by `|rx - tx|` on every switch hop and
//!   keep all paths sharing the minimum
//!
//! ## Architecture
//!
//! - `fetch`: `JsonSource` trait and the blocking HTTP implementation
//! - `topology`: data model, graph store, ingestors, classifier, builder
//! - `routing`: adjacency index, path finder, telemetry, cost, selector
//! - `orchestrator`: owns the current snapshot and answers queries
//! - `report`: JSON, console and GraphViz DOT output
//! - `config` / `config_loader`: YAML configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use sdn_pathfinder::{config_loader, fetch::HttpFetcher, orchestrator::Orchestrator};
//!
//! let config = config_loader::load_config(Path::new("sdn.yaml"))?;
//! let fetcher = HttpFetcher::new(config.controller.request_timeout)?;
//! let mut orchestrator = Orchestrator::new(config, fetcher);
//! orchestrator.build_topology();
//!
//! let outcome = orchestrator.optimal_path("h10.0.0.1", "d1")?;
//! for path in outcome.paths() {
//!     println!("{}", path.join(" -> "));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! controller:
//!   base_url: "http://localhost:8080"
//!   request_timeout: 5s
//! remap:
//!   dpids:
//!     "10:00:00:00:00:00:00:01": ap1
//!   stations:
//!     "10.0.0.2": sta2
//!   docker_hosts:
//!     "10.0.0.4": d1
//! routing:
//!   unmeasured_links: zero   # zero | penalize | disqualify
//!   deadline: 30s
//! ```
//!
//! ## Error Handling
//!
//! Nothing in the pipeline aborts a build or a query: failed fetches,
//! malformed records and unmeasured links are logged and surfaced as
//! explicit values (`FeedStatus`, `UnmeasuredLink`, `OptimalPaths`).
//! Loading and CLI paths return `color_eyre::Result`.

pub mod config;
pub mod config_loader;
pub mod fetch;
pub mod topology;
pub mod routing;
pub mod orchestrator;
pub mod report;
