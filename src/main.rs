//! Topology discovery and bandwidth-aware path selection CLI.
//!
//! Polls an SDN controller's REST interface, builds the topology and
//! answers shortest / optimal path queries between node labels.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;

use sdn_pathfinder::config_loader::{self, CliOverrides};
use sdn_pathfinder::fetch::HttpFetcher;
use sdn_pathfinder::orchestrator::Orchestrator;
use sdn_pathfinder::report::{self, TopologySnapshot};
use sdn_pathfinder::routing::PathError;

#[derive(Parser, Debug)]
#[command(name = "sdn-pathfinder")]
#[command(about = "Topology discovery and bandwidth-aware path selection for SDN controllers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Controller base URL, overrides the configuration file
    #[arg(long)]
    controller: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Discover the topology and print a summary
    Topology {
        /// Write the topology snapshot as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write the topology as GraphViz DOT
        #[arg(long)]
        dot: Option<PathBuf>,
    },

    /// List discovered plain hosts
    Hosts,

    /// Print every minimum-hop path between two nodes
    Paths {
        src: String,
        dst: String,
    },

    /// Rank the shortest paths by live bandwidth asymmetry
    Optimal {
        src: String,
        dst: String,

        /// Write the evaluation as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    let mut config = config_loader::load_or_default(cli.config.as_deref())?;
    config_loader::apply_overrides(
        &mut config,
        &CliOverrides {
            controller: cli.controller.clone(),
        },
    )?;

    info!("Controller: {}", config.controller.base_url);

    let fetcher = HttpFetcher::new(config.controller.request_timeout)
        .wrap_err("Failed to create HTTP client")?;
    let mut orchestrator = Orchestrator::new(config, fetcher);
    let build = orchestrator.build_topology();

    match cli.command {
        Commands::Topology { json, dot } => {
            let snapshot = TopologySnapshot::capture(
                orchestrator.graph(),
                build,
                &orchestrator.config().controller.base_url,
            );
            if let Some(path) = json {
                report::write_json(&snapshot, &path)?;
            }
            if let Some(path) = dot {
                report::write_dot(orchestrator.graph(), &path)?;
            }
            report::print_topology_summary(&snapshot);
        }
        Commands::Hosts => {
            let hosts = orchestrator.host_labels();
            info!("Discovered {} host labels", hosts.len());
            for host in hosts {
                println!("{}", host);
            }
        }
        Commands::Paths { src, dst } => match orchestrator.shortest_paths(&src, &dst) {
            Ok(paths) if paths.is_empty() => println!("No path between {} and {}", src, dst),
            Ok(paths) => {
                for path in &paths {
                    println!("{}", report::format_path(path));
                }
            }
            Err(PathError::UnknownNode(label)) => println!("Node {} not in graph", label),
        },
        Commands::Optimal { src, dst, json } => match orchestrator.optimal_path(&src, &dst) {
            Ok(outcome) => {
                if let Some(path) = json {
                    report::write_json(&outcome, &path)?;
                }
                report::print_optimal_summary(&src, &dst, &outcome);
            }
            Err(PathError::UnknownNode(label)) => println!("Node {} not in graph", label),
        },
    }

    Ok(())
}
