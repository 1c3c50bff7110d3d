//! Host, station and docker-host ingestion from the device feed.

use serde_json::Value;

use super::builder::RemapTables;
use super::graph::TopologyGraph;
use super::links::ensure_switch;
use super::records::{decode_record, device_entries, DeviceRecord, IngestCounts, IngestError, ValidDevice};
use super::types::{EdgeKind, NodeType};

/// Label given to a device with neither an IPv4 nor a MAC address
pub const UNKNOWN_HOST_LABEL: &str = "hUnknown";

/// Resolve the host-side label and type of a device.
///
/// Evaluated in order: stations table, docker-hosts table, `h<ipv4>`,
/// `h<mac>`, then [`UNKNOWN_HOST_LABEL`]. The boolean is true when a remap
/// table supplied the answer.
pub fn resolve_host(remap: &RemapTables, ipv4: Option<&str>, mac: Option<&str>) -> (String, NodeType, bool) {
    if let Some(ip) = ipv4 {
        if let Some(label) = remap.stations.get(ip) {
            return (label.clone(), NodeType::Station, true);
        }
        if let Some(label) = remap.docker_hosts.get(ip) {
            return (label.clone(), NodeType::DockerHost, true);
        }
        return (format!("h{}", ip), NodeType::Host, false);
    }

    match mac {
        Some(mac) => (format!("h{}", mac), NodeType::Host, false),
        None => (UNKNOWN_HOST_LABEL.to_string(), NodeType::Host, false),
    }
}

/// Add one validated device and its attachment edge
pub fn add_device(graph: &mut TopologyGraph, remap: &RemapTables, device: ValidDevice) {
    let (host_label, host_type, pinned) =
        resolve_host(remap, device.ipv4.as_deref(), device.mac.as_deref());

    if pinned {
        graph.pin_node(&host_label, host_type);
    } else {
        graph.ensure_node(&host_label, host_type);
    }

    let switch_label = ensure_switch(graph, remap, &device.switch);

    log::debug!("Device {} ({}) at {}:{}", host_label, host_type, switch_label, device.port);

    graph.upsert_edge(&host_label, &switch_label, EdgeKind::Attachment { port: device.port });
}

/// Ingest the device feed into `graph`.
///
/// An unrecognized envelope is returned as an error and leaves the graph
/// untouched; bad individual records are skipped.
pub fn ingest_devices(
    graph: &mut TopologyGraph,
    remap: &RemapTables,
    feed: Value,
) -> Result<IngestCounts, IngestError> {
    let entries = device_entries(feed)?;
    let mut counts = IngestCounts::default();

    for entry in entries {
        match decode_record::<DeviceRecord>(entry).and_then(DeviceRecord::validate) {
            Ok(device) => {
                add_device(graph, remap, device);
                counts.ingested += 1;
            }
            Err(e) => counts.skip(&e),
        }
    }

    log::info!("Ingested {} devices ({} skipped)", counts.ingested, counts.skipped);
    Ok(counts)
}
