//! Switch-to-switch link ingestion.

use serde_json::Value;

use super::builder::RemapTables;
use super::graph::TopologyGraph;
use super::records::{decode_record, link_entries, remap_or_prefix, IngestCounts, LinkRecord, ValidLink};
use super::types::{EdgeKind, NodeType, SwitchLink};

/// Label used for a switch: the dpid table's entry, or `s<dpid>`
pub fn switch_label(remap: &RemapTables, dpid: &str) -> String {
    remap_or_prefix(&remap.dpids, dpid, "s")
}

/// Make sure a switch node exists for `dpid` and remember its raw identifier
pub(crate) fn ensure_switch(graph: &mut TopologyGraph, remap: &RemapTables, dpid: &str) -> String {
    let label = switch_label(remap, dpid);
    let node = graph.ensure_node(&label, NodeType::Switch);
    if node.dpid.is_none() {
        node.dpid = Some(dpid.to_string());
    }
    label
}

/// Add one validated link. Sidedness is kept exactly as the feed reported it.
pub fn add_link(graph: &mut TopologyGraph, remap: &RemapTables, link: ValidLink) {
    let src = ensure_switch(graph, remap, &link.src_switch);
    let dst = ensure_switch(graph, remap, &link.dst_switch);

    log::debug!(
        "Link {}:{:?} -> {}:{:?} ({})",
        src,
        link.src_port,
        dst,
        link.dst_port,
        link.link_type
    );

    graph.upsert_edge(
        &src,
        &dst,
        EdgeKind::SwitchLink(SwitchLink {
            src_port: link.src_port,
            dst_port: link.dst_port,
            link_type: link.link_type,
            direction: link.direction,
        }),
    );
}

/// Ingest the link list into `graph`.
///
/// A feed that is not an array contributes nothing; individual records
/// missing a switch identifier are skipped.
pub fn ingest_links(graph: &mut TopologyGraph, remap: &RemapTables, feed: Value) -> IngestCounts {
    let mut counts = IngestCounts::default();

    let entries = match link_entries(feed) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("{}. No switch links added.", e);
            return counts;
        }
    };

    for entry in entries {
        match decode_record::<LinkRecord>(entry).and_then(LinkRecord::validate) {
            Ok(link) => {
                add_link(graph, remap, link);
                counts.ingested += 1;
            }
            Err(e) => counts.skip(&e),
        }
    }

    log::info!(
        "Ingested {} switch links ({} skipped)",
        counts.ingested,
        counts.skipped
    );
    counts
}
