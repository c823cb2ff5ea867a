//! The frame-to-graph mapping engine.
//!
//! One call per capture record, single writer per graph: every function here
//! takes the graph and registry by `&mut` and performs read-modify-write
//! sequences with no internal locking. Callers that parallelise ingestion
//! must shard by graph or serialise around each call.

use chrono::Utc;
use rand::{thread_rng, Rng};

use crate::frame::{parse_record, FrameRecord, FrameSubtype, Mac, RecordError};
use crate::graph::{EdgeAttributes, GraphStore, LinkType, NodeAttributes};
use crate::oui::VendorLookup;
use crate::ssids::SsidRegistry;
use crate::util::{decode_ssid, MISSING_SSID};

/// Vendor name used when the lookup has no answer for a prefix.
pub const VENDOR_FALLBACK: &str = "unknown";

/// Parse one capture record and fold it into the graph. Malformed records
/// surface as an error with no state mutated anywhere.
pub fn process_record<G: GraphStore>(
    line: &str,
    graph: &mut G,
    ssids: &mut SsidRegistry,
    vendors: &dyn VendorLookup,
) -> Result<(), RecordError> {
    let record = parse_record(line)?;
    apply_frame(&record, graph, ssids, vendors);
    Ok(())
}

/// Fold one parsed frame into the graph.
///
/// The frame subtype gates which addresses count as devices: the transmitter
/// always does; the receiver unless the frame is a beacon or probe request;
/// source/destination and edge derivation only when the receiver counted and
/// the frame is not a probe response.
#[tracing::instrument(skip_all, fields(ta = %record.ta, subtype = ?record.subtype))]
pub fn apply_frame<G: GraphStore>(
    record: &FrameRecord,
    graph: &mut G,
    ssids: &mut SsidRegistry,
    vendors: &dyn VendorLookup,
) {
    let ssid = decode_ssid(&record.ssid_hex);

    process_node(record.ta, Some(record.subtype), &ssid, record, graph, ssids, vendors);
    if record.subtype.processes_receiver() {
        process_node(record.ra, None, &ssid, record, graph, ssids, vendors);
        if record.subtype.processes_endpoints() {
            if let Some(sa) = record.sa {
                process_node(sa, None, &ssid, record, graph, ssids, vendors);
            }
            if let Some(da) = record.da {
                process_node(da, None, &ssid, record, graph, ssids, vendors);
            }
            process_edges(record, graph);
        }
    }
}

/// Create or merge the node for one address of the frame.
///
/// `subtype` is only passed for the transmitter; for the other addresses the
/// subtype says nothing about their role.
#[allow(clippy::too_many_arguments)]
fn process_node<G: GraphStore>(
    mac: Mac,
    subtype: Option<FrameSubtype>,
    ssid: &str,
    record: &FrameRecord,
    graph: &mut G,
    ssids: &mut SsidRegistry,
    vendors: &dyn VendorLookup,
) {
    if mac.is_broadcast() {
        return;
    }

    let is_ap = record.bssid == Some(mac) || subtype == Some(FrameSubtype::Beacon);
    let channel = record.channel();

    // As an AP the frame's SSID is what the device broadcasts; as a client it
    // is what the device is probing for.
    let (broadcast_ssid, looking_for) = if is_ap { (ssid, "") } else { ("", ssid) };

    if !ssid.is_empty() && ssid != MISSING_SSID {
        ssids.register(ssid, mac);
    }

    if let Some(node) = graph.node_mut(&mac) {
        if !looking_for.is_empty() {
            node.looking_for.insert(looking_for.to_string());
        }
        if !broadcast_ssid.is_empty() && broadcast_ssid != MISSING_SSID {
            node.ssid.insert(broadcast_ssid.to_string());
        }
        if is_ap && !node.is_ap {
            node.label = format!("AP: {}", vendors.lookup(&mac, VENDOR_FALLBACK));
            node.is_ap = true;
        }
        if let Some(channel) = channel {
            node.channels.insert(channel);
        }
        node.last_seen = Utc::now();
        return;
    }

    let vendor = vendors.lookup(&mac, VENDOR_FALLBACK);
    let label = if is_ap {
        format!("AP: {vendor}")
    } else if broadcast_ssid.is_empty() {
        vendor.clone()
    } else {
        broadcast_ssid.to_string()
    };

    let mut node = NodeAttributes {
        label,
        vendor,
        is_ap,
        ssid: Default::default(),
        looking_for: Default::default(),
        channels: Default::default(),
        last_seen: Utc::now(),
        position: random_position(),
    };
    if !broadcast_ssid.is_empty() && broadcast_ssid != MISSING_SSID {
        node.ssid.insert(broadcast_ssid.to_string());
    }
    if !looking_for.is_empty() {
        node.looking_for.insert(looking_for.to_string());
    }
    if let Some(channel) = channel {
        node.channels.insert(channel);
    }
    graph.add_node(mac, node);
}

/// Derive edges between the frame's addresses. Only reached for the full
/// four-address tier.
fn process_edges<G: GraphStore>(record: &FrameRecord, graph: &mut G) {
    let (ta, ra) = (record.ta, record.ra);
    if ra.is_broadcast() {
        add_edge_once(graph, ta, ta, 2, LinkType::Broadcast);
    } else {
        add_edge_once(graph, ta, ra, 3, LinkType::Physical);
    }

    let (Some(sa), Some(da)) = (record.sa, record.da) else {
        return;
    };
    // When the logical endpoints coincide with the physical ones there is no
    // second relationship to record.
    if sa == ta && da == ra {
        return;
    }
    if da.is_broadcast() {
        add_edge_once(graph, sa, sa, 2, LinkType::Broadcast);
    } else {
        add_edge_once(graph, sa, da, 1, LinkType::Logical);
    }
}

fn add_edge_once<G: GraphStore>(graph: &mut G, a: Mac, b: Mac, size: u32, linktype: LinkType) {
    if !graph.has_edge(&a, &b) {
        graph.add_undirected_edge(a, b, EdgeAttributes { size, linktype });
    }
}

fn random_position() -> (f64, f64) {
    let mut rng = thread_rng();
    (rng.gen::<f64>() * 10.0, rng.gen::<f64>() * 10.0)
}
