//! End-to-end ingest scenarios against the public crate surface.

use wifigaze::frame::Mac;
use wifigaze::gazeruntime::GazeRuntime;
use wifigaze::graph::LinkType;

fn mac(s: &str) -> Mac {
    s.parse().unwrap()
}

#[test]
fn beacon_scenario() {
    // A beacon for SSID "Example" on channel 1.
    let mut runtime = GazeRuntime::default();
    runtime.ingest_record(
        "aa:aa:aa:aa:aa:aa,ff:ff:ff:ff:ff:ff,,,128,4578616d706c65,aa:aa:aa:aa:aa:aa,2412,0,0x0008,0x0008",
    );

    let ap = mac("aa:aa:aa:aa:aa:aa");
    assert_eq!(runtime.graph.node_count(), 1);
    let node = runtime.graph.node(&ap).unwrap();
    assert!(node.is_ap);
    assert_eq!(node.ssid.iter().cloned().collect::<Vec<_>>(), vec!["Example"]);
    assert_eq!(node.channels.iter().copied().collect::<Vec<_>>(), vec![1]);

    let entry = runtime.ssids.get("Example").unwrap();
    assert_eq!(entry.members, vec![ap]);

    // Beacons never reach the edge builder: the broadcast receiver is not a
    // real peer, so no edge (not even a self-loop) appears.
    assert_eq!(runtime.graph.edge_count(), 0);
}

#[test]
fn small_capture_session() {
    let mut runtime = GazeRuntime::default();
    let records = [
        // AP beacons "Example" on channel 1.
        "aa:aa:aa:aa:aa:aa,ff:ff:ff:ff:ff:ff,,,128,4578616d706c65,aa:aa:aa:aa:aa:aa,2412,0,0x0008,0x0008",
        // A client probes for "Example".
        "cc:cc:cc:cc:cc:cc,ff:ff:ff:ff:ff:ff,,,96,4578616d706c65,,2412,0,0x0004,0x0004",
        // The AP answers the probe.
        "aa:aa:aa:aa:aa:aa,cc:cc:cc:cc:cc:cc,aa:aa:aa:aa:aa:aa,cc:cc:cc:cc:cc:cc,160,4578616d706c65,aa:aa:aa:aa:aa:aa,2412,0,0x0005,0x0005",
        // Data flows between client and AP.
        "cc:cc:cc:cc:cc:cc,aa:aa:aa:aa:aa:aa,cc:cc:cc:cc:cc:cc,aa:aa:aa:aa:aa:aa,1024,,aa:aa:aa:aa:aa:aa,2412,0,0x0002,0x0000",
        // Noise the parser must drop.
        "not,a,record",
        "00:00:00:00:00:00,ff:ff:ff:ff:ff:ff,,,64,,,2412,0,0x0000,0x0000",
    ];
    for record in records {
        runtime.ingest_record(record);
    }

    let ap = mac("aa:aa:aa:aa:aa:aa");
    let client = mac("cc:cc:cc:cc:cc:cc");

    assert_eq!(runtime.graph.node_count(), 2);
    assert_eq!(runtime.graph.edge_count(), 1);

    let ap_node = runtime.graph.node(&ap).unwrap();
    assert!(ap_node.is_ap);
    assert!(ap_node.ssid.contains("Example"));

    let client_node = runtime.graph.node(&client).unwrap();
    assert!(!client_node.is_ap);
    assert!(client_node.looking_for.contains("Example"));

    let edge = runtime.graph.edge(&client, &ap).unwrap();
    assert_eq!(edge.linktype, LinkType::Physical);
    assert_eq!(edge.size, 3);

    // Both devices ended up as members of the network name.
    let entry = runtime.ssids.get("Example").unwrap();
    assert_eq!(entry.members, vec![ap, client]);

    assert_eq!(runtime.counters.records, 6);
    assert_eq!(runtime.counters.dropped, 1);
    assert_eq!(runtime.counters.anomalous, 1);
    assert_eq!(runtime.counters.beacons, 1);
    assert_eq!(runtime.counters.probe_requests, 1);
    assert_eq!(runtime.counters.probe_responses, 1);
}
