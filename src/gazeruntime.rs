//! Session state for one capture stream.
//!
//! The runtime bundles the graph, the SSID registry, the vendor lookup and
//! the ingest counters so every component mutates one explicit context
//! instead of free-floating globals. One runtime per capture source; see the
//! single-writer note in [`crate::processing`].

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::config::Arguments;
use crate::frame::{parse_record, FrameSubtype, RecordError};
use crate::graph::{GraphExport, MemoryGraph};
use crate::oui::OuiRegistry;
use crate::processing::apply_frame;
use crate::ssids::{SsidEntry, SsidRegistry, DEFAULT_PALETTE};

#[derive(Debug, Default, Clone, Copy)]
pub struct Counters {
    pub records: u64,
    pub dropped: u64,
    pub anomalous: u64,
    pub beacons: u64,
    pub probe_requests: u64,
    pub probe_responses: u64,
}

pub struct GazeRuntime {
    pub graph: MemoryGraph,
    pub ssids: SsidRegistry,
    pub vendors: OuiRegistry,
    pub counters: Counters,
    pub session_id: Uuid,
}

impl GazeRuntime {
    pub fn new(cli: &Arguments) -> Result<Self> {
        let vendors = match &cli.oui {
            Some(path) => OuiRegistry::from_path(path)?,
            None => OuiRegistry::new(),
        };
        let palette = if cli.palette.is_empty() {
            DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
        } else {
            cli.palette.clone()
        };
        let runtime = Self::with_parts(SsidRegistry::new(palette), vendors);
        tracing::info!(session_id = %runtime.session_id, "starting capture session");
        Ok(runtime)
    }

    pub fn with_parts(ssids: SsidRegistry, vendors: OuiRegistry) -> Self {
        Self {
            graph: MemoryGraph::new(),
            ssids,
            vendors,
            counters: Counters::default(),
            session_id: Uuid::new_v4(),
        }
    }

    /// Ingest one capture record. Malformed records are dropped here and
    /// only move counters; nothing downstream sees them.
    pub fn ingest_record(&mut self, line: &str) {
        self.counters.records += 1;
        let record = match parse_record(line) {
            Ok(record) => record,
            Err(RecordError::ZeroTransmitter) => {
                self.counters.anomalous += 1;
                tracing::warn!(%line, "unusual client: all-zero transmitter");
                return;
            }
            Err(err) => {
                self.counters.dropped += 1;
                tracing::debug!(%line, %err, "dropped malformed record");
                return;
            }
        };
        match record.subtype {
            FrameSubtype::Beacon => self.counters.beacons += 1,
            FrameSubtype::ProbeRequest => self.counters.probe_requests += 1,
            FrameSubtype::ProbeResponse => self.counters.probe_responses += 1,
            FrameSubtype::Other(_) => {}
        }
        apply_frame(&record, &mut self.graph, &mut self.ssids, &self.vendors);
    }

    pub fn export(&self) -> SessionExport {
        SessionExport {
            session_id: self.session_id,
            generated_at: Utc::now(),
            ssids: self.ssids.to_sorted(),
            graph: self.graph.export(),
        }
    }
}

impl Default for GazeRuntime {
    fn default() -> Self {
        Self::with_parts(SsidRegistry::default(), OuiRegistry::new())
    }
}

/// Snapshot of one session, JSON-shaped for the visualisation front end.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExport {
    pub session_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub ssids: BTreeMap<String, SsidEntry>,
    #[serde(flatten)]
    pub graph: GraphExport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_drops_and_subtypes() {
        let mut runtime = GazeRuntime::default();
        runtime.ingest_record("too,short");
        runtime.ingest_record("00:00:00:00:00:00,ff:ff:ff:ff:ff:ff,,,64,,,2412,0,0x0000,0x0000");
        runtime.ingest_record(
            "aa:aa:aa:aa:aa:aa,ff:ff:ff:ff:ff:ff,,,128,4578616d706c65,aa:aa:aa:aa:aa:aa,2412,0,0x0008,0x0008",
        );

        assert_eq!(runtime.counters.records, 3);
        assert_eq!(runtime.counters.dropped, 1);
        assert_eq!(runtime.counters.anomalous, 1);
        assert_eq!(runtime.counters.beacons, 1);
        assert_eq!(runtime.graph.node_count(), 1);
    }

    #[test]
    fn export_carries_session_and_ssids() {
        let mut runtime = GazeRuntime::default();
        runtime.ingest_record(
            "aa:aa:aa:aa:aa:aa,ff:ff:ff:ff:ff:ff,,,128,4578616d706c65,aa:aa:aa:aa:aa:aa,2412,0,0x0008,0x0008",
        );
        let value = serde_json::to_value(runtime.export()).unwrap();
        assert!(value.get("sessionId").is_some());
        assert!(value["ssids"].get("Example").is_some());
        assert_eq!(value["nodes"].as_array().unwrap().len(), 1);
    }
}
