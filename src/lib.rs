//! wifigaze: builds a live wireless network topology graph from a stream of
//! frame-capture records.
//!
//! The capture layer (out of process) emits one comma-delimited record per
//! observed frame; [`processing`] maps each record onto device nodes, SSID
//! registrations and edges in a caller-owned graph. [`gazeruntime`] bundles
//! the per-session state for the bundled binary.

pub mod config;
pub mod frame;
pub mod gazeruntime;
pub mod graph;
pub mod oui;
pub mod processing;
pub mod ssids;
pub mod util;
