//! The SSID registry: which devices belong to which network name, and the
//! display colour each network was assigned.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::frame::Mac;

/// Colour handed out once the palette runs dry.
pub const DEFAULT_COLOR: &str = "#1F77B4";

/// Palette used when the caller does not supply one.
pub const DEFAULT_PALETTE: &[&str] = &[
    "#FF7F0E", "#2CA02C", "#D62728", "#9467BD", "#8C564B", "#E377C2", "#7F7F7F", "#BCBD22",
    "#17BECF",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SsidEntry {
    /// Member devices in first-seen order, append-once.
    pub members: Vec<Mac>,
    pub color: String,
}

/// Registry of every SSID observed this session. Entries are never removed.
#[derive(Debug)]
pub struct SsidRegistry {
    entries: HashMap<String, SsidEntry>,
    palette: Vec<String>,
}

impl SsidRegistry {
    pub fn new(palette: Vec<String>) -> Self {
        Self {
            entries: HashMap::new(),
            palette,
        }
    }

    /// Record `mac` as a member of `ssid`. The Nth distinct SSID receives the
    /// Nth palette colour; after that every SSID gets [`DEFAULT_COLOR`].
    pub fn register(&mut self, ssid: &str, mac: Mac) {
        if let Some(entry) = self.entries.get_mut(ssid) {
            if !entry.members.contains(&mac) {
                entry.members.push(mac);
            }
            return;
        }
        let color = self
            .palette
            .get(self.entries.len())
            .cloned()
            .unwrap_or_else(|| DEFAULT_COLOR.to_string());
        tracing::debug!(%ssid, %color, "new ssid observed");
        self.entries.insert(
            ssid.to_string(),
            SsidEntry {
                members: vec![mac],
                color,
            },
        );
    }

    pub fn get(&self, ssid: &str) -> Option<&SsidEntry> {
        self.entries.get(ssid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted snapshot for export.
    pub fn to_sorted(&self) -> BTreeMap<String, SsidEntry> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.clone()))
            .collect()
    }
}

impl Default for SsidRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect())
    }
}
