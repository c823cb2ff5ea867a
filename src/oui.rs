//! Vendor-name resolution from MAC address OUI prefixes.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::frame::Mac;

/// Resolution never fails; unknown prefixes resolve to the caller's fallback.
pub trait VendorLookup {
    fn lookup(&self, mac: &Mac, fallback: &str) -> String;
}

/// OUI prefix table loaded from a `aa:bb:cc<whitespace>Vendor Name` file.
/// An empty registry is valid: every lookup then yields the fallback.
#[derive(Debug, Default)]
pub struct OuiRegistry {
    prefixes: HashMap<[u8; 3], String>,
}

impl OuiRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, prefix: [u8; 3], vendor: impl Into<String>) {
        self.prefixes.insert(prefix, vendor.into());
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("cannot read oui database {}", path.display()))?;
        let mut registry = Self::new();
        for (number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (prefix, vendor) = line
                .split_once(char::is_whitespace)
                .with_context(|| format!("malformed oui entry on line {}", number + 1))?;
            registry.insert(parse_prefix(prefix, number + 1)?, vendor.trim());
        }
        tracing::info!(entries = registry.len(), path = %path.display(), "loaded oui database");
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

fn parse_prefix(field: &str, line: usize) -> Result<[u8; 3]> {
    let mut prefix = [0u8; 3];
    let mut parts = field.split([':', '-']);
    for octet in prefix.iter_mut() {
        let part = parts
            .next()
            .with_context(|| format!("malformed oui prefix on line {line}"))?;
        *octet = u8::from_str_radix(part, 16)
            .with_context(|| format!("malformed oui prefix on line {line}"))?;
    }
    Ok(prefix)
}

impl VendorLookup for OuiRegistry {
    fn lookup(&self, mac: &Mac, fallback: &str) -> String {
        self.prefixes
            .get(&mac.oui())
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_prefix_resolves() {
        let mut registry = OuiRegistry::new();
        registry.insert([0xaa, 0xbb, 0xcc], "Acme Wireless");
        let mac: Mac = "aa:bb:cc:01:02:03".parse().unwrap();
        assert_eq!(registry.lookup(&mac, "unknown"), "Acme Wireless");
    }

    #[test]
    fn miss_resolves_to_fallback() {
        let registry = OuiRegistry::new();
        let mac: Mac = "aa:bb:cc:01:02:03".parse().unwrap();
        assert_eq!(registry.lookup(&mac, "unknown"), "unknown");
    }

    #[test]
    fn parses_prefix_field() {
        assert_eq!(parse_prefix("aa:bb:cc", 1).unwrap(), [0xaa, 0xbb, 0xcc]);
        assert_eq!(parse_prefix("AA-BB-CC", 1).unwrap(), [0xaa, 0xbb, 0xcc]);
        assert!(parse_prefix("aa:bb", 1).is_err());
    }
}
