//! Capture record parsing.
//!
//! The capture layer hands us one comma-delimited text record per frame:
//!
//! `ta,ra,sa,da,packetLength,ssidHex,bssid,radioChannel,flags,packetType,packetSubtype`
//!
//! `radioChannel` is a frequency in MHz, `packetType`/`packetSubtype` are hex
//! strings like `0x0008`. Records that do not carry the full field set, or
//! that are missing a required address, are rejected here and never reach the
//! graph.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::util::frequency_to_channel;

/// Number of fields a well-formed capture record carries.
pub const EXPECTED_FIELDS: usize = 11;

/// A MAC address, the node key of the topology graph.
///
/// Parsing normalises case, so two differently-cased captures of the same
/// device collapse onto one node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mac(pub [u8; 6]);

impl Mac {
    pub const BROADCAST: Mac = Mac([0xff; 6]);
    pub const ZERO: Mac = Mac([0x00; 6]);

    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Neither the broadcast address nor the all-zero anomaly marker.
    pub fn is_real_device(&self) -> bool {
        !self.is_broadcast() && !self.is_zero()
    }

    pub fn oui(&self) -> [u8; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }
}

impl FromStr for Mac {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.split(':');
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(|| MacParseError(s.to_string()))?;
            *octet =
                u8::from_str_radix(part, 16).map_err(|_| MacParseError(s.to_string()))?;
        }
        if parts.next().is_some() {
            return Err(MacParseError(s.to_string()));
        }
        Ok(Mac(octets))
    }
}

impl fmt::Display for Mac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl fmt::Debug for Mac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Mac {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid mac address `{0}`")]
pub struct MacParseError(pub String);

/// 802.11 management-frame subtypes the mapping rules care about. Everything
/// else funnels into `Other` and gets full four-address processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSubtype {
    ProbeRequest,
    ProbeResponse,
    Beacon,
    Other(u16),
}

impl FrameSubtype {
    /// Parse the wire form (`"0x0008"`). Unparseable subtypes are treated
    /// like any unrecognised subtype and receive full processing.
    pub fn from_wire(raw: &str) -> FrameSubtype {
        let value = raw
            .strip_prefix("0x")
            .and_then(|hex| u16::from_str_radix(hex, 16).ok());
        match value {
            Some(0x0004) => FrameSubtype::ProbeRequest,
            Some(0x0005) => FrameSubtype::ProbeResponse,
            Some(0x0008) => FrameSubtype::Beacon,
            Some(other) => FrameSubtype::Other(other),
            None => FrameSubtype::Other(u16::MAX),
        }
    }

    /// Beacons and probe requests are broadcast-style management frames;
    /// their nominal receiver is not a real peer and must not become a node.
    pub fn processes_receiver(self) -> bool {
        !matches!(self, FrameSubtype::Beacon | FrameSubtype::ProbeRequest)
    }

    /// Source/destination handling and edge derivation only apply to frames
    /// whose receiver was real and which are not probe responses.
    pub fn processes_endpoints(self) -> bool {
        self.processes_receiver() && self != FrameSubtype::ProbeResponse
    }
}

/// One parsed capture record, immutable after parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRecord {
    pub ta: Mac,
    pub ra: Mac,
    pub sa: Option<Mac>,
    pub da: Option<Mac>,
    pub packet_length: u32,
    pub ssid_hex: String,
    pub bssid: Option<Mac>,
    /// Radio frequency in MHz, if the capture layer reported one.
    pub frequency: Option<i32>,
    pub flags: String,
    pub frame_type: String,
    pub subtype: FrameSubtype,
}

impl FrameRecord {
    pub fn channel(&self) -> Option<i32> {
        self.frequency.map(frequency_to_channel)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record has {0} fields, expected {EXPECTED_FIELDS}")]
    FieldCount(usize),
    #[error("required field `{0}` is empty")]
    EmptyField(&'static str),
    #[error("invalid value `{1}` for field `{0}`")]
    InvalidField(&'static str, String),
    #[error("transmitter is the all-zero address")]
    ZeroTransmitter,
}

fn required_mac(name: &'static str, field: &str) -> Result<Mac, RecordError> {
    if field.is_empty() {
        return Err(RecordError::EmptyField(name));
    }
    field
        .parse()
        .map_err(|_| RecordError::InvalidField(name, field.to_string()))
}

fn optional_mac(name: &'static str, field: &str) -> Result<Option<Mac>, RecordError> {
    if field.is_empty() {
        return Ok(None);
    }
    required_mac(name, field).map(Some)
}

/// Parse one capture record.
///
/// Rejects records with fewer than the full eleven fields, an empty required
/// field, or an all-zero transmitter address. Extra trailing fields are
/// ignored. Rejection carries no state change anywhere else.
pub fn parse_record(line: &str) -> Result<FrameRecord, RecordError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < EXPECTED_FIELDS {
        return Err(RecordError::FieldCount(fields.len()));
    }
    if fields[4].is_empty() {
        return Err(RecordError::EmptyField("packetLength"));
    }

    let ta = required_mac("ta", fields[0])?;
    if ta.is_zero() {
        return Err(RecordError::ZeroTransmitter);
    }
    let ra = required_mac("ra", fields[1])?;
    let sa = optional_mac("sa", fields[2])?;
    let da = optional_mac("da", fields[3])?;
    let packet_length = fields[4]
        .parse()
        .map_err(|_| RecordError::InvalidField("packetLength", fields[4].to_string()))?;
    let bssid = optional_mac("bssid", fields[6])?;

    Ok(FrameRecord {
        ta,
        ra,
        sa,
        da,
        packet_length,
        ssid_hex: fields[5].to_string(),
        bssid,
        frequency: fields[7].parse().ok(),
        flags: fields[8].to_string(),
        frame_type: fields[9].to_string(),
        subtype: FrameSubtype::from_wire(fields[10]),
    })
}
