//! Decoding helpers for fields carried in capture records.

/// Sentinel emitted by the capture layer when a frame carried no SSID element.
pub const MISSING_SSID: &str = "<MISSING>";

/// Sentinel for networks that broadcast a zeroed (hidden) SSID.
pub const HIDDEN_SSID: &str = "<HIDDEN>";

pub fn slice_to_hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decode a hex-encoded SSID byte string into its display form.
///
/// The `<MISSING>` sentinel passes through unchanged and an all-zero string
/// decodes to `<HIDDEN>`. Anything that is not well-formed hex (odd length,
/// non-hex digits) is treated as a decode failure and yields an empty SSID.
pub fn decode_ssid(hex: &str) -> String {
    if hex.is_empty() || hex == MISSING_SSID {
        return hex.to_string();
    }
    if hex.bytes().all(|b| b == b'0') {
        return HIDDEN_SSID.to_string();
    }
    if !hex.is_ascii() || hex.len() % 2 != 0 {
        tracing::debug!(%hex, "malformed ssid hex");
        return String::new();
    }
    let mut decoded = String::with_capacity(hex.len() / 2);
    for pair in (0..hex.len()).step_by(2) {
        match u8::from_str_radix(&hex[pair..pair + 2], 16) {
            Ok(byte) => decoded.push(byte as char),
            Err(_) => {
                tracing::debug!(%hex, "malformed ssid hex");
                return String::new();
            }
        }
    }
    decoded
}

/// Map a radio frequency in MHz to an IEEE 802.11 channel number.
///
/// This is the simplified mapping used by the capture front end: the legacy
/// channel 14 special case, 2.4GHz numbering below it, 5GHz numbering above.
/// It intentionally does not cover every band plan.
pub fn frequency_to_channel(freq_mhz: i32) -> i32 {
    if freq_mhz == 2484 {
        return 14;
    }
    if freq_mhz < 2484 {
        return (freq_mhz - 2407) / 5;
    }
    freq_mhz / 5 - 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_ssid() {
        assert_eq!(decode_ssid("4578616d706c65"), "Example");
    }

    #[test]
    fn empty_and_missing_pass_through() {
        assert_eq!(decode_ssid(""), "");
        assert_eq!(decode_ssid(MISSING_SSID), MISSING_SSID);
    }

    #[test]
    fn all_zero_hex_is_hidden() {
        assert_eq!(decode_ssid("0000"), HIDDEN_SSID);
        assert_eq!(decode_ssid("000000000000"), HIDDEN_SSID);
        // A single zero digit still counts as an all-zero SSID.
        assert_eq!(decode_ssid("0"), HIDDEN_SSID);
    }

    #[test]
    fn malformed_hex_decodes_to_empty() {
        assert_eq!(decode_ssid("457"), "");
        assert_eq!(decode_ssid("zz"), "");
        assert_eq!(decode_ssid("Exämple"), "");
    }

    #[test]
    fn round_trips_through_hex() {
        let name = "CoffeeShop Guest";
        assert_eq!(decode_ssid(&slice_to_hex_string(name.as_bytes())), name);
    }

    #[test]
    fn channel_mapping() {
        assert_eq!(frequency_to_channel(2412), 1);
        assert_eq!(frequency_to_channel(2417), 2);
        assert_eq!(frequency_to_channel(2484), 14);
        assert_eq!(frequency_to_channel(5180), 36);
        assert_eq!(frequency_to_channel(5825), 165);
    }
}
