//! `#RRGGBB` formatting and parsing.
//!
//! Every channel is rendered as exactly two uppercase hex digits, so zero
//! becomes `"00"` rather than an empty or one-digit string.

use palette::Srgb;

use crate::error::{ColorError, Result};

/// Two-digit uppercase hex for one channel.
pub fn channel_to_hex(value: u8) -> String {
    format!("{value:02X}")
}

/// Like [`channel_to_hex`] but for untyped integers, rejecting anything that
/// does not fit in a channel instead of emitting a malformed string.
pub fn int_to_hex(value: i64) -> Result<String> {
    let channel = u8::try_from(value).map_err(|_| ColorError::ChannelOutOfRange { value })?;
    Ok(channel_to_hex(channel))
}

/// Parse exactly two hex digits (either case) back into a channel value.
pub fn hex_to_channel(hex: &str) -> Result<u8> {
    // from_str_radix would also accept a leading '+'
    if hex.len() != 2 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex {
            input: hex.to_string(),
        });
    }
    u8::from_str_radix(hex, 16).map_err(|_| ColorError::InvalidHex {
        input: hex.to_string(),
    })
}

pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}

/// Accepts `#RRGGBB` or `RRGGBB`.
pub fn parse_hex_color(input: &str) -> Result<Srgb<u8>> {
    let hex = input.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(ColorError::InvalidHex {
            input: input.to_string(),
        });
    }
    let channel = |range: std::ops::Range<usize>| {
        hex_to_channel(&hex[range]).map_err(|_| ColorError::InvalidHex {
            input: input.to_string(),
        })
    };
    Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
