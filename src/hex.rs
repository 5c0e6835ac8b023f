//! Parses the line-oriented hex-record format into a packed 128-byte image.
//!
//! Each line has the form `Xaa:dddd…`: the first character is ignored, `aa`
//! is a two-hex-digit starting nibble address, a colon separates address
//! from data, and every following character is one nibble stored at
//! consecutive addresses starting at `aa`. Trailing whitespace is stripped.

use crate::error::Error;
use crate::memory::{MemoryImage, IMAGE_BYTES, NIBBLE_COUNT};

/// Parses `text` and returns the packed 128-byte image it describes.
pub fn pack_hex(text: &str) -> Result<[u8; IMAGE_BYTES], Error> {
    let mut image = MemoryImage::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim_end();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;

        let body = line.get(1..).ok_or_else(|| Error::HexRecord {
            line: line_no,
            reason: "line is shorter than the leading tag character".to_string(),
        })?;

        let (addr_str, data) = body.split_once(':').ok_or_else(|| Error::HexRecord {
            line: line_no,
            reason: "missing ':' separating address from data".to_string(),
        })?;

        if addr_str.len() != 2 {
            return Err(Error::HexRecord {
                line: line_no,
                reason: format!("address field must be 2 hex digits, got {:?}", addr_str),
            });
        }
        let start = u8::from_str_radix(addr_str, 16).map_err(|e| Error::HexRecord {
            line: line_no,
            reason: format!("invalid address {:?}: {e}", addr_str),
        })?;

        for (offset, ch) in data.chars().enumerate() {
            let addr = usize::from(start) + offset;
            if addr >= NIBBLE_COUNT {
                return Err(Error::HexRecord {
                    line: line_no,
                    reason: format!("data runs past the last nibble address at offset {offset}"),
                });
            }
            let nibble = ch.to_digit(16).ok_or_else(|| Error::HexRecord {
                line: line_no,
                reason: format!("{ch:?} is not a hex digit"),
            })?;
            image.write_nibble(addr as u8, nibble as u8);
        }
    }

    Ok(image.read_byte_image())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_a_single_record_at_its_starting_address() {
        let image = pack_hex("X00:83\n").unwrap();
        let mem = {
            let mut m = MemoryImage::new();
            m.load_byte_image(image);
            m
        };
        assert_eq!(mem.read_nibble(0x00), 0x8);
        assert_eq!(mem.read_nibble(0x01), 0x3);
    }

    #[test]
    fn strips_trailing_whitespace() {
        let image = pack_hex("X00:83   \n").unwrap();
        let mut mem = MemoryImage::new();
        mem.load_byte_image(image);
        assert_eq!(mem.read_nibble(0x01), 0x3);
    }

    #[test]
    fn multiple_records_at_different_addresses_both_land() {
        let image = pack_hex("X00:81\nX50:AB\n").unwrap();
        let mut mem = MemoryImage::new();
        mem.load_byte_image(image);
        assert_eq!(mem.read_nibble(0x00), 0x8);
        assert_eq!(mem.read_nibble(0x01), 0x1);
        assert_eq!(mem.read_nibble(0x50), 0xA);
        assert_eq!(mem.read_nibble(0x51), 0xB);
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert!(pack_hex("X00:81\n\nX01:2\n").is_ok());
    }

    #[test]
    fn missing_colon_is_a_hex_record_error() {
        let err = pack_hex("X0081\n").unwrap_err();
        assert!(matches!(err, Error::HexRecord { line: 1, .. }));
    }

    #[test]
    fn non_hex_digit_is_a_hex_record_error() {
        let err = pack_hex("X00:8G\n").unwrap_err();
        assert!(matches!(err, Error::HexRecord { line: 1, .. }));
    }

    #[test]
    fn data_past_the_last_address_is_a_hex_record_error() {
        let err = pack_hex("XFE:000\n").unwrap_err();
        assert!(matches!(err, Error::HexRecord { line: 1, .. }));
    }
}
