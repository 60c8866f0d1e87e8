//! Default secondary-instance detection.

use std::io;
use std::process::Command;

use thiserror::Error;

use crate::conf::{C_INSTANCE_DEFAULT_MARKER, C_INSTANCE_LIST_PROGRAM, TUP_INSTANCE_LIST_ARGS};

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("failed to list instances: {0}")]
    Spawn(#[from] io::Error),
    #[error("instance listing exited with {0}")]
    Status(String),
    #[error("no default instance in listing")]
    NoDefault,
}

/// Ask the subsystem for its instances and return the default one.
pub fn detect_default_instance() -> Result<String, InstanceError> {
    let output = Command::new(C_INSTANCE_LIST_PROGRAM)
        .args(TUP_INSTANCE_LIST_ARGS)
        .output()?;
    if !output.status.success() {
        return Err(InstanceError::Status(output.status.to_string()));
    }

    let listing = decode_listing(&output.stdout);
    parse_default_instance(&listing).ok_or(InstanceError::NoDefault)
}

/// Decode listing bytes, which the subsystem writes as UTF-16LE on Windows.
pub fn decode_listing(raw: &[u8]) -> String {
    let b_has_bom = raw.starts_with(&[0xFF, 0xFE]);
    let b_looks_wide = raw.len() >= 2 && raw.iter().skip(1).step_by(2).any(|b| *b == 0);

    let txt = if b_has_bom || b_looks_wide {
        let raw_body = if b_has_bom { &raw[2..] } else { raw };
        let l_units: Vec<u16> = raw_body
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&l_units)
    } else {
        String::from_utf8_lossy(raw).into_owned()
    };
    txt.replace(['\0', '\u{feff}'], "")
}

/// Second whitespace field of the first row carrying the default marker.
pub fn parse_default_instance(listing: &str) -> Option<String> {
    listing
        .lines()
        .filter(|line| line.contains(C_INSTANCE_DEFAULT_MARKER))
        .find_map(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{decode_listing, parse_default_instance};

    const C_LISTING: &str = "  NAME              STATE           VERSION\r\n\
        * Ubuntu-22.04      Running         2\r\n  \
        docker-desktop    Stopped         2\r\n";

    fn encode_utf16le(txt: &str, b_with_bom: bool) -> Vec<u8> {
        let mut raw = Vec::new();
        if b_with_bom {
            raw.extend_from_slice(&[0xFF, 0xFE]);
        }
        for unit in txt.encode_utf16() {
            raw.extend_from_slice(&unit.to_le_bytes());
        }
        raw
    }

    #[test]
    fn parses_default_row() {
        assert_eq!(
            parse_default_instance(C_LISTING),
            Some("Ubuntu-22.04".to_string())
        );
    }

    #[test]
    fn missing_marker_yields_none() {
        let listing = "  NAME      STATE     VERSION\n  Debian    Stopped   2\n";
        assert_eq!(parse_default_instance(listing), None);
        assert_eq!(parse_default_instance(""), None);
    }

    #[test]
    fn marker_row_without_name_is_skipped() {
        let listing = "*\n* Alpine Running 2\n";
        assert_eq!(parse_default_instance(listing), Some("Alpine".to_string()));
    }

    #[test]
    fn decodes_wide_output_with_and_without_bom() {
        for b_with_bom in [true, false] {
            let raw = encode_utf16le(C_LISTING, b_with_bom);
            let listing = decode_listing(&raw);
            assert!(!listing.contains('\0'));
            assert_eq!(
                parse_default_instance(&listing),
                Some("Ubuntu-22.04".to_string())
            );
        }
    }

    #[test]
    fn decodes_narrow_output() {
        assert_eq!(decode_listing(C_LISTING.as_bytes()), C_LISTING);
    }
}
