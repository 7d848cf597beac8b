use std::fmt::Write;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

const BYTES_PER_LINE: usize = 16;
// Columns taken by "0000" plus two spaces, and by 16 "xx" separated by one space.
const OFFSET_COLUMNS: usize = 6;
const HEX_COLUMNS: usize = BYTES_PER_LINE * 3 - 1;

/// Decodes a hex string (no separators) into at most `capacity` bytes.
///
/// The whole string is validated before any byte is produced.
pub fn decode_hex(hex: &str, capacity: usize) -> Result<Vec<u8>> {
    if hex.len() % 2 == 1 {
        return Err(Error::OddHexLength { len: hex.len() });
    }
    if hex.len() / 2 > capacity {
        return Err(Error::HexTooLarge {
            bytes: hex.len() / 2,
            capacity,
        });
    }
    if let Some(position) = hex.bytes().position(|b| !b.is_ascii_hexdigit()) {
        return Err(Error::NonHexCharacter {
            position,
            rest: hex.get(position..).unwrap_or_default().to_string(),
        });
    }

    Ok(hex
        .as_bytes()
        .chunks_exact(2)
        .map(|pair| (nibble(pair[0]) << 4) | nibble(pair[1]))
        .collect())
}

fn nibble(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

pub fn encode_hex(data: &[u8]) -> String {
    data.iter().fold(String::with_capacity(data.len() * 2), |mut out, byte| {
        let _ = write!(out, "{:02x}", byte);
        out
    })
}

/// Renders `data` the way Wireshark's "Copy as Hex Dump" does:
///
/// ```text
/// 0000  01 00 5e 00 00 16 00 11 22 33 44 55 08 00 46 c0   ..^....."3DU..F.
/// ```
pub fn format_hexdump(data: &[u8]) -> String {
    let mut result = String::new();

    for (i, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        let hex = chunk
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect::<Vec<_>>()
            .join(" ");
        let ascii: String = chunk
            .iter()
            .map(|&byte| {
                if byte.is_ascii_graphic() {
                    byte as char
                } else {
                    '.'
                }
            })
            .collect();

        let _ = writeln!(
            result,
            "{:04x}  {:<width$}   {}",
            i * BYTES_PER_LINE,
            hex,
            ascii,
            width = HEX_COLUMNS
        );
    }

    result
}

/// Splits a hex dump into one hex string per packet.
///
/// An offset of `0000` starts a new packet and a blank line ends the current
/// one. Lines that carry no `xxxx  ` offset are skipped.
pub fn parse_hex_dump(text: &str) -> Vec<String> {
    let mut packets = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                packets.push(std::mem::take(&mut current));
            }
            continue;
        }

        let Some(offset) = dump_offset(line) else {
            continue;
        };
        if offset == 0 && !current.is_empty() {
            packets.push(std::mem::take(&mut current));
        }
        current.extend(
            line.chars()
                .skip(OFFSET_COLUMNS)
                .take(HEX_COLUMNS)
                .filter(|c| !c.is_whitespace()),
        );
    }

    if !current.is_empty() {
        packets.push(current);
    }
    packets
}

fn dump_offset(line: &str) -> Option<usize> {
    let offset = line.get(..4)?;
    if !offset.bytes().all(|b| b.is_ascii_hexdigit()) || line.get(4..OFFSET_COLUMNS) != Some("  ") {
        return None;
    }
    usize::from_str_radix(offset, 16).ok()
}

/// Reads a hex dump file and returns the hex string of every packet in it.
pub fn read_dump_file(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|source| Error::DumpFile {
        path: path.to_path_buf(),
        source,
    })?;
    let packets = parse_hex_dump(&text);
    if packets.is_empty() {
        return Err(Error::NoFrames(path.display().to_string()));
    }
    Ok(packets)
}
