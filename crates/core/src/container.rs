//! `.huf` container serialization and parsing.
//!
//! A container is a self-describing header followed by the bit-packed
//! payload. The header carries canonical code lengths rather than the
//! tree, which is enough for the decoder to rebuild the exact codes.
//!
//! # Container Format
//!
//! ```text
//! +----------------------+
//! | Magic (4 bytes)      |  "HUFF"
//! +----------------------+
//! | version (1)          |  format version, currently 1
//! +----------------------+
//! | original_len (8)     |  u64 little-endian, input size in bytes
//! +----------------------+
//! | crc32 (4)            |  u32 CRC-32 of the original bytes
//! +----------------------+
//! | symbol_count (2)     |  u16 number of code-length entries (1..=257)
//! +----------------------+
//! | entries              |  symbol_count x (symbol u16, length u8),
//! | (3 bytes each)       |  strictly ascending by symbol
//! +----------------------+
//! | payload              |  MSB-first codes, END_OF_STREAM last,
//! | (rest of the file)   |  zero-padded to a byte boundary
//! +----------------------+
//! ```
//!
//! The payload has no length field: decoding stops at the end-of-stream
//! code, so a container cut short anywhere in its payload fails as
//! truncated instead of being caught by a size check.

use crate::error::{Error, Result};
use crate::frequency::{Symbol, ALPHABET_SIZE, END_OF_STREAM};
use crate::huffman::CodeTable;

/// Magic number for containers: "HUFF"
pub const MAGIC: [u8; 4] = *b"HUFF";

/// Format version written by this build. Anything else is refused.
pub const VERSION: u8 = 1;

/// Size of the fixed part of the header in bytes
pub const HEADER_SIZE: usize = 19;

/// Size of one code-length entry
const ENTRY_SIZE: usize = 3;

/// Parsed container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Number of bytes in the original input
    pub original_len: u64,

    /// CRC-32 of the original input
    pub crc32: u32,

    /// Canonical codes rebuilt from the stored lengths
    pub code_table: CodeTable,
}

impl ContainerHeader {
    /// Bytes this header occupies once serialized.
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.code_table.len() * ENTRY_SIZE
    }

    /// Append the serialized header to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        let symbol_count = self.code_table.len() as u16;

        out.extend_from_slice(&MAGIC);
        out.push(VERSION);
        out.extend_from_slice(&self.original_len.to_le_bytes());
        out.extend_from_slice(&self.crc32.to_le_bytes());
        out.extend_from_slice(&symbol_count.to_le_bytes());

        for (symbol, code) in self.code_table.iter() {
            out.extend_from_slice(&symbol.to_le_bytes());
            out.push(code.length);
        }
    }
}

/// A parsed container borrowing its payload from the input buffer.
#[derive(Debug, Clone)]
pub struct Container<'a> {
    pub header: ContainerHeader,
    pub payload: &'a [u8],
}

/// Serialize a header and payload into a complete container.
pub fn write_container(header: &ContainerHeader, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(header.encoded_len() + payload.len());
    header.write_to(&mut out);
    out.extend_from_slice(payload);
    out
}

/// Parse a container, validating everything in the header.
///
/// # Errors
/// `Error::CorruptHeader` if the buffer is too short for the header, the
/// magic or version is unrecognized, or the code-length table is
/// malformed or does not describe a usable prefix code. The version is
/// checked before anything past it is read.
pub fn parse_container(bytes: &[u8]) -> Result<Container<'_>> {
    if bytes.len() < MAGIC.len() + 1 {
        return Err(Error::corrupt_header(format!(
            "container too short: {} bytes",
            bytes.len()
        )));
    }

    let magic = &bytes[0..4];
    if magic != MAGIC {
        return Err(Error::corrupt_header(format!(
            "invalid magic number: expected {MAGIC:?}, got {magic:?}"
        )));
    }

    let version = bytes[4];
    if version != VERSION {
        return Err(Error::corrupt_header(format!(
            "unsupported version {version} (this build reads version {VERSION})"
        )));
    }

    if bytes.len() < HEADER_SIZE {
        return Err(Error::corrupt_header(format!(
            "header too short: need at least {HEADER_SIZE} bytes, got {}",
            bytes.len()
        )));
    }

    let original_len = u64::from_le_bytes(read_array(bytes, 5));
    let crc32 = u32::from_le_bytes(read_array(bytes, 13));
    let symbol_count = u16::from_le_bytes(read_array(bytes, 17)) as usize;

    if symbol_count == 0 || symbol_count > ALPHABET_SIZE {
        return Err(Error::corrupt_header(format!(
            "symbol count {symbol_count} outside 1..={ALPHABET_SIZE}"
        )));
    }

    let table_end = HEADER_SIZE + symbol_count * ENTRY_SIZE;
    if bytes.len() < table_end {
        return Err(Error::corrupt_header(format!(
            "code-length table needs {table_end} bytes, container has {}",
            bytes.len()
        )));
    }

    let lengths = parse_code_lengths(&bytes[HEADER_SIZE..table_end])?;
    let code_table =
        CodeTable::from_lengths(&lengths).map_err(|e| Error::corrupt_header(e.to_string()))?;

    Ok(Container {
        header: ContainerHeader {
            original_len,
            crc32,
            code_table,
        },
        payload: &bytes[table_end..],
    })
}

fn parse_code_lengths(entries: &[u8]) -> Result<[u8; ALPHABET_SIZE]> {
    let mut lengths = [0u8; ALPHABET_SIZE];
    let mut previous: Option<Symbol> = None;

    for entry in entries.chunks_exact(ENTRY_SIZE) {
        let symbol = Symbol::from_le_bytes([entry[0], entry[1]]);
        let length = entry[2];

        if symbol > END_OF_STREAM {
            return Err(Error::corrupt_header(format!(
                "symbol {symbol} outside the alphabet"
            )));
        }
        if previous.is_some_and(|p| p >= symbol) {
            return Err(Error::corrupt_header(format!(
                "code-length entries not strictly ascending at symbol {symbol}"
            )));
        }
        if length == 0 {
            return Err(Error::corrupt_header(format!(
                "symbol {symbol} listed with zero code length"
            )));
        }

        lengths[symbol as usize] = length;
        previous = Some(symbol);
    }

    if lengths[END_OF_STREAM as usize] == 0 {
        return Err(Error::corrupt_header("end-of-stream symbol has no code"));
    }

    Ok(lengths)
}

fn read_array<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[offset..offset + N]);
    out
}

/// Header summary of a container, without decoding its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub version: u8,
    pub original_len: u64,
    pub crc32: u32,
    pub header_len: usize,
    pub payload_len: usize,
    /// `(symbol, code length)` for every coded symbol, ascending by symbol
    pub code_lengths: Vec<(Symbol, u8)>,
}

impl ContainerInfo {
    pub fn from_container(container: &Container<'_>) -> Self {
        Self {
            version: VERSION,
            original_len: container.header.original_len,
            crc32: container.header.crc32,
            header_len: container.header.encoded_len(),
            payload_len: container.payload.len(),
            code_lengths: container
                .header
                .code_table
                .iter()
                .map(|(symbol, code)| (symbol, code.length))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::huffman::build_code_table;

    fn sample_header(data: &[u8]) -> ContainerHeader {
        let (_, code_table) = build_code_table(&FrequencyTable::from_bytes(data)).unwrap();
        ContainerHeader {
            original_len: data.len() as u64,
            crc32: crc32fast::hash(data),
            code_table,
        }
    }

    #[test]
    fn test_header_layout() {
        let header = sample_header(b"AAAAAAAABBBCCD");
        let bytes = write_container(&header, &[0xAA, 0xBB]);

        assert_eq!(&bytes[0..4], b"HUFF");
        assert_eq!(bytes[4], VERSION);
        assert_eq!(u64::from_le_bytes(bytes[5..13].try_into().unwrap()), 14);
        assert_eq!(u16::from_le_bytes(bytes[17..19].try_into().unwrap()), 5);
        // first entry: 'A' with length 1
        assert_eq!(&bytes[19..22], &[b'A', 0, 1]);
        // last entry: END_OF_STREAM (256) with length 4
        assert_eq!(&bytes[31..34], &[0, 1, 4]);
        assert_eq!(&bytes[34..], &[0xAA, 0xBB]);
        assert_eq!(header.encoded_len(), 34);
    }

    #[test]
    fn test_parse_written_header() {
        let header = sample_header(b"hello, container");
        let bytes = write_container(&header, &[1, 2, 3]);

        let container = parse_container(&bytes).unwrap();
        assert_eq!(container.header, header);
        assert_eq!(container.payload, &[1, 2, 3]);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let header = sample_header(b"abc");
        let mut bytes = write_container(&header, &[0xFF; 16]);
        bytes[4] = 2;

        let err = parse_container(&bytes).unwrap_err();
        assert!(matches!(err, Error::CorruptHeader { .. }));
        assert!(err.to_string().contains("unsupported version 2"));

        // even a bare magic + version is judged on the version alone
        let err = parse_container(b"HUFF\x07").unwrap_err();
        assert!(err.to_string().contains("unsupported version 7"));
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = vec![0xFF, 0xFF, 0xFF, 0xFF, VERSION];
        bytes.extend_from_slice(&[0u8; 30]);
        assert!(matches!(
            parse_container(&bytes),
            Err(Error::CorruptHeader { .. })
        ));
    }

    #[test]
    fn test_short_inputs() {
        for len in [0, 3, 5, 18] {
            let header = sample_header(b"xy");
            let bytes = write_container(&header, &[]);
            assert!(
                matches!(parse_container(&bytes[..len]), Err(Error::CorruptHeader { .. })),
                "len {len}"
            );
        }

        // table shorter than symbol_count promises
        let header = sample_header(b"xyz");
        let bytes = write_container(&header, &[]);
        assert!(parse_container(&bytes[..bytes.len() - 1]).is_err());
    }

    fn raw_container(entries: &[(u16, u8)]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC);
        bytes.push(VERSION);
        bytes.extend_from_slice(&0u64.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&(entries.len() as u16).to_le_bytes());
        for &(symbol, length) in entries {
            bytes.extend_from_slice(&symbol.to_le_bytes());
            bytes.push(length);
        }
        bytes.push(0);
        bytes
    }

    #[test]
    fn test_inconsistent_tables_rejected() {
        let cases: &[&[(u16, u8)]] = &[
            // no entries
            &[],
            // symbol outside the alphabet
            &[(65, 1), (300, 1)],
            // not ascending
            &[(256, 1), (65, 1)],
            // duplicate
            &[(65, 1), (65, 1), (256, 1)],
            // zero length
            &[(65, 0), (256, 1)],
            // missing END_OF_STREAM
            &[(65, 1), (66, 1)],
            // oversubscribed
            &[(65, 1), (66, 1), (256, 1)],
            // incomplete
            &[(65, 1), (256, 2)],
            // too long
            &[(65, 1), (256, 65)],
        ];

        for entries in cases {
            let bytes = raw_container(entries);
            assert!(
                matches!(parse_container(&bytes), Err(Error::CorruptHeader { .. })),
                "accepted {entries:?}"
            );
        }
    }

    #[test]
    fn test_lone_end_of_stream_accepted() {
        let bytes = raw_container(&[(256, 1)]);
        let container = parse_container(&bytes).unwrap();
        assert_eq!(container.header.code_table.len(), 1);
        assert_eq!(container.payload, &[0]);
    }

    #[test]
    fn test_info() {
        let header = sample_header(b"AAAAAAAABBBCCD");
        let bytes = write_container(&header, &[0; 4]);
        let info = ContainerInfo::from_container(&parse_container(&bytes).unwrap());

        assert_eq!(info.version, VERSION);
        assert_eq!(info.original_len, 14);
        assert_eq!(info.header_len, 34);
        assert_eq!(info.payload_len, 4);
        assert_eq!(info.code_lengths[0], (b'A' as Symbol, 1));
        assert_eq!(info.code_lengths.last(), Some(&(END_OF_STREAM, 4)));
    }
}
