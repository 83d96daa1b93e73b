//! Compression engine: the entry point for whole-buffer compress and
//! decompress.
//!
//! Compress: count frequencies, build the tree, derive canonical codes,
//! write the header, then each input byte's code and the end-of-stream
//! code.
//!
//! Decompress: parse and validate the header, rebuild the decoding tree
//! from the code lengths, walk the payload one bit at a time until the
//! end-of-stream leaf, then check the decoded length and CRC against the
//! header.
//!
//! Every call works on its own buffers and tables, so calls may run on
//! separate threads without coordination.

use tracing::{debug, warn};

use crate::bitio::{BitReader, BitWriter};
use crate::container::{parse_container, write_container, ContainerHeader, ContainerInfo};
use crate::error::{Error, HuffmanError, Result};
use crate::frequency::{FrequencyTable, Symbol, END_OF_STREAM};
use crate::huffman::{build_code_table, CodeTable, DecodeTree, Link};
use crate::metrics::{CompressionStats, Operation};

/// Compress `input` into a complete container.
///
/// Any finite input is accepted, including an empty one. The only error
/// is `HuffmanError::CodeLengthTooLong`, which needs an input far larger
/// than memory can hold.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    compress_with_stats(input).map(|(container, _)| container)
}

/// Compress `input` and report sizes and timing.
pub fn compress_with_stats(input: &[u8]) -> Result<(Vec<u8>, CompressionStats)> {
    let mut stats = CompressionStats::new(Operation::Compress);

    let freqs = FrequencyTable::from_bytes(input);
    let (_, code_table) = build_code_table(&freqs)?;

    let payload_bits = code_table.encoded_bits(&freqs);
    let mut writer = BitWriter::with_capacity(payload_bits.div_ceil(8) as usize);
    for &byte in input {
        write_symbol(&mut writer, &code_table, byte as Symbol)?;
    }
    write_symbol(&mut writer, &code_table, END_OF_STREAM)?;
    debug_assert_eq!(writer.bit_len() as u64, payload_bits);
    let payload = writer.finish();

    let header = ContainerHeader {
        original_len: input.len() as u64,
        crc32: crc32fast::hash(input),
        code_table,
    };
    let container = write_container(&header, &payload);

    stats.raw_bytes = input.len() as u64;
    stats.container_bytes = container.len() as u64;
    stats.header_bytes = header.encoded_len() as u64;
    stats.payload_bits = payload_bits;
    record_table(&mut stats, &header.code_table);
    stats.complete();

    debug!(
        raw_bytes = stats.raw_bytes,
        container_bytes = stats.container_bytes,
        symbols = stats.distinct_symbols,
        "compressed"
    );

    Ok((container, stats))
}

fn write_symbol(writer: &mut BitWriter, table: &CodeTable, symbol: Symbol) -> Result<()> {
    let code = table
        .get(symbol)
        .ok_or(HuffmanError::MissingSymbol { symbol })?;
    writer.write_bits(code.bits, code.length as usize)
}

/// Restore the original bytes from a container.
///
/// # Errors
/// - `Error::CorruptHeader` for an unknown version or an inconsistent header
/// - `Error::TruncatedPayload` if the payload ends before end of stream
/// - `Error::InvalidCode` if a bit leads nowhere in the tree
/// - `Error::LengthMismatch` / `Error::ChecksumMismatch` if the decoded
///   bytes disagree with the header
pub fn decompress(container: &[u8]) -> Result<Vec<u8>> {
    decompress_with_stats(container).map(|(output, _)| output)
}

/// Decompress and report sizes and timing.
pub fn decompress_with_stats(bytes: &[u8]) -> Result<(Vec<u8>, CompressionStats)> {
    let mut stats = CompressionStats::new(Operation::Decompress);

    let container = parse_container(bytes)?;
    let header = &container.header;
    let tree = DecodeTree::from_table(&header.code_table)
        .map_err(|e| Error::corrupt_header(e.to_string()))?;

    // every decoded byte costs at least one payload bit
    let capacity = header
        .original_len
        .min(container.payload.len() as u64 * 8) as usize;
    let mut output = Vec::with_capacity(capacity);

    let mut reader = BitReader::new(container.payload);
    let mut branch = DecodeTree::ROOT;
    loop {
        let position = reader.position();
        let bit = reader
            .read_bit()
            .map_err(|_| Error::TruncatedPayload { position })?;

        match tree.step(branch, bit) {
            Link::Branch(next) => branch = next,
            Link::Leaf(END_OF_STREAM) => break,
            Link::Leaf(symbol) => {
                output.push(symbol as u8);
                branch = DecodeTree::ROOT;
                if output.len() as u64 > header.original_len {
                    return Err(Error::LengthMismatch {
                        expected: header.original_len,
                        actual: output.len() as u64,
                    });
                }
            }
            Link::Empty => return Err(Error::InvalidCode { position }),
        }
    }

    if output.len() as u64 != header.original_len {
        return Err(Error::LengthMismatch {
            expected: header.original_len,
            actual: output.len() as u64,
        });
    }

    let crc = crc32fast::hash(&output);
    if crc != header.crc32 {
        return Err(Error::ChecksumMismatch {
            expected: header.crc32,
            actual: crc,
        });
    }

    let trailing = reader.trailing_bytes();
    if trailing > 0 {
        warn!(trailing, "ignoring bytes after end of stream");
    }

    stats.raw_bytes = output.len() as u64;
    stats.container_bytes = bytes.len() as u64;
    stats.header_bytes = header.encoded_len() as u64;
    stats.payload_bits = reader.position() as u64;
    record_table(&mut stats, &header.code_table);
    stats.complete();

    debug!(
        container_bytes = stats.container_bytes,
        raw_bytes = stats.raw_bytes,
        "decompressed"
    );

    Ok((output, stats))
}

/// Parse and validate a container's header without decoding the payload.
pub fn inspect(container: &[u8]) -> Result<ContainerInfo> {
    let container = parse_container(container)?;
    Ok(ContainerInfo::from_container(&container))
}

fn record_table(stats: &mut CompressionStats, table: &CodeTable) {
    stats.distinct_symbols = table.len();
    stats.max_code_length = table.iter().map(|(_, code)| code.length).max().unwrap_or(0);
}
