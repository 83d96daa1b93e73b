//! Per-invocation statistics for compress and decompress calls.
//!
//! The engine fills one `CompressionStats` per call; the binary prints it
//! with `--stats`. Nothing here is shared between calls.

use std::time::{Duration, Instant};

/// Which way the data went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compress,
    Decompress,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Compress => "compress",
            Operation::Decompress => "decompress",
        }
    }
}

/// Sizes and timing of a single engine call.
#[derive(Debug, Clone)]
pub struct CompressionStats {
    pub operation: Operation,

    /// When the call started
    pub start_time: Instant,

    /// When the call ended (set on completion)
    pub end_time: Option<Instant>,

    // === Sizes ===
    /// Uncompressed size in bytes
    pub raw_bytes: u64,

    /// Full container size in bytes (header + payload)
    pub container_bytes: u64,

    /// Header part of the container
    pub header_bytes: u64,

    /// Payload bits, excluding padding
    pub payload_bits: u64,

    // === Code table ===
    /// Symbols with a code, END_OF_STREAM included
    pub distinct_symbols: usize,

    /// Longest code in the table
    pub max_code_length: u8,
}

impl CompressionStats {
    /// Create stats with the start time set to now.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            start_time: Instant::now(),
            end_time: None,
            raw_bytes: 0,
            container_bytes: 0,
            header_bytes: 0,
            payload_bits: 0,
            distinct_symbols: 0,
            max_code_length: 0,
        }
    }

    /// Mark the call as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration (or elapsed so far if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Container size over raw size. 0.0 for an empty input.
    pub fn compression_ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.container_bytes as f64 / self.raw_bytes as f64
        }
    }

    /// Average payload bits per input byte. 0.0 for an empty input.
    pub fn bits_per_byte(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.payload_bits as f64 / self.raw_bytes as f64
        }
    }

    /// Raw bytes processed per second.
    pub fn throughput_bps(&self) -> f64 {
        let secs = self.duration().as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.raw_bytes as f64 / secs
        }
    }

    /// Human-readable summary.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== {} ===\n", self.operation.as_str()));
        out.push_str(&format!("Duration: {} ms\n", self.duration().as_millis()));
        out.push_str(&format!("Raw: {} bytes\n", self.raw_bytes));
        out.push_str(&format!(
            "Container: {} bytes (header {}, payload {} bits)\n",
            self.container_bytes, self.header_bytes, self.payload_bits
        ));
        out.push_str(&format!("Ratio: {:.1}%\n", self.compression_ratio() * 100.0));
        out.push_str(&format!("Bits/byte: {:.3}\n", self.bits_per_byte()));
        out.push_str(&format!(
            "Symbols: {} (longest code {} bits)\n",
            self.distinct_symbols, self.max_code_length
        ));
        out.push_str(&format!(
            "Throughput: {:.2} MB/s\n",
            self.throughput_bps() / 1_000_000.0
        ));
        out
    }

    /// Export as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "operation={}\n\
             duration_ms={}\n\
             raw_bytes={}\n\
             container_bytes={}\n\
             header_bytes={}\n\
             payload_bits={}\n\
             compression_ratio={:.4}\n\
             distinct_symbols={}\n\
             max_code_length={}\n",
            self.operation.as_str(),
            self.duration().as_millis(),
            self.raw_bytes,
            self.container_bytes,
            self.header_bytes,
            self.payload_bits,
            self.compression_ratio(),
            self.distinct_symbols,
            self.max_code_length,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_creation() {
        let stats = CompressionStats::new(Operation::Compress);
        assert!(stats.end_time.is_none());
        assert!(stats.duration().as_millis() < 100);
    }

    #[test]
    fn test_ratios() {
        let mut stats = CompressionStats::new(Operation::Compress);
        assert_eq!(stats.compression_ratio(), 0.0);
        assert_eq!(stats.bits_per_byte(), 0.0);

        stats.raw_bytes = 1000;
        stats.container_bytes = 750;
        stats.payload_bits = 4000;
        assert_eq!(stats.compression_ratio(), 0.75);
        assert_eq!(stats.bits_per_byte(), 4.0);
    }

    #[test]
    fn test_complete_freezes_duration() {
        let mut stats = CompressionStats::new(Operation::Decompress);
        std::thread::sleep(Duration::from_millis(5));
        stats.complete();
        let first = stats.duration();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(stats.duration(), first);
    }

    #[test]
    fn test_export_text() {
        let mut stats = CompressionStats::new(Operation::Decompress);
        stats.raw_bytes = 14;
        stats.container_bytes = 38;
        stats.distinct_symbols = 5;

        let text = stats.export_text();
        assert!(text.contains("operation=decompress"));
        assert!(text.contains("raw_bytes=14"));
        assert!(text.contains("container_bytes=38"));
        assert!(text.contains("distinct_symbols=5"));
        assert!(stats.summary().contains("=== decompress ==="));
    }
}
