//! huffpack-core: lossless whole-file compression with canonical Huffman coding
//!
//! The crate turns any byte buffer into a self-describing `.huf` container
//! and back, byte for byte, including empty and single-symbol inputs.
//!
//! # Architecture
//!
//! Components, leaf-first:
//! - `frequency`: byte counts plus the reserved end-of-stream symbol
//! - `huffman`: deterministic tree construction and canonical codes
//! - `bitio`: MSB-first bit writer and reader
//! - `container`: header layout, parsing and validation
//! - `engine`: compress / decompress / inspect entry points
//! - `metrics`: per-call sizes and timing
//!
//! # Example
//! ```
//! let container = huffpack_core::compress(b"AAAAAAAABBBCCD").unwrap();
//! let restored = huffpack_core::decompress(&container).unwrap();
//! assert_eq!(restored, b"AAAAAAAABBBCCD");
//! ```
//!
//! # Design Principles
//!
//! - **No panics**: damaged containers produce structured errors
//! - **Deterministic**: the same input always yields the same container
//! - **Self-contained**: containers carry everything needed to decode them

pub mod bitio;
pub mod container;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod huffman;
pub mod metrics;

// Re-export commonly used types
pub use container::ContainerInfo;
pub use engine::{compress, compress_with_stats, decompress, decompress_with_stats, inspect};
pub use error::{Error, Result};
pub use metrics::{CompressionStats, Operation};
