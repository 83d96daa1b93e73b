//! Property-based tests for the codec.
//!
//! These tests verify that codec properties hold across a wide range of inputs:
//! - decompress(compress(s)) == s for every byte sequence
//! - compress is deterministic
//! - every code table is a prefix code with lengths >= 1

use proptest::prelude::*;

use huffpack_core::frequency::FrequencyTable;
use huffpack_core::huffman::{build_code_table, CodeTable};
use huffpack_core::{compress, decompress};

/// Strategy for inputs drawn from a small alphabet, so symbols repeat.
fn small_alphabet_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"abcde\n".to_vec()), 0..2048)
}

/// Strategy for arbitrary bytes.
fn any_bytes_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..4096)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    })]

    /// Property: any byte sequence survives a round trip.
    #[test]
    fn prop_round_trip(input in any_bytes_strategy()) {
        let container = compress(&input).unwrap();
        prop_assert_eq!(decompress(&container).unwrap(), input);
    }

    /// Property: repetitive inputs survive a round trip.
    #[test]
    fn prop_round_trip_small_alphabet(input in small_alphabet_strategy()) {
        let container = compress(&input).unwrap();
        prop_assert_eq!(decompress(&container).unwrap(), input);
    }

    /// Property: a run of one byte survives a round trip.
    #[test]
    fn prop_round_trip_single_byte_run(byte in any::<u8>(), len in 0usize..5000) {
        let input = vec![byte; len];
        let container = compress(&input).unwrap();
        prop_assert_eq!(decompress(&container).unwrap(), input);
    }

    /// Property: two compressions of the same input are byte-identical.
    #[test]
    fn prop_deterministic(input in small_alphabet_strategy()) {
        prop_assert_eq!(compress(&input).unwrap(), compress(&input).unwrap());
    }

    /// Property: derived codes form a prefix code and cover every present symbol.
    #[test]
    fn prop_prefix_free(input in any_bytes_strategy()) {
        let freqs = FrequencyTable::from_bytes(&input);
        let (_, table) = build_code_table(&freqs).unwrap();

        prop_assert!(table.is_prefix_free());
        prop_assert_eq!(table.len(), freqs.distinct_symbols());
        for (symbol, _) in freqs.present_symbols() {
            let code = table.get(symbol);
            prop_assert!(code.is_some());
            prop_assert!(code.unwrap().length >= 1);
        }

        // header lengths rebuild the same codes
        let rebuilt = CodeTable::from_lengths(&table.lengths()).unwrap();
        prop_assert_eq!(rebuilt, table);
    }
}
