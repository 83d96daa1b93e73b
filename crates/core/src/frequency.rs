//! Byte frequency counting.
//!
//! The alphabet has 257 symbols: the 256 byte values plus `END_OF_STREAM`,
//! which never occurs in input but always gets a count of exactly 1 so the
//! decoder has an unambiguous place to stop.

/// A symbol is a byte value (0-255) or `END_OF_STREAM`.
pub type Symbol = u16;

/// Reserved symbol terminating every payload.
pub const END_OF_STREAM: Symbol = 256;

/// Number of distinct symbols, including `END_OF_STREAM`.
pub const ALPHABET_SIZE: usize = 257;

/// Occurrence count for every symbol of one input.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; ALPHABET_SIZE];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        counts[END_OF_STREAM as usize] = 1;
        Self { counts }
    }

    /// Occurrences of `symbol` (0 for anything outside the alphabet).
    pub fn count(&self, symbol: Symbol) -> u64 {
        self.counts.get(symbol as usize).copied().unwrap_or(0)
    }

    /// `(symbol, count)` for every symbol with a non-zero count, in
    /// ascending symbol order. `END_OF_STREAM` is always last.
    pub fn present_symbols(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as Symbol, count))
    }

    /// Number of symbols with a non-zero count, `END_OF_STREAM` included.
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    /// Number of input bytes counted.
    pub fn total_bytes(&self) -> u64 {
        self.counts[..256].iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_has_only_end_of_stream() {
        let table = FrequencyTable::from_bytes(b"");
        assert_eq!(table.distinct_symbols(), 1);
        assert_eq!(table.total_bytes(), 0);
        assert_eq!(
            table.present_symbols().collect::<Vec<_>>(),
            vec![(END_OF_STREAM, 1)]
        );
    }

    #[test]
    fn test_counts() {
        let table = FrequencyTable::from_bytes(b"AAAAAAAABBBCCD");
        assert_eq!(table.count(b'A' as Symbol), 8);
        assert_eq!(table.count(b'B' as Symbol), 3);
        assert_eq!(table.count(b'C' as Symbol), 2);
        assert_eq!(table.count(b'D' as Symbol), 1);
        assert_eq!(table.count(b'E' as Symbol), 0);
        assert_eq!(table.count(END_OF_STREAM), 1);
        assert_eq!(table.count(999), 0);
        assert_eq!(table.total_bytes(), 14);
        assert_eq!(table.distinct_symbols(), 5);
    }

    #[test]
    fn test_end_of_stream_is_always_one() {
        let data = vec![0xFFu8; 10_000];
        let table = FrequencyTable::from_bytes(&data);
        assert_eq!(table.count(END_OF_STREAM), 1);
        assert_eq!(table.count(0xFF), 10_000);

        let last = table.present_symbols().last().unwrap();
        assert_eq!(last, (END_OF_STREAM, 1));
    }

    #[test]
    fn test_deterministic() {
        let data: Vec<u8> = (0..=255u8).cycle().take(3000).collect();
        assert_eq!(
            FrequencyTable::from_bytes(&data),
            FrequencyTable::from_bytes(&data)
        );
    }
}
