//! Sample input generation for smoke testing.
//!
//! Generated data is a sequence of sections with different statistics,
//! so the size of the resulting container says something about the codec:
//! - runs of one byte (compress to ~1 bit per byte)
//! - English-like letters with skewed frequencies
//! - short repeating patterns (Huffman cannot exploit the repetition,
//!   only the byte distribution)
//! - uniformly random bytes (grow slightly)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Upper bound on a single section.
const MAX_SECTION: usize = 8192;

/// Letters roughly weighted by English frequency, space most common.
const TEXT_ALPHABET: &[u8] = b"     eeeeeetttttaaaaoooiiinnnsssrrhhlldcumfpgwybvk.,\n";

#[derive(Debug, Clone, Copy)]
enum Section {
    Run,
    Text,
    Pattern,
    Noise,
}

impl Section {
    fn pick(rng: &mut ChaCha8Rng) -> Self {
        match rng.gen_range(0..10) {
            0..=1 => Section::Run,
            2..=5 => Section::Text,
            6..=7 => Section::Pattern,
            _ => Section::Noise,
        }
    }
}

/// Generate `size_bytes` bytes of mixed-compressibility data.
///
/// The same seed always yields the same bytes.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let len = rng.gen_range(1..=MAX_SECTION).min(size_bytes - data.len());

        match Section::pick(&mut rng) {
            Section::Run => {
                let byte: u8 = rng.gen();
                data.resize(data.len() + len, byte);
            }
            Section::Text => {
                data.extend((0..len).map(|_| TEXT_ALPHABET[rng.gen_range(0..TEXT_ALPHABET.len())]));
            }
            Section::Pattern => {
                let pattern: Vec<u8> = (0..rng.gen_range(4..=32)).map(|_| rng.gen()).collect();
                data.extend(pattern.iter().cycle().take(len));
            }
            Section::Noise => {
                data.extend((0..len).map(|_| rng.gen::<u8>()));
            }
        }
    }

    data
}
