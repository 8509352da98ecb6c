// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use byteorder::BE;
use byteorder::ByteOrder;
use sha2::Digest;
use sha2::Sha256;

/// Modulus applied to digest byte offsets when deriving position windows.
///
/// The i-th window starts at byte `(i * 4) % 29` of the digest, so windows
/// overlap once `i >= 8`. This schedule is part of the serialized-format
/// contract and must not be changed; with a single hash only offset 0 is
/// ever used.
const DIGEST_OFFSET_MODULUS: usize = 29;

/// A Bloom filter with SHA-256-derived bit positions.
///
/// The filter owns a dense bit array packed into 32-bit words: bit `j` of
/// the filter is bit `j % 32` (least significant first) of word `j / 32`.
/// Bits at index `num_bits` and above are never set.
///
/// Inserted items always answer `true` from [`contains`](Self::contains);
/// other items answer `true` with probability bounded by the filter's
/// false-positive rate.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilter {
    /// Number of logical bits (m)
    num_bits: u32,
    /// Number of hash positions per item (k)
    num_hashes: u16,
    /// Bit array packed into u32 words, length = ceil(num_bits / 32)
    words: Vec<u32>,
}

impl BloomFilter {
    /// Creates an empty filter with `num_bits` logical bits and `num_hashes`
    /// hash positions per item.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` or `num_hashes` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use crset_cascade::bloom::BloomFilter;
    ///
    /// let filter = BloomFilter::new(100, 1);
    /// assert_eq!(filter.num_bits(), 100);
    /// assert_eq!(filter.words().len(), 4);
    /// ```
    pub fn new(num_bits: u32, num_hashes: u16) -> Self {
        assert!(num_bits > 0, "num_bits must be at least 1");
        assert!(num_hashes > 0, "num_hashes must be at least 1");

        let num_words = num_bits.div_ceil(32) as usize;
        BloomFilter {
            num_bits,
            num_hashes,
            words: vec![0u32; num_words],
        }
    }

    /// Restores a filter from a previously serialized word array.
    ///
    /// `words` must hold exactly `ceil(num_bits / 32)` entries.
    pub(crate) fn from_words(num_bits: u32, num_hashes: u16, words: Vec<u32>) -> Self {
        debug_assert_eq!(words.len(), num_bits.div_ceil(32) as usize);
        BloomFilter {
            num_bits,
            num_hashes,
            words,
        }
    }

    /// Sets the bit positions derived from `data`.
    pub fn insert(&mut self, data: impl AsRef<[u8]>) {
        let digest = Sha256::digest(data.as_ref());
        for i in 0..self.num_hashes {
            let bit = position(digest.as_slice(), i, self.num_bits);
            self.set_bit(bit);
        }
    }

    /// Tests whether every bit position derived from `data` is set.
    pub fn contains(&self, data: impl AsRef<[u8]>) -> bool {
        let digest = Sha256::digest(data.as_ref());
        (0..self.num_hashes).all(|i| self.get_bit(position(digest.as_slice(), i, self.num_bits)))
    }

    /// Returns the number of logical bits (m).
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Returns the number of hash positions per item (k).
    pub fn num_hashes(&self) -> u16 {
        self.num_hashes
    }

    /// Returns the packed word array backing the filter.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Returns the number of bits currently set.
    pub fn bits_set(&self) -> u32 {
        self.words.iter().map(|word| word.count_ones()).sum()
    }

    fn get_bit(&self, index: u32) -> bool {
        let word = (index / 32) as usize;
        let mask = 1u32 << (index % 32);
        (self.words[word] & mask) != 0
    }

    fn set_bit(&mut self, index: u32) {
        let word = (index / 32) as usize;
        let mask = 1u32 << (index % 32);
        self.words[word] |= mask;
    }
}

/// Maps the `index`-th digest window to a bit position below `num_bits`.
///
/// Reads a big-endian u32 at byte offset `(index * 4) % 29` of the 32-byte
/// digest and reduces it modulo `num_bits`. Offsets never exceed 28, so the
/// window always fits the digest.
fn position(digest: &[u8], index: u16, num_bits: u32) -> u32 {
    let offset = (index as usize * 4) % DIGEST_OFFSET_MODULUS;
    BE::read_u32(&digest[offset..offset + 4]) % num_bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let filter = BloomFilter::new(1000, 1);
        assert_eq!(filter.num_bits(), 1000);
        assert_eq!(filter.num_hashes(), 1);
        assert_eq!(filter.words().len(), 32);
        assert_eq!(filter.bits_set(), 0);
    }

    #[test]
    fn test_insert_and_contains() {
        let mut filter = BloomFilter::new(1000, 1);
        assert!(!filter.contains("abc"));

        filter.insert("abc");
        assert!(filter.contains("abc"));
        assert_eq!(filter.bits_set(), 1);
    }

    #[test]
    fn test_single_hash_sets_first_window_position() {
        let num_bits = 977;
        let mut filter = BloomFilter::new(num_bits, 1);
        filter.insert("hello");

        let digest = Sha256::digest(b"hello");
        let expected = BE::read_u32(&digest.as_slice()[..4]) % num_bits;
        assert!(filter.get_bit(expected));
        assert_eq!(filter.bits_set(), 1);
    }

    #[test]
    fn test_multi_hash_window_offsets_wrap() {
        // Offsets run 0, 4, ..., 28, then wrap to 3 for the 9th window.
        let num_bits = 4093;
        let mut filter = BloomFilter::new(num_bits, 9);
        filter.insert("wrap");
        assert!(filter.contains("wrap"));

        let digest = Sha256::digest(b"wrap");
        for i in 0..9u16 {
            let offset = (i as usize * 4) % DIGEST_OFFSET_MODULUS;
            let expected = BE::read_u32(&digest.as_slice()[offset..offset + 4]) % num_bits;
            assert!(filter.get_bit(expected), "window {i} at offset {offset}");
        }
        assert_eq!((8usize * 4) % DIGEST_OFFSET_MODULUS, 3);
    }

    #[test]
    fn test_bits_above_num_bits_stay_zero() {
        // 40 logical bits leave the top 24 bits of the last word unused.
        let mut filter = BloomFilter::new(40, 1);
        for i in 0..1000 {
            filter.insert(format!("item-{i}"));
        }
        assert_eq!(filter.words().len(), 2);
        assert_eq!(filter.words()[1] & !0xFF, 0);
    }

    #[test]
    fn test_from_words_round_trip() {
        let mut filter = BloomFilter::new(65, 1);
        filter.insert("x");
        filter.insert("y");

        let restored = BloomFilter::from_words(65, 1, filter.words().to_vec());
        assert_eq!(restored, filter);
        assert!(restored.contains("x"));
        assert!(restored.contains("y"));
    }

    #[test]
    #[should_panic(expected = "num_bits must be at least 1")]
    fn test_zero_bits_panics() {
        BloomFilter::new(0, 1);
    }

    #[test]
    #[should_panic(expected = "num_hashes must be at least 1")]
    fn test_zero_hashes_panics() {
        BloomFilter::new(8, 0);
    }
}
