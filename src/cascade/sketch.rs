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

use std::collections::HashSet;

use crate::bloom::BloomFilter;
use crate::cascade::CascadeBuilder;
use crate::error::Error;

/// A padded Bloom filter cascade over a two-class identifier partition.
///
/// A cascade is an ordered sequence of single-hash Bloom filters that
/// together answer exact membership for every identifier supplied at
/// construction time: identifiers from the valid set answer `true`,
/// identifiers from the revoked set answer `false`. For any other input the
/// answer is a deterministic function of the salt and the random padding;
/// callers must not rely on it.
///
/// Cascades are immutable once built and safe to share across threads for
/// concurrent queries. Use [`Cascade::from_sets`] or [`Cascade::builder`] to
/// construct one and [`Cascade::from_hex`] to reconstruct a published one.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
///
/// use crset_cascade::cascade::Cascade;
/// use crset_cascade::common::random_256_bit_hex;
///
/// let valid: HashSet<String> = (0..4).map(|_| random_256_bit_hex()).collect();
/// let revoked: HashSet<String> = (0..8).map(|_| random_256_bit_hex()).collect();
///
/// let cascade = Cascade::from_sets(valid.clone(), revoked.clone(), 16).unwrap();
/// for id in &valid {
///     assert!(cascade.contains(id));
/// }
/// for id in &revoked {
///     assert!(!cascade.contains(id));
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Cascade {
    /// Raw 32-byte salt.
    salt: [u8; 32],
    /// Lowercase hex rendering of the salt, the form appended to every
    /// hashed probe.
    salt_hex: String,
    /// Filter layers; 1-based odd levels hold valid-side filters.
    layers: Vec<BloomFilter>,
}

impl Cascade {
    pub(crate) fn from_parts(salt: [u8; 32], layers: Vec<BloomFilter>) -> Self {
        Cascade {
            salt,
            salt_hex: hex::encode(salt),
            layers,
        }
    }

    /// Returns a builder for constructing a cascade from identifier sets.
    pub fn builder() -> CascadeBuilder {
        CascadeBuilder::default()
    }

    /// Builds a cascade from a valid set, a revoked set, and the padding
    /// target `r_hat`, using a fresh random salt.
    ///
    /// Equivalent to `Cascade::builder().build(valid, revoked, r_hat)`; see
    /// [`CascadeBuilder::build`] for the algorithm and its failure modes.
    pub fn from_sets(
        valid: HashSet<String>,
        revoked: HashSet<String>,
        r_hat: usize,
    ) -> Result<Cascade, Error> {
        Self::builder().build(valid, revoked, r_hat)
    }

    /// Queries membership of a single identifier.
    ///
    /// Walks the layers in order; the first layer that reports the probe
    /// absent decides the answer by the parity of its 1-based level. A miss
    /// at an odd level answers `false` (the identifier falls outside the
    /// valid-side class), a miss at an even level answers `true`. If every
    /// layer reports the probe present, the parity of the final level
    /// decides. An empty cascade answers `false`.
    pub fn contains(&self, id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        for (index, layer) in self.layers.iter().enumerate() {
            let level = index as u32 + 1;
            if !layer.contains(probe(id, level, &self.salt_hex)) {
                return level % 2 == 0;
            }
        }
        self.layers.len() % 2 == 1
    }

    /// Returns the number of layers.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Returns a read-only view of the filter layers.
    pub fn layers(&self) -> &[BloomFilter] {
        &self.layers
    }

    /// Returns the salt as a 64-character lowercase hex string.
    pub fn salt(&self) -> &str {
        &self.salt_hex
    }

    /// Returns the raw 32-byte salt.
    pub fn salt_bytes(&self) -> &[u8; 32] {
        &self.salt
    }
}

/// Encodes a 1-based level as its ASCII base-2 representation, left-padded
/// with '0' to 8 characters.
///
/// Levels of 256 and above widen past 8 characters; the padding becomes a
/// no-op there. Serialized artifacts depend on this exact encoding.
pub(crate) fn level_tag(level: u32) -> String {
    format!("{level:08b}")
}

/// Builds the hashed probe input `id + level_tag(level) + salt_hex`.
///
/// The concatenation is over the literal ASCII bytes of all three parts; the
/// salt enters as its 64-character hex rendering, not as raw bytes.
pub(crate) fn probe(id: &str, level: u32, salt_hex: &str) -> Vec<u8> {
    let tag = level_tag(level);
    let mut input = Vec::with_capacity(id.len() + tag.len() + salt_hex.len());
    input.extend_from_slice(id.as_bytes());
    input.extend_from_slice(tag.as_bytes());
    input.extend_from_slice(salt_hex.as_bytes());
    input
}
