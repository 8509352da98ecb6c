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

use tracing::debug;

use crate::bloom::BloomFilter;
use crate::cascade::Cascade;
use crate::cascade::sketch::probe;
use crate::common::random_256_bit_hex;
use crate::common::random_salt;
use crate::error::Error;

/// Target false-positive rate for the first layer, `sqrt(0.5) / 2`.
const LAYER_ONE_FP_RATE: f64 = std::f64::consts::FRAC_1_SQRT_2 / 2.0;

/// Target false-positive rate for every layer after the first.
const DEEPER_LAYER_FP_RATE: f64 = 0.5;

/// Default bound on cascade depth before construction fails loudly.
const DEFAULT_MAX_LAYERS: u32 = 64;

/// Builder for constructing [`Cascade`] instances from identifier sets.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
///
/// use crset_cascade::cascade::Cascade;
///
/// let cascade = Cascade::builder()
///     .max_layers(32)
///     .build(HashSet::new(), HashSet::new(), 8)
///     .unwrap();
///
/// // Empty inputs are padded up to 8 valid and 16 revoked identifiers.
/// assert!(cascade.depth() >= 1);
/// ```
#[derive(Debug, Clone)]
pub struct CascadeBuilder {
    salt: Option<String>,
    max_layers: u32,
}

impl Default for CascadeBuilder {
    fn default() -> Self {
        Self {
            salt: None,
            max_layers: DEFAULT_MAX_LAYERS,
        }
    }
}

impl CascadeBuilder {
    /// Sets a fixed salt as a 64-character lowercase hex string.
    ///
    /// Rebuilding with the same salt and the same padded sets reproduces the
    /// cascade bit for bit. When unset, 32 bytes are drawn from the
    /// operating-system random source at build time.
    pub fn salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Sets the maximum number of layers before construction fails.
    ///
    /// Each layer shrinks the surviving false-positive set by an expected
    /// constant factor below 1, so well-formed inputs converge far under the
    /// default bound of 64.
    ///
    /// # Panics
    ///
    /// Panics if `max_layers` is 0.
    pub fn max_layers(mut self, max_layers: u32) -> Self {
        assert!(max_layers > 0, "max_layers must be at least 1");
        self.max_layers = max_layers;
        self
    }

    /// Builds a cascade from `valid` and `revoked` identifier sets with
    /// padding target `r_hat`.
    ///
    /// Both sets are first padded with fresh random identifiers up to
    /// exactly `r_hat` and `2 * r_hat` entries, so the published cascade
    /// reveals only the targets, never the original sizes. The padded sets
    /// are then carved into alternating filter layers until no false
    /// positives survive. Afterwards every (padded) valid identifier answers
    /// `true` and every (padded) revoked identifier answers `false`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// if `valid.len() > r_hat`, if `revoked.len() > 2 * r_hat`, if an
    /// injected salt is not 64 characters of lowercase hex, or if
    /// construction exceeds the layer bound.
    pub fn build(
        self,
        mut valid: HashSet<String>,
        mut revoked: HashSet<String>,
        r_hat: usize,
    ) -> Result<Cascade, Error> {
        let s_hat = 2 * r_hat;
        if valid.len() > r_hat {
            return Err(Error::invalid_argument(format!(
                "valid set holds {} identifiers but the padding target is {r_hat}",
                valid.len()
            ))
            .with_context("r_hat", r_hat)
            .with_context("num_valid", valid.len())
            .with_context("num_revoked", revoked.len()));
        }
        if revoked.len() > s_hat {
            return Err(Error::invalid_argument(format!(
                "revoked set holds {} identifiers but the padding target is {s_hat}",
                revoked.len()
            ))
            .with_context("r_hat", r_hat)
            .with_context("num_valid", valid.len())
            .with_context("num_revoked", revoked.len()));
        }

        // Padding precedes salt generation and layering so the published
        // cascade depends only on the padded sizes, never on |V| or |R|.
        while valid.len() < r_hat {
            let id = draw_unique_id(&valid, &revoked);
            valid.insert(id);
        }
        while revoked.len() < s_hat {
            let id = draw_unique_id(&valid, &revoked);
            revoked.insert(id);
        }

        let salt = match self.salt {
            Some(hex_salt) => parse_salt(&hex_salt)?,
            None => random_salt(),
        };
        let salt_hex = hex::encode(salt);

        let mut layers: Vec<BloomFilter> = Vec::new();
        let mut included: Vec<String> = valid.into_iter().collect();
        let mut excluded: Vec<String> = revoked.into_iter().collect();

        while !included.is_empty() {
            let level = layers.len() as u32 + 1;
            if level > self.max_layers {
                return Err(Error::invalid_argument(format!(
                    "cascade did not converge within {} layers",
                    self.max_layers
                ))
                .with_context("max_layers", self.max_layers)
                .with_context("surviving", included.len()));
            }

            let fp_rate = if level == 1 {
                LAYER_ONE_FP_RATE
            } else {
                DEEPER_LAYER_FP_RATE
            };
            let num_bits = optimal_num_bits(included.len(), fp_rate);

            let mut filter = BloomFilter::new(num_bits, 1);
            for id in &included {
                filter.insert(probe(id, level, &salt_hex));
            }

            let false_positives: Vec<String> = excluded
                .iter()
                .filter(|id| filter.contains(probe(id, level, &salt_hex)))
                .cloned()
                .collect();

            debug!(
                level,
                num_bits,
                included = included.len(),
                false_positives = false_positives.len(),
                "cascade layer constructed"
            );

            layers.push(filter);
            // The roles swap: this layer's members become the candidates to
            // eliminate at the next level.
            excluded = std::mem::replace(&mut included, false_positives);
        }

        Ok(Cascade::from_parts(salt, layers))
    }
}

/// Computes the optimal filter size in bits for `num_items` items at target
/// false-positive rate `fp_rate`: `ceil(-n * ln(p) / ln(2)^2)`.
fn optimal_num_bits(num_items: usize, fp_rate: f64) -> u32 {
    let n = num_items as f64;
    let ln2_squared = std::f64::consts::LN_2 * std::f64::consts::LN_2;
    (-n * fp_rate.ln() / ln2_squared).ceil() as u32
}

/// Draws a fresh random identifier absent from both sets.
fn draw_unique_id(valid: &HashSet<String>, revoked: &HashSet<String>) -> String {
    loop {
        let id = random_256_bit_hex();
        if !valid.contains(&id) && !revoked.contains(&id) {
            return id;
        }
    }
}

fn parse_salt(hex_salt: &str) -> Result<[u8; 32], Error> {
    if hex_salt.len() != 64 || hex_salt.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(Error::invalid_argument(
            "salt must be a 64-character lowercase hex string",
        ));
    }
    let bytes = hex::decode(hex_salt).map_err(|err| {
        Error::invalid_argument("salt must be a 64-character lowercase hex string").set_source(err)
    })?;
    bytes
        .try_into()
        .map_err(|_| Error::invalid_argument("salt must decode to exactly 32 bytes"))
}
