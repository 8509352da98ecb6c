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

use std::io::Cursor;

use byteorder::BigEndian;
use byteorder::LittleEndian;
use byteorder::ReadBytesExt;

use crate::bloom::BloomFilter;
use crate::cascade::Cascade;
use crate::error::Error;

/// Length of the raw salt prefix in serialized form.
const SALT_LEN: usize = 32;

impl Cascade {
    /// Serializes the cascade as `"0x"` followed by lowercase hex.
    ///
    /// The byte layout is the 32-byte salt, then each layer as its bit count
    /// (big-endian u32) followed by its packed words, each word emitted in
    /// little-endian byte order.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashSet;
    ///
    /// use crset_cascade::cascade::Cascade;
    ///
    /// let cascade = Cascade::from_sets(HashSet::new(), HashSet::new(), 4).unwrap();
    /// let hex = cascade.to_hex();
    ///
    /// assert!(hex.starts_with("0x"));
    /// assert_eq!(Cascade::from_hex(&hex).unwrap(), cascade);
    /// ```
    pub fn to_hex(&self) -> String {
        let num_bytes = SALT_LEN
            + self
                .layers()
                .iter()
                .map(|layer| 4 + 4 * layer.words().len())
                .sum::<usize>();
        let mut bytes = Vec::with_capacity(num_bytes);

        bytes.extend_from_slice(self.salt_bytes());
        for layer in self.layers() {
            bytes.extend_from_slice(&layer.num_bits().to_be_bytes());
            for &word in layer.words() {
                bytes.extend_from_slice(&word.to_le_bytes());
            }
        }

        format!("0x{}", hex::encode(bytes))
    }

    /// Reconstructs a cascade from its hex serialization.
    ///
    /// Zero padding after the last layer is tolerated: a layer bit count
    /// that reads as zero ends the layer list, as does a leftover shorter
    /// than a bit-count field whose bytes are all zero. Transport envelopes
    /// may therefore right-pad the payload with any number of `00` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MalformedDeserializeData`](crate::error::ErrorKind::MalformedDeserializeData)
    /// if the `0x` prefix is missing, the payload is not valid hex, fewer
    /// than 32 bytes follow the prefix, or a layer declares more words than
    /// the remaining bytes hold.
    pub fn from_hex(data: impl AsRef<str>) -> Result<Cascade, Error> {
        let data = data.as_ref();
        let body = data
            .strip_prefix("0x")
            .ok_or_else(|| Error::deserial("missing 0x prefix"))?;
        let bytes = hex::decode(body)
            .map_err(|err| Error::deserial("payload is not valid hex").set_source(err))?;

        if bytes.len() < SALT_LEN {
            return Err(Error::insufficient_data("32-byte salt"));
        }
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&bytes[..SALT_LEN]);

        let mut layers = Vec::new();
        let mut cursor = Cursor::new(&bytes[SALT_LEN..]);
        loop {
            let remaining = &cursor.get_ref()[cursor.position() as usize..];
            if remaining.len() < 4 {
                // Anything this short is either envelope zero padding or a
                // truncated bit-count field.
                if remaining.iter().any(|&byte| byte != 0) {
                    return Err(Error::insufficient_data("layer bit count"));
                }
                break;
            }

            let num_bits = cursor
                .read_u32::<BigEndian>()
                .map_err(|err| Error::insufficient_data("layer bit count").set_source(err))?;
            if num_bits == 0 {
                break;
            }

            let num_words = num_bits.div_ceil(32) as usize;
            let mut words = vec![0u32; num_words];
            cursor
                .read_u32_into::<LittleEndian>(&mut words)
                .map_err(|err| {
                    Error::insufficient_data("layer words")
                        .with_context("num_bits", num_bits)
                        .with_context("num_words", num_words)
                        .set_source(err)
                })?;
            layers.push(BloomFilter::from_words(num_bits, 1, words));
        }

        Ok(Cascade::from_parts(salt, layers))
    }
}
