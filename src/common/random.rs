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

//! Cryptographically secure randomness for padding and salting.
//!
//! Both the padding identifiers and the cascade salt must be unpredictable,
//! so every draw goes through the operating-system random source.

use rand::RngCore;
use rand::rngs::OsRng;

/// Returns a fresh random 256-bit value as a 64-character lowercase hex
/// string.
///
/// This is the identifier format the cascade operates on; it is also used to
/// pad the input sets up to their fixed target sizes.
///
/// # Panics
///
/// Panics only if the operating-system random source fails.
///
/// # Examples
///
/// ```
/// use crset_cascade::common::random_256_bit_hex;
///
/// let id = random_256_bit_hex();
/// assert_eq!(id.len(), 64);
/// assert!(id.bytes().all(|b| b.is_ascii_hexdigit()));
/// ```
pub fn random_256_bit_hex() -> String {
    hex::encode(random_bytes())
}

/// Draws 32 uniformly random bytes for use as a cascade salt.
pub(crate) fn random_salt() -> [u8; 32] {
    random_bytes()
}

fn random_bytes() -> [u8; 32] {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes
}
