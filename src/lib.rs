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

//! A padded Bloom filter cascade for privacy-preserving revocation sets.
//!
//! This crate builds, queries, and serializes an immutable cascade of
//! single-hash, SHA-256-indexed Bloom filters representing a partition of
//! 256-bit hex identifiers into a *valid* set and a *revoked* set. An issuer
//! pads both sets to fixed sizes, constructs the cascade, and publishes its
//! hex serialization; a verifier reconstructs the cascade with
//! [`cascade::Cascade::from_hex`] and queries single identifiers.
//!
//! Membership answers are exact for every identifier supplied at
//! construction time and unspecified for anything else.
//!
//! ```rust
//! use std::collections::HashSet;
//!
//! use crset_cascade::cascade::Cascade;
//! use crset_cascade::common::random_256_bit_hex;
//!
//! let valid: HashSet<String> = (0..16).map(|_| random_256_bit_hex()).collect();
//! let revoked: HashSet<String> = (0..16).map(|_| random_256_bit_hex()).collect();
//!
//! let cascade = Cascade::from_sets(valid.clone(), revoked.clone(), 32)?;
//! let published = cascade.to_hex();
//!
//! let restored = Cascade::from_hex(&published)?;
//! assert_eq!(restored, cascade);
//! for id in &valid {
//!     assert!(restored.contains(id));
//! }
//! for id in &revoked {
//!     assert!(!restored.contains(id));
//! }
//! # Ok::<(), crset_cascade::error::Error>(())
//! ```

pub mod bloom;
pub mod cascade;
pub mod common;
pub mod error;
