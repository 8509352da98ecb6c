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

//! Padded Bloom filter cascade construction, query, and serialization.
//!
//! A cascade partitions identifiers into a valid class and a revoked class
//! with zero error on the construction inputs. Both classes are padded with
//! random identifiers to fixed target sizes before any filter is built, so
//! the published artifact reveals only the targets, never the true set
//! sizes. Layers alternate roles: each one encodes the survivors of the
//! previous level's false-positive scan, and a query is decided by the
//! parity of the first level that rejects it.
//!
//! # Usage
//!
//! ```rust
//! use std::collections::HashSet;
//!
//! use crset_cascade::cascade::Cascade;
//! use crset_cascade::common::random_256_bit_hex;
//!
//! let valid: HashSet<String> = (0..8).map(|_| random_256_bit_hex()).collect();
//! let revoked: HashSet<String> = (0..8).map(|_| random_256_bit_hex()).collect();
//!
//! let cascade = Cascade::from_sets(valid.clone(), revoked, 16).unwrap();
//! let restored = Cascade::from_hex(cascade.to_hex()).unwrap();
//!
//! for id in &valid {
//!     assert!(restored.contains(id));
//! }
//! ```
//!
//! # Notes
//!
//! - Cascades are immutable once built; republishing after a membership
//!   change means rebuilding from the full sets.
//! - The serialized form is bit-exact and interoperable: salt, per-layer
//!   bit counts, and packed words are laid out as documented on
//!   [`Cascade::to_hex`].

mod builder;
mod serialization;
mod sketch;

pub use self::builder::CascadeBuilder;
pub use self::sketch::Cascade;
