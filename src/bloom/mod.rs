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

//! Single-hash Bloom filter indexed by SHA-256.
//!
//! This filter is the building block of the revocation cascade: a dense bit
//! array packed into 32-bit words, with bit positions derived from the
//! SHA-256 digest of the raw input bytes. Inserted items never produce false
//! negatives.
//!
//! # Usage
//!
//! ```rust
//! use crset_cascade::bloom::BloomFilter;
//!
//! let mut filter = BloomFilter::new(1024, 1);
//! filter.insert("a1b2c3");
//!
//! assert!(filter.contains("a1b2c3"));
//! ```
//!
//! # Notes
//!
//! - The cascade always uses a single hash position per item (`num_hashes`
//!   of 1); larger values are supported but never serialized.
//! - Filters are mutated only during cascade construction and restored in
//!   bulk during deserialization; afterwards they are read-only.

mod filter;

pub use self::filter::BloomFilter;
