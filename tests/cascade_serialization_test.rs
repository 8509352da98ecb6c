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

use crset_cascade::cascade::Cascade;
use crset_cascade::common::random_256_bit_hex;
use crset_cascade::error::ErrorKind;
use googletest::assert_that;
use googletest::prelude::contains_substring;

fn distinct_ids(n: usize) -> Vec<String> {
    let mut ids = HashSet::with_capacity(n);
    while ids.len() < n {
        ids.insert(random_256_bit_hex());
    }
    ids.into_iter().collect()
}

fn sample_cascade() -> (Cascade, Vec<String>, Vec<String>) {
    let ids = distinct_ids(3000);
    let valid: Vec<String> = ids[..1000].to_vec();
    let revoked: Vec<String> = ids[1000..].to_vec();
    let cascade = Cascade::from_sets(
        valid.iter().cloned().collect(),
        revoked.iter().cloned().collect(),
        3000,
    )
    .unwrap();
    (cascade, valid, revoked)
}

#[test]
fn test_hex_round_trip() {
    let (cascade, valid, revoked) = sample_cascade();

    let hex = cascade.to_hex();
    assert!(hex.starts_with("0x"));
    assert!(hex[2..].bytes().all(|b| b.is_ascii_hexdigit()));

    let restored = Cascade::from_hex(&hex).unwrap();
    assert_eq!(restored, cascade);
    assert_eq!(restored.salt(), cascade.salt());
    assert_eq!(restored.depth(), cascade.depth());

    for id in valid.iter().chain(revoked.iter()) {
        assert_eq!(restored.contains(id), cascade.contains(id));
    }
}

#[test]
fn test_trailing_zero_bytes_are_tolerated() {
    let (cascade, valid, revoked) = sample_cascade();
    let hex = cascade.to_hex();

    let padded = format!("{hex}{}", "0".repeat(32));
    let restored = Cascade::from_hex(&padded).unwrap();

    assert_eq!(restored, cascade);
    for id in valid.iter().take(50).chain(revoked.iter().take(50)) {
        assert_eq!(restored.contains(id), cascade.contains(id));
    }
}

#[test]
fn test_trailing_zeros_shorter_than_a_length_field() {
    let cascade = Cascade::from_sets(HashSet::new(), HashSet::new(), 4).unwrap();
    let hex = cascade.to_hex();

    // 1-byte and 3-byte zero remainders are envelope padding, not layers.
    assert_eq!(Cascade::from_hex(format!("{hex}00")).unwrap(), cascade);
    assert_eq!(Cascade::from_hex(format!("{hex}000000")).unwrap(), cascade);
}

#[test]
fn test_empty_cascade_round_trip() {
    let cascade = Cascade::from_sets(HashSet::new(), HashSet::new(), 0).unwrap();
    assert_eq!(cascade.depth(), 0);
    assert!(!cascade.contains(random_256_bit_hex()));

    let hex = cascade.to_hex();
    assert_eq!(hex.len(), 2 + 64);
    assert_eq!(Cascade::from_hex(&hex).unwrap(), cascade);
}

#[test]
fn test_missing_prefix_is_rejected() {
    let (cascade, _, _) = sample_cascade();
    let body = cascade.to_hex()[2..].to_string();

    let err = Cascade::from_hex(&body).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("0x prefix"));
}

#[test]
fn test_malformed_hex_is_rejected() {
    let err = Cascade::from_hex(format!("0x{}", "zz".repeat(32))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);

    // Odd-length payload.
    let err = Cascade::from_hex(format!("0x{}a", "ab".repeat(32))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
}

#[test]
fn test_short_salt_is_rejected() {
    let err = Cascade::from_hex("0x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("salt"));

    // 31 bytes is one short of a salt.
    let err = Cascade::from_hex(format!("0x{}", "ab".repeat(31))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
}

#[test]
fn test_truncated_layer_is_rejected() {
    let (cascade, _, _) = sample_cascade();
    let hex = cascade.to_hex();

    // Dropping the final byte leaves the last layer short of its declared
    // word count.
    let truncated = &hex[..hex.len() - 2];
    let err = Cascade::from_hex(truncated).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("insufficient data"));
}

#[test]
fn test_truncated_bit_count_is_rejected() {
    // A nonzero 3-byte remainder cannot be a bit count nor padding.
    let bad = format!("0x{}000001", "ab".repeat(32));
    let err = Cascade::from_hex(&bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
}

#[test]
fn test_declared_size_beyond_remaining_bytes_is_rejected() {
    // Salt plus a layer claiming 0x40 bits (2 words) but carrying only 1.
    let bad = format!("0x{}{}{}", "cd".repeat(32), "00000040", "11223344");
    let err = Cascade::from_hex(&bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("layer words"));
}
