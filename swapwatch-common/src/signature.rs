// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex encoded HMAC-SHA-256 of the given body under the given secret.
pub fn sign(secret: &[u8], body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any size");
    mac.update(body);
    const_hex::encode(mac.finalize().into_bytes())
}

/// Verify the presented hex signature against the body in constant time. The presented signature
/// is compared case-insensitively.
pub fn verify(secret: &[u8], body: &[u8], presented: &str) -> bool {
    let expected = sign(secret, body);
    let presented = presented.trim().to_ascii_lowercase();
    expected.as_bytes().ct_eq(presented.as_bytes()).into()
}
