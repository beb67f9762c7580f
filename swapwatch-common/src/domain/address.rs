// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use derive_more::Display;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

static ADDRESS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^0x[0-9a-fA-F]{40}$").expect("address regex can be compiled"));

/// An EVM wallet address, always held in its canonical lowercase hex form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Validate the given string as a `0x`-prefixed 20-byte hex address and canonicalise it to
    /// lowercase.
    pub fn parse(address: impl AsRef<str>) -> Result<Self, InvalidWalletAddress> {
        let address = address.as_ref().trim();

        if address.is_empty() {
            return Err(InvalidWalletAddress::Empty);
        }
        if !ADDRESS_REGEX.is_match(address) {
            return Err(InvalidWalletAddress::Malformed(address.to_owned()));
        }

        Ok(Self(address.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened `0x1234...abcd` form used in push notifications.
    pub fn shortened(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for WalletAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let address = String::deserialize(deserializer)?;
        WalletAddress::parse(&address).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Error)]
pub enum InvalidWalletAddress {
    #[error("wallet address must not be empty")]
    Empty,

    #[error("wallet address {0} is not a 0x-prefixed 20-byte hex string")]
    Malformed(String),
}
