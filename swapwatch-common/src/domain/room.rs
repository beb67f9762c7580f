// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::domain::RoomError;
use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use url::Url;

/// Maximum number of wallets a single room may track.
pub const MAX_TRACKED_WALLETS: usize = 50;

/// Maximum label length after trimming.
pub const MAX_LABEL_LEN: usize = 100;

/// Upper bound for the USD notification threshold.
pub const MAX_THRESHOLD_USD: f64 = 1_000_000.0;

/// Default room lifetime, also the default for extensions.
pub const DEFAULT_LIFETIME_HOURS: u64 = 24;

/// Maximum number of hours a room can be extended by in one call.
pub const MAX_EXTENSION_HOURS: u64 = 48;

const MAX_ROOM_CODE_LEN: usize = 64;
const MILLIS_PER_HOUR: u64 = 60 * 60 * 1000;
const TELEGRAM_HOST: &str = "api.telegram.org";

/// An opaque, client-supplied room identifier mapping 1:1 to a room actor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Validate the given string as a non-empty alphanumeric/`-` room code.
    pub fn parse(code: impl AsRef<str>) -> Result<Self, InvalidRoomCode> {
        let code = code.as_ref().trim();

        if code.is_empty() {
            return Err(InvalidRoomCode::Empty);
        }
        if code.len() > MAX_ROOM_CODE_LEN {
            return Err(InvalidRoomCode::TooLong(code.len()));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(InvalidRoomCode::Malformed(code.to_owned()));
        }

        Ok(Self(code.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RoomCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RoomCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        RoomCode::parse(&code).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Error)]
pub enum InvalidRoomCode {
    #[error("room code must not be empty")]
    Empty,

    #[error("room code must be at most {MAX_ROOM_CODE_LEN} characters, got {0}")]
    TooLong(usize),

    #[error("room code {0} must only contain alphanumeric characters and dashes")]
    Malformed(String),
}

/// Durable per-room configuration. Times are unix epoch milliseconds; `expires_at` always equals
/// the scheduled wake of the owning actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfig {
    pub created_at: u64,
    pub expires_at: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_webhook: Option<String>,
}

impl RoomConfig {
    /// A fresh config with the standard lifetime starting at `now` (epoch millis).
    pub fn new(now: u64) -> Self {
        Self {
            created_at: now,
            expires_at: now + DEFAULT_LIFETIME_HOURS * MILLIS_PER_HOUR,
            created_by: None,
            threshold: None,
            telegram_webhook: None,
        }
    }

    /// Copy of this config with the webhook URL replaced by `***` for broadcasting.
    pub fn redacted(&self) -> Self {
        Self {
            telegram_webhook: self.telegram_webhook.as_ref().map(|_| "***".to_string()),
            ..self.clone()
        }
    }
}

/// Number of epoch milliseconds in the given number of hours.
pub fn hours_to_millis(hours: u64) -> u64 {
    hours * MILLIS_PER_HOUR
}

/// Validate an optional wallet label: trimmed, at most [MAX_LABEL_LEN] characters; an empty label
/// means absence.
pub fn validate_label(label: Option<&str>) -> Result<Option<String>, RoomError> {
    let Some(label) = label else {
        return Ok(None);
    };

    let label = label.trim();
    if label.is_empty() {
        return Ok(None);
    }
    if label.chars().count() > MAX_LABEL_LEN {
        return Err(RoomError::validation(format!(
            "label must be at most {MAX_LABEL_LEN} characters"
        )));
    }

    Ok(Some(label.to_owned()))
}

/// Validate an optional USD threshold within `[0, 1_000_000]`.
pub fn validate_threshold(threshold: Option<f64>) -> Result<Option<f64>, RoomError> {
    match threshold {
        None => Ok(None),
        Some(threshold) if (0.0..=MAX_THRESHOLD_USD).contains(&threshold) => Ok(Some(threshold)),
        Some(threshold) => Err(RoomError::validation(format!(
            "threshold {threshold} must be between 0 and {MAX_THRESHOLD_USD} USD"
        ))),
    }
}

/// Validate an optional Telegram webhook URL: http(s) and hosted on `api.telegram.org`.
pub fn validate_telegram_webhook(webhook: Option<&str>) -> Result<Option<String>, RoomError> {
    let Some(webhook) = webhook else {
        return Ok(None);
    };

    let url = Url::parse(webhook)
        .map_err(|_| RoomError::validation("telegram webhook must be a valid URL"))?;
    let scheme_ok = matches!(url.scheme(), "http" | "https");
    let host_ok = url
        .host_str()
        .is_some_and(|host| host.contains(TELEGRAM_HOST));

    if scheme_ok && host_ok {
        Ok(Some(webhook.to_owned()))
    } else {
        Err(RoomError::validation(format!(
            "telegram webhook must be an http(s) URL on {TELEGRAM_HOST}"
        )))
    }
}

/// Validate optional extension hours: defaults to [DEFAULT_LIFETIME_HOURS], must be in
/// `1..=`[MAX_EXTENSION_HOURS].
pub fn validate_extension_hours(hours: Option<u64>) -> Result<u64, RoomError> {
    match hours {
        None => Ok(DEFAULT_LIFETIME_HOURS),
        Some(hours) if (1..=MAX_EXTENSION_HOURS).contains(&hours) => Ok(hours),
        Some(hours) => Err(RoomError::validation(format!(
            "extension hours {hours} must be in 1..={MAX_EXTENSION_HOURS}"
        ))),
    }
}
