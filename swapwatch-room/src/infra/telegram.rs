// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::domain::{NotifyError, SwapNotifier};
use serde_json::json;
use std::time::Duration;

/// Telegram push delivery over HTTP. The request carries the pre-formatted Markdown text; the
/// webhook URL comes from the room config.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl SwapNotifier for TelegramNotifier {
    async fn notify(&self, webhook_url: &str, text: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(webhook_url)
            .json(&json!({ "text": text, "parse_mode": "Markdown" }))
            .send()
            .await
            .map_err(NotifyError::delivery)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotifyError::Status(response.status().as_u16()))
        }
    }
}
