// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use std::error::Error as StdError;
use swapwatch_common::domain::SwapEvent;
use thiserror::Error;

const EXPLORER_TX_URL: &str = "https://basescan.org/tx";

/// Outbound push delivery for swap notifications.
#[trait_variant::make(Send)]
pub trait SwapNotifier
where
    Self: Clone + Send + Sync + 'static,
{
    async fn notify(&self, webhook_url: &str, text: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("cannot deliver push notification")]
    Delivery(#[source] Box<dyn StdError + Send + Sync>),

    #[error("push endpoint answered with status {0}")]
    Status(u16),
}

impl NotifyError {
    pub fn delivery(error: impl StdError + Send + Sync + 'static) -> Self {
        Self::Delivery(Box::new(error))
    }
}

/// Notifier for setups without an external push channel.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl SwapNotifier for NoopNotifier {
    async fn notify(&self, _webhook_url: &str, _text: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Markdown text for the external push message: shortened wallet, USD amount, token pair if
/// known, and a transaction explorer link.
pub fn format_swap_message(event: &SwapEvent) -> String {
    let mut text = format!(
        "*Swap detected*\nWallet: `{}`\nAmount: ${:.2}",
        event.wallet_address.shortened(),
        event.amount_in_usd,
    );

    if let (Some(token_in), Some(token_out)) = (&event.token_in, &event.token_out) {
        text.push_str(&format!("\nPair: {token_in} -> {token_out}"));
    }
    if !event.tx_hash.is_empty() {
        text.push_str(&format!(
            "\n[View transaction]({EXPLORER_TX_URL}/{})",
            event.tx_hash
        ));
    }

    text
}
