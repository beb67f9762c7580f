// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::domain::Api;
use anyhow::Context;
use log::warn;
use tokio::{select, signal::unix::Signal, task};

/// Serve the API, shutting down on SIGTERM.
pub async fn run(api: impl Api, mut sigterm: Signal) -> anyhow::Result<()> {
    let serve_api_task = task::spawn(async move { api.serve().await.context("serving API") });

    select! {
        result = serve_api_task => result
            .context("serve_api_task panicked")
            .and_then(|result| result.context("serve_api_task failed")),

        _ = sigterm.recv() => {
            warn!("SIGTERM received");
            Ok(())
        }
    }
}
