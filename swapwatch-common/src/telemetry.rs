// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use log::{error, info};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(rename = "metrics", default)]
    pub metrics_config: Option<MetricsConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub address: IpAddr,
    pub port: u16,
}

/// Initialize logging to stderr, filtered via `RUST_LOG`.
pub fn init_logging() {
    logforth::starter_log::stderr().apply();
}

/// Install the Prometheus exporter if metrics are configured, otherwise do nothing. Must be
/// called from within a Tokio runtime.
pub fn init_metrics(config: Option<MetricsConfig>) {
    let Some(MetricsConfig { address, port }) = config else {
        return;
    };

    match PrometheusBuilder::new()
        .with_http_listener(SocketAddr::new(address, port))
        .install()
    {
        Ok(_) => info!(address:?, port; "serving Prometheus metrics"),
        Err(error) => error!(error:%; "cannot install Prometheus exporter"),
    }
}
