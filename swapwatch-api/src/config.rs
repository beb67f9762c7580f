// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::infra;
use swapwatch_common::telemetry;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    #[serde(rename = "infra")]
    pub infra_config: infra::Config,

    #[serde(rename = "telemetry", default)]
    pub telemetry_config: telemetry::Config,
}
