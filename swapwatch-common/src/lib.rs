// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

pub mod config;
pub mod domain;
pub mod signature;
pub mod telemetry;
