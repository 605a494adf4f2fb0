// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binding options.

use serde::{Deserialize, Serialize};

/// Environment variable consulted by [`BindOptions::from_env`].
pub const RUNTIME_CHECK_ENV: &str = "COVENANT_RUNTIME_CHECK";

/// Options fixed at bind time. Calls never consult them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindOptions {
    /// Wrap accepted methods in check adapters. Signature validation runs
    /// either way.
    pub runtime_check: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            runtime_check: true,
        }
    }
}

impl BindOptions {
    /// Defaults, overridden by `COVENANT_RUNTIME_CHECK` when set.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(raw) = std::env::var(RUNTIME_CHECK_ENV) {
            if let Some(flag) = parse_flag(&raw) {
                options.runtime_check = flag;
            } else {
                tracing::warn!(value = %raw, "ignoring unrecognized {}", RUNTIME_CHECK_ENV);
            }
        }
        options
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
