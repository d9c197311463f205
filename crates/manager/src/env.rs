// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timeout configuration (env vars in milliseconds)

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for a posted job to receive its reply
pub fn timeout_call() -> Duration {
    parse_duration_ms("PLOTLINE_TIMEOUT_CALL_MS").unwrap_or(Duration::from_secs(30))
}
