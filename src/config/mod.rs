//! Environment-based configuration.

use std::env;

pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_http_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}

/// Evaluation interval in seconds; 0 disables the scheduler.
pub fn get_eval_interval_seconds() -> u64 {
    env::var("EVAL_INTERVAL_SECONDS")
        .ok()
        .and_then(|i| i.parse().ok())
        .unwrap_or(0)
}

pub fn get_symbols() -> Vec<String> {
    env::var("SYMBOLS")
        .ok()
        .map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| vec!["BTC-USD".to_string()])
}

/// Capacity of the broadcast channel engine events fan into.
pub fn get_event_channel_capacity() -> usize {
    env::var("EVENT_CHANNEL_CAPACITY")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or(256)
}
