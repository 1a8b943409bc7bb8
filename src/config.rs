//! Environment-driven configuration, read once at startup.

use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

/// Process configuration. Every field has a default suitable for the demo,
/// so an empty environment still runs.
#[derive(Debug, Clone)]
pub struct Config {
    /// Operational mailbox receiving a copy of every confirmation.
    pub orders_mailbox: String,
    /// Mailbox capacity for each actor channel.
    pub channel_capacity: usize,
    /// Menu section names, in display order.
    pub categories: Vec<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            orders_mailbox: try_load("BAKEHOUSE_ORDERS_MAILBOX", "orders@bakehouse.example"),
            channel_capacity: try_load("BAKEHOUSE_CHANNEL_CAPACITY", "32"),
            categories: load_list("BAKEHOUSE_MENU_CATEGORIES", "Breads,Pastries,Cakes,Cookies"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn load_list(key: &str, default: &str) -> Vec<String> {
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}
