use std::{env, fs, io, time::Duration};

use crate::domain::tuning::ArenaTuning;

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env::var("ARENA_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3003)
}

// Token required by admin routes. Unset or empty disables them.
pub fn admin_token() -> Option<String> {
    env::var("ARENA_ADMIN_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty())
}

pub fn chat_webhook_url() -> Option<String> {
    env::var("CHAT_WEBHOOK_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
}

pub fn chat_webhook_timeout() -> Duration {
    let millis = env::var("CHAT_WEBHOOK_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(1500);
    Duration::from_millis(millis)
}

// Fixed seed for reproducible resolution; random when unset.
pub fn rng_seed() -> Option<u64> {
    env::var("ARENA_RNG_SEED")
        .ok()
        .and_then(|value| value.parse().ok())
}

/// Gameplay tuning from `ARENA_TUNING_PATH`, or the defaults when unset.
pub fn load_tuning() -> io::Result<ArenaTuning> {
    match env::var("ARENA_TUNING_PATH") {
        Ok(path) => parse_tuning(&fs::read_to_string(&path)?)
            .map_err(|e| io::Error::other(format!("invalid tuning file {path}: {e}"))),
        Err(_) => Ok(ArenaTuning::default()),
    }
}

pub fn parse_tuning(raw: &str) -> Result<ArenaTuning, toml::de::Error> {
    toml::from_str(raw)
}

/// Everything the server reads from the environment at startup.
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    pub admin_token: Option<String>,
    pub chat_webhook_url: Option<String>,
    pub chat_webhook_timeout: Duration,
    pub rng_seed: Option<u64>,
    pub tuning: ArenaTuning,
}

impl ServerOptions {
    pub fn from_env() -> io::Result<Self> {
        Ok(Self {
            admin_token: admin_token(),
            chat_webhook_url: chat_webhook_url(),
            chat_webhook_timeout: chat_webhook_timeout(),
            rng_seed: rng_seed(),
            tuning: load_tuning()?,
        })
    }
}

pub const NARRATION_CHANNEL_CAPACITY: usize = 1024;
pub const NARRATION_BROADCAST_CAPACITY: usize = 256;
