//! Voting service configuration

use std::env;
use tracing::warn;

use crate::domain::MAX_DESCRIPTION_BYTES;

/// Voting configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VotingConfig {
    /// Upper bound on the description, in bytes
    pub max_description_bytes: usize,
    /// Reject proposals whose window starts after it ends
    pub reject_inverted_window: bool,
    /// Reject finalization when yes + no exceeds the votes cast
    pub enforce_tally_bound: bool,
    /// Compare-and-swap attempts before giving up with `Contention`
    pub max_commit_attempts: u32,
    /// Namespace mixed into every derived record address
    pub program_id: [u8; 32],
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            max_description_bytes: MAX_DESCRIPTION_BYTES,
            reject_inverted_window: false,
            enforce_tally_bound: false,
            max_commit_attempts: 8,
            program_id: [0u8; 32],
        }
    }
}

impl VotingConfig {
    /// Defaults overridden by environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DAO_MAX_DESCRIPTION_BYTES`
    /// - `DAO_REJECT_INVERTED_WINDOW`
    /// - `DAO_ENFORCE_TALLY_BOUND`
    /// - `DAO_MAX_COMMIT_ATTEMPTS`
    /// - `DAO_PROGRAM_ID` (64 hex characters)
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_description_bytes: env_parsed("DAO_MAX_DESCRIPTION_BYTES")
                .unwrap_or(defaults.max_description_bytes),
            reject_inverted_window: env_flag("DAO_REJECT_INVERTED_WINDOW")
                .unwrap_or(defaults.reject_inverted_window),
            enforce_tally_bound: env_flag("DAO_ENFORCE_TALLY_BOUND")
                .unwrap_or(defaults.enforce_tally_bound),
            max_commit_attempts: env_parsed("DAO_MAX_COMMIT_ATTEMPTS")
                .unwrap_or(defaults.max_commit_attempts),
            program_id: env::var("DAO_PROGRAM_ID")
                .ok()
                .and_then(|v| parse_program_id(&v))
                .unwrap_or(defaults.program_id),
        }
    }

    /// Commit attempts, never less than one.
    pub fn commit_attempts(&self) -> u32 {
        self.max_commit_attempts.max(1)
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable config value");
            None
        }
    }
}

fn env_flag(key: &str) -> Option<bool> {
    let raw = env::var(key).ok()?;
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(key, value = %raw, "Ignoring unparseable config flag");
            None
        }
    }
}

fn parse_program_id(raw: &str) -> Option<[u8; 32]> {
    let decoded = hex::decode(raw.trim().trim_start_matches("0x")).ok();
    let parsed = decoded.and_then(|bytes| <[u8; 32]>::try_from(bytes).ok());
    if parsed.is_none() {
        warn!(value = %raw, "DAO_PROGRAM_ID must be 32 hex-encoded bytes, ignoring");
    }
    parsed
}
