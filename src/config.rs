// Process configuration
//
// Settings are read from the environment (with .env support in the binary)
// exactly once and passed into the flows as a struct. Nothing below this
// layer looks at the environment.

use std::env;
use std::fmt;

use crate::error::TrapError;

/// Settings recognized by the tool.
///
/// `RPC_URL` and `TRAP_ADDRESS` are required by the check flow; `HEX` is an
/// optional fallback payload for the decode flow (a positional argument takes
/// precedence).
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub rpc_url: Option<String>,
    pub trap_address: Option<String>,
    pub hex_payload: Option<String>,
}

impl Config {
    /// Snapshot the recognized environment variables.
    pub fn from_env() -> Self {
        Self {
            rpc_url: non_empty(env::var("RPC_URL").ok()),
            trap_address: non_empty(env::var("TRAP_ADDRESS").ok()),
            hex_payload: non_empty(env::var("HEX").ok()),
        }
    }

    /// Extract the settings the check flow requires.
    pub fn require_check(&self) -> Result<(String, ContractAddress), TrapError> {
        match (&self.rpc_url, &self.trap_address) {
            (Some(rpc), Some(addr)) => Ok((rpc.clone(), ContractAddress::new(addr)?)),
            _ => Err(TrapError::Configuration(
                "Missing RPC_URL or TRAP_ADDRESS in the environment (or .env) - set both and try again".into(),
            )),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A 20-byte contract address in its 0x-prefixed 40-hex-digit form.
///
/// Only the basic shape is checked here; anything deeper (checksums,
/// existence) is the provider's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractAddress(String);

impl ContractAddress {
    pub fn new(value: &str) -> Result<Self, TrapError> {
        let digits = value.strip_prefix("0x").unwrap_or(value);
        if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TrapError::Configuration(format!(
                "{value} does not look like a contract address (expected 0x + 40 hex digits)"
            )));
        }
        let normalized = if value.starts_with("0x") {
            value.to_string()
        } else {
            format!("0x{value}")
        };
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
