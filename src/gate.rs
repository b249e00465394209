// Bytecode gate
//
// First step of the check flow: fetch the code at the target address and
// classify it. An empty code blob means there is nothing to call, so the
// flow stops there. Note that a chain can in principle hold a deployed
// contract with empty code; like the original tool, that case is not
// distinguished from "never deployed".

use log::debug;

use crate::config::ContractAddress;
use crate::error::TrapError;
use crate::provider::ProviderAdapter;

/// Classification of the code found at an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePresence {
    NotDeployed,
    Deployed { bytes: usize },
}

impl CodePresence {
    pub fn classify(code: &[u8]) -> Self {
        if code.is_empty() {
            CodePresence::NotDeployed
        } else {
            CodePresence::Deployed { bytes: code.len() }
        }
    }
}

/// Fetch and classify the bytecode at `address`.
///
/// Transport failures surface as [`TrapError::Transport`] and are fatal for
/// the check flow; there is no retry.
pub async fn check_deployment(
    adapter: &ProviderAdapter,
    address: &ContractAddress,
) -> Result<CodePresence, TrapError> {
    let code = adapter.get_code(address).await?;
    debug!("fetched {} bytes of code for {address}", code.len());
    Ok(CodePresence::classify(&code))
}
