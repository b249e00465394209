// Check flow
//
// The full inspection sequence: gate on deployed bytecode first, then
// simulate collect(). The gate must pass before any call is attempted; a
// missing contract or an unreachable endpoint ends the flow, while a
// collect() failure is reported and the flow still completes.

use crate::abi::AbiTuple;
use crate::collect;
use crate::config::ContractAddress;
use crate::error::TrapError;
use crate::gate::{self, CodePresence};
use crate::provider::ProviderAdapter;

/// What a completed check produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Byte length of the deployed code.
    pub bytecode_bytes: usize,
    /// The decoded collect() result, or `None` if the call failed.
    pub collected: Option<AbiTuple>,
}

/// Run the gate-then-collect sequence against the trap at `address`.
pub async fn run_check_flow(
    adapter: &ProviderAdapter,
    address: &ContractAddress,
) -> Result<CheckOutcome, TrapError> {
    let bytes = match gate::check_deployment(adapter, address).await? {
        CodePresence::NotDeployed => {
            return Err(TrapError::NotDeployed(address.to_string()));
        }
        CodePresence::Deployed { bytes } => bytes,
    };
    println!("Contract found - bytecode size: {bytes} bytes");

    // collect() failures are reported but never abort the flow.
    let collected = match collect::invoke_collect(adapter, address).await {
        Ok(tuple) => Some(tuple),
        Err(err) => {
            eprintln!("{err}");
            None
        }
    };

    Ok(CheckOutcome {
        bytecode_bytes: bytes,
        collected,
    })
}
