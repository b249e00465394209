// Error taxonomy for the trap checker
//
// Configuration and transport problems abort the process; call and decode
// problems are reported at their call site and execution continues.

use thiserror::Error;

/// Errors raised by the check and decode flows.
#[derive(Debug, Error)]
pub enum TrapError {
    /// Required settings are missing or unusable. Raised before any network I/O.
    #[error("{0}")]
    Configuration(String),

    /// No RPC backend was compiled into this binary.
    #[error("unsupported runtime: no RPC backend available (build with `backend-alloy` or `backend-ethers`)")]
    UnsupportedRuntime,

    /// The bytecode fetch failed at the transport level.
    #[error("failed to fetch contract code: {0}")]
    Transport(String),

    /// The target address holds no bytecode.
    #[error("no contract deployed at {0}")]
    NotDeployed(String),

    /// The collect() invocation reverted or returned an unusable result.
    #[error("error calling collect(): {0}")]
    Call(String),

    /// The ABI decoder was given a malformed payload.
    #[error("failed to decode as (uint256,string): {0}")]
    DecodePayload(String),
}

impl TrapError {
    /// Process exit code for this error when it terminates a flow.
    ///
    /// `Call` and `DecodePayload` are handled at their call site and never
    /// change the exit status, so they map to 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            TrapError::Configuration(_) | TrapError::UnsupportedRuntime => 1,
            TrapError::NotDeployed(_) => 2,
            TrapError::Transport(_) => 3,
            TrapError::Call(_) | TrapError::DecodePayload(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_map_to_distinct_exit_codes() {
        assert_eq!(TrapError::Configuration("missing RPC_URL".into()).exit_code(), 1);
        assert_eq!(TrapError::UnsupportedRuntime.exit_code(), 1);
        assert_eq!(TrapError::NotDeployed("0x0".into()).exit_code(), 2);
        assert_eq!(TrapError::Transport("connection refused".into()).exit_code(), 3);
    }

    #[test]
    fn recoverable_errors_keep_the_exit_status() {
        assert_eq!(TrapError::Call("execution reverted".into()).exit_code(), 0);
        assert_eq!(TrapError::DecodePayload("odd length".into()).exit_code(), 0);
    }
}
