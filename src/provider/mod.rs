// Provider adapter
//
// Bridges two generations of RPC client libraries behind one fixed surface.
// The backend is picked once, at construction time, in a fixed priority
// order: the newer alloy stack first, the older ethers stack second. Nothing
// above this module ever branches on which library is in use.

#[cfg(feature = "backend-alloy")]
mod backend_alloy;
#[cfg(feature = "backend-ethers")]
mod backend_ethers;

use async_trait::async_trait;
use ethereum_types::U256;
use log::debug;

use crate::abi::{self, AbiFunction, AbiTuple};
use crate::config::ContractAddress;
use crate::error::TrapError;

/// One decoded ABI value inside a positional call result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Uint(U256),
    Str(String),
}

/// What a contract call returns, as shaped by the backing client generation.
///
/// Newer clients hand back field-named results; older ones hand back ordered
/// sequences. The tag is decided here, once, so downstream code only ever
/// sees the normalized [`AbiTuple`]. This is a compatibility shim, not a
/// pattern to extend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallResult {
    Named { balance: U256, tag: String },
    Positional(Vec<AbiValue>),
}

/// The client generation backing the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Alloy,
    Ethers,
}

impl BackendKind {
    /// Pick the best available backend: alloy if compiled in, ethers
    /// otherwise. With no backend compiled in this is a fatal,
    /// non-retryable configuration problem.
    pub fn probe() -> Result<Self, TrapError> {
        if cfg!(feature = "backend-alloy") {
            Ok(BackendKind::Alloy)
        } else if cfg!(feature = "backend-ethers") {
            Ok(BackendKind::Ethers)
        } else {
            Err(TrapError::UnsupportedRuntime)
        }
    }

    /// Render a wei amount in whole ether using this backend's own unit
    /// helper, normalized so both generations print the same thing.
    pub fn format_ether(self, wei: &U256) -> String {
        let raw = match self {
            #[cfg(feature = "backend-alloy")]
            BackendKind::Alloy => backend_alloy::format_ether(wei),
            #[cfg(feature = "backend-ethers")]
            BackendKind::Ethers => backend_ethers::format_ether(wei),
            #[allow(unreachable_patterns)]
            other => unreachable!("{} backend is not compiled in", other.label()),
        };
        trim_unit_suffix(&raw)
    }

    fn label(self) -> &'static str {
        match self {
            BackendKind::Alloy => "alloy",
            BackendKind::Ethers => "ethers",
        }
    }
}

/// The capability surface each backing client must provide.
#[async_trait]
pub trait RpcBackend: Send + Sync {
    async fn get_code(&self, address: &ContractAddress) -> Result<Vec<u8>, TrapError>;

    async fn call(
        &self,
        address: &ContractAddress,
        entry: &AbiFunction,
    ) -> Result<CallResult, TrapError>;

    fn format_ether(&self, wei: &U256) -> String;
}

/// A connected provider with a fixed, generation-independent surface.
pub struct ProviderAdapter {
    kind: BackendKind,
    backend: Box<dyn RpcBackend>,
}

impl ProviderAdapter {
    /// Probe for a usable client generation and connect it to the endpoint.
    pub fn connect(endpoint: &str) -> Result<Self, TrapError> {
        let kind = BackendKind::probe()?;
        debug!("using the {} backend", kind.label());
        let backend: Box<dyn RpcBackend> = match kind {
            #[cfg(feature = "backend-alloy")]
            BackendKind::Alloy => Box::new(backend_alloy::AlloyBackend::connect(endpoint)?),
            #[cfg(feature = "backend-ethers")]
            BackendKind::Ethers => Box::new(backend_ethers::EthersBackend::connect(endpoint)?),
            #[allow(unreachable_patterns)]
            _ => return Err(TrapError::UnsupportedRuntime),
        };
        Ok(Self { kind, backend })
    }

    /// Wrap an already-constructed backend. Lets the flows run over any
    /// [`RpcBackend`] implementation, live or scripted.
    pub fn from_backend(kind: BackendKind, backend: Box<dyn RpcBackend>) -> Self {
        Self { kind, backend }
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    /// Fetch the deployed bytecode at an address.
    pub async fn get_code(&self, address: &ContractAddress) -> Result<Vec<u8>, TrapError> {
        self.backend.get_code(address).await
    }

    /// Simulate a read-only call of the given ABI entry.
    pub async fn call(
        &self,
        address: &ContractAddress,
        entry: &AbiFunction,
    ) -> Result<CallResult, TrapError> {
        self.backend.call(address, entry).await
    }

    /// Decode a raw `(uint256, string)` payload.
    pub fn decode(&self, payload: &[u8]) -> Result<AbiTuple, TrapError> {
        abi::decode_collect(payload)
    }

    /// Render a wei amount in whole ether.
    pub fn format_ether(&self, wei: &U256) -> String {
        trim_unit_suffix(&self.backend.format_ether(wei))
    }
}

// The client libraries render full 18-decimal strings ("1.000000000000000000");
// trim to the shortest form that keeps a fractional digit ("1.0").
fn trim_unit_suffix(raw: &str) -> String {
    match raw.split_once('.') {
        None => format!("{raw}.0"),
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{frac}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_full_precision_unit_strings() {
        assert_eq!(trim_unit_suffix("1.000000000000000000"), "1.0");
        assert_eq!(trim_unit_suffix("0.000000000000000000"), "0.0");
        assert_eq!(trim_unit_suffix("1.500000000000000000"), "1.5");
        assert_eq!(trim_unit_suffix("0.000000000000000001"), "0.000000000000000001");
        assert_eq!(trim_unit_suffix("12"), "12.0");
    }

    #[cfg(not(any(feature = "backend-alloy", feature = "backend-ethers")))]
    #[test]
    fn probe_without_backends_is_an_unsupported_runtime() {
        assert!(matches!(
            BackendKind::probe(),
            Err(TrapError::UnsupportedRuntime)
        ));
    }

    #[cfg(any(feature = "backend-alloy", feature = "backend-ethers"))]
    #[test]
    fn probe_prefers_the_newer_backend() {
        let kind = BackendKind::probe().unwrap();
        if cfg!(feature = "backend-alloy") {
            assert_eq!(kind, BackendKind::Alloy);
        } else {
            assert_eq!(kind, BackendKind::Ethers);
        }
    }

    #[cfg(any(feature = "backend-alloy", feature = "backend-ethers"))]
    #[test]
    fn probed_backend_formats_one_ether() {
        let one_ether = U256::from(1_000_000_000_000_000_000u64);
        let kind = BackendKind::probe().unwrap();
        assert_eq!(kind.format_ether(&one_ether), "1.0");
        assert_eq!(kind.format_ether(&U256::zero()), "0.0");
        assert_eq!(kind.format_ether(&U256::from(1_500_000_000_000_000_000u64)), "1.5");
    }

    // Neither backend touches the network at construction time, so the
    // connected surface can be exercised without an endpoint behind it.
    #[cfg(any(feature = "backend-alloy", feature = "backend-ethers"))]
    #[test]
    fn connected_adapter_decodes_and_formats() {
        let adapter = ProviderAdapter::connect("http://localhost:8545").unwrap();
        assert_eq!(adapter.kind(), BackendKind::probe().unwrap());

        let payload = abi::encode_collect(&U256::from(1_000_000_000_000_000_000u64), "alice");
        let tuple = adapter.decode(&payload).unwrap();
        assert_eq!(tuple.tag, "alice");
        assert_eq!(adapter.format_ether(&tuple.balance), "1.0");
    }

    #[cfg(any(feature = "backend-alloy", feature = "backend-ethers"))]
    #[test]
    fn garbage_endpoints_are_a_configuration_error() {
        assert!(matches!(
            ProviderAdapter::connect("not a url"),
            Err(TrapError::Configuration(_))
        ));
    }

    // The adapter contract: both generations must format identically.
    #[cfg(all(feature = "backend-alloy", feature = "backend-ethers"))]
    #[test]
    fn backends_agree_on_ether_formatting() {
        let samples = [
            U256::zero(),
            U256::from(1u64),
            U256::from(1_000_000_000_000_000_000u64),
            U256::from(1_234_567_890_000_000_000u64),
            U256::from(u64::MAX),
        ];
        for wei in samples {
            assert_eq!(
                trim_unit_suffix(&backend_alloy::format_ether(&wei)),
                trim_unit_suffix(&backend_ethers::format_ether(&wei)),
                "backends disagree on {wei} wei"
            );
        }
    }
}
