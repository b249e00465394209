// alloy-backed provider, the newer client generation.
//
// Results come back field-named, mirroring how this generation surfaces
// decoded call returns.

use alloy::network::TransactionBuilder;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use ethereum_types::U256;

use crate::abi::{self, AbiFunction};
use crate::config::ContractAddress;
use crate::error::TrapError;
use crate::provider::{CallResult, RpcBackend};

pub(super) struct AlloyBackend {
    provider: DynProvider,
}

impl AlloyBackend {
    pub(super) fn connect(endpoint: &str) -> Result<Self, TrapError> {
        let url = endpoint.parse().map_err(|e| {
            TrapError::Configuration(format!("invalid RPC endpoint {endpoint}: {e}"))
        })?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Ok(Self { provider })
    }
}

#[async_trait]
impl RpcBackend for AlloyBackend {
    async fn get_code(&self, address: &ContractAddress) -> Result<Vec<u8>, TrapError> {
        let target: Address = address
            .as_str()
            .parse()
            .map_err(|e| TrapError::Transport(format!("invalid address {address}: {e}")))?;
        let code = self
            .provider
            .get_code_at(target)
            .await
            .map_err(|e| TrapError::Transport(e.to_string()))?;
        Ok(code.to_vec())
    }

    async fn call(
        &self,
        address: &ContractAddress,
        entry: &AbiFunction,
    ) -> Result<CallResult, TrapError> {
        let target: Address = address
            .as_str()
            .parse()
            .map_err(|e| TrapError::Call(format!("invalid address {address}: {e}")))?;
        let request = TransactionRequest::default()
            .with_to(target)
            .with_input(entry.selector().to_vec());
        let raw = self
            .provider
            .call(request)
            .await
            .map_err(|e| TrapError::Call(e.to_string()))?;
        let tuple = abi::decode_collect(&raw).map_err(|e| TrapError::Call(e.to_string()))?;
        Ok(CallResult::Named {
            balance: tuple.balance,
            tag: tuple.tag,
        })
    }

    fn format_ether(&self, wei: &U256) -> String {
        format_ether(wei)
    }
}

pub(super) fn format_ether(wei: &U256) -> String {
    let mut buf = [0u8; 32];
    wei.to_big_endian(&mut buf);
    let native = alloy::primitives::U256::from_be_slice(&buf);
    alloy::primitives::utils::format_ether(native)
}
