// ethers-backed provider, the older client generation.
//
// Results come back as an ordered sequence, mirroring how this generation
// surfaces decoded call returns.

use async_trait::async_trait;
use ethereum_types::U256;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, TransactionRequest};

use crate::abi::{self, AbiFunction};
use crate::config::ContractAddress;
use crate::error::TrapError;
use crate::provider::{AbiValue, CallResult, RpcBackend};

pub(super) struct EthersBackend {
    provider: Provider<Http>,
}

impl EthersBackend {
    pub(super) fn connect(endpoint: &str) -> Result<Self, TrapError> {
        let provider = Provider::<Http>::try_from(endpoint).map_err(|e| {
            TrapError::Configuration(format!("invalid RPC endpoint {endpoint}: {e}"))
        })?;
        Ok(Self { provider })
    }
}

#[async_trait]
impl RpcBackend for EthersBackend {
    async fn get_code(&self, address: &ContractAddress) -> Result<Vec<u8>, TrapError> {
        let target: Address = address
            .as_str()
            .parse()
            .map_err(|e| TrapError::Transport(format!("invalid address {address}: {e}")))?;
        let code = self
            .provider
            .get_code(target, None)
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
        let request: TypedTransaction = TransactionRequest::new()
            .to(target)
            .data(entry.selector().to_vec())
            .into();
        let raw = self
            .provider
            .call(&request, None)
            .await
            .map_err(|e| TrapError::Call(e.to_string()))?;
        let tuple = abi::decode_collect(&raw).map_err(|e| TrapError::Call(e.to_string()))?;
        Ok(CallResult::Positional(vec![
            AbiValue::Uint(tuple.balance),
            AbiValue::Str(tuple.tag),
        ]))
    }

    fn format_ether(&self, wei: &U256) -> String {
        format_ether(wei)
    }
}

pub(super) fn format_ether(wei: &U256) -> String {
    let mut buf = [0u8; 32];
    wei.to_big_endian(&mut buf);
    ethers::utils::format_ether(ethers::types::U256::from_big_endian(&buf))
}
