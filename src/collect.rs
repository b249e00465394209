// collect() invocation
//
// Second step of the check flow: simulate the read-only collect() call via
// the provider adapter and normalize whatever result shape the backing
// client generation produced. A failure here is reported but never aborts
// the process; the bytecode gate has already established that a contract
// exists.

use crate::abi::{self, AbiTuple};
use crate::config::ContractAddress;
use crate::error::TrapError;
use crate::provider::{AbiValue, CallResult, ProviderAdapter};

/// Invoke collect() on the trap and return the decoded balance and tag.
pub async fn invoke_collect(
    adapter: &ProviderAdapter,
    address: &ContractAddress,
) -> Result<AbiTuple, TrapError> {
    let entry = abi::function("collect")
        .ok_or_else(|| TrapError::Call("collect() is missing from the embedded ABI".into()))?;
    let result = adapter.call(address, entry).await?;
    println!("collect() raw result: {result:?}");
    normalize(result)
}

/// Collapse the two historical result shapes into one tuple: named fields
/// are used directly, positional sequences are taken by index.
pub fn normalize(result: CallResult) -> Result<AbiTuple, TrapError> {
    match result {
        CallResult::Named { balance, tag } => Ok(AbiTuple { balance, tag }),
        CallResult::Positional(values) => {
            let mut values = values.into_iter();
            match (values.next(), values.next()) {
                (Some(AbiValue::Uint(balance)), Some(AbiValue::Str(tag))) => {
                    Ok(AbiTuple { balance, tag })
                }
                _ => Err(TrapError::Call(
                    "unexpected result shape from collect()".into(),
                )),
            }
        }
    }
}
