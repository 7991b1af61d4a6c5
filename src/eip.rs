//! EIP-compatible structures and conversions.
//!
//! - EIP-1193: the `{ method, params }` request envelope and provider errors.
//! - EIP-3326: `wallet_switchEthereumChain` parameters.
//! - EIP-3085: `wallet_addEthereumChain` parameters.

use crate::schema::{
    deserialize_chain_id, deserialize_details, serialize_chain_id, ChainDetails, NetworkDescriptor,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

/// Wallet RPC methods this crate issues.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
pub enum WalletMethod {
    #[serde(rename = "wallet_switchEthereumChain")]
    #[strum(serialize = "wallet_switchEthereumChain")]
    SwitchEthereumChain,
    #[serde(rename = "wallet_addEthereumChain")]
    #[strum(serialize = "wallet_addEthereumChain")]
    AddEthereumChain,
}

/// EIP-3326 wallet switchChain parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip3326Params {
    #[serde(
        serialize_with = "serialize_chain_id",
        deserialize_with = "deserialize_chain_id"
    )]
    pub chain_id: u64,
}

/// EIP-3085 wallet addChain parameters.
///
/// The chain details are optional so a descriptor without them is still
/// forwarded as-is; deciding whether that is acceptable is the wallet's job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip3085Params {
    #[serde(
        serialize_with = "serialize_chain_id",
        deserialize_with = "deserialize_chain_id"
    )]
    pub chain_id: u64,
    #[serde(flatten, deserialize_with = "deserialize_details")]
    pub details: Option<ChainDetails>,
}

impl NetworkDescriptor {
    /// Convert to EIP-3326 wallet parameters.
    pub fn to_eip3326(&self) -> Eip3326Params {
        Eip3326Params {
            chain_id: self.chain_id,
        }
    }

    /// Convert to EIP-3085 wallet parameters.
    pub fn to_eip3085(&self) -> Eip3085Params {
        Eip3085Params {
            chain_id: self.chain_id,
            details: self.details.clone(),
        }
    }
}

/// EIP-1193 `request` arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestArguments {
    pub method: WalletMethod,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl RequestArguments {
    /// Builds the single-parameter request moving a wallet to `descriptor`.
    pub fn new(
        method: WalletMethod,
        descriptor: &NetworkDescriptor,
    ) -> Result<Self, serde_json::Error> {
        let param = match method {
            WalletMethod::SwitchEthereumChain => serde_json::to_value(descriptor.to_eip3326())?,
            WalletMethod::AddEthereumChain => serde_json::to_value(descriptor.to_eip3085())?,
        };
        Ok(Self {
            method,
            params: vec![param],
        })
    }

    /// Decodes the first parameter, if there is one.
    pub fn first_param<T>(&self) -> Option<Result<T, serde_json::Error>>
    where
        T: serde::de::DeserializeOwned,
    {
        self.params
            .first()
            .map(|value| serde_json::from_value(value.clone()))
    }
}

/// Provider error codes from EIP-1193 and JSON-RPC.
pub mod codes {
    pub const USER_REJECTED_REQUEST: i64 = 4001;
    pub const UNAUTHORIZED: i64 = 4100;
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    pub const DISCONNECTED: i64 = 4900;
    pub const CHAIN_DISCONNECTED: i64 = 4901;
    /// MetaMask's "unrecognized chain", returned by `wallet_switchEthereumChain`.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}
