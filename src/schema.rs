//! Serde bindings for network descriptors.
//!
//! Field names follow the EIP-3085 `wallet_addEthereumChain` parameter object,
//! so a descriptor table can be written by hand in the same shape a wallet
//! expects on the wire.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A network a wallet can be asked to switch to.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    /// Symbolic key, e.g. `"polygon"`.
    pub id: String,
    /// Numeric chain id, encoded as `0x`-prefixed hex on the wire.
    #[serde(
        serialize_with = "serialize_chain_id",
        deserialize_with = "deserialize_chain_id"
    )]
    pub chain_id: u64,
    /// Present only for chains a wallet may not know about.
    #[serde(flatten, deserialize_with = "deserialize_details")]
    pub details: Option<ChainDetails>,
}

impl NetworkDescriptor {
    /// Descriptor for a chain every wallet already recognizes.
    pub fn well_known(id: impl Into<String>, chain_id: u64) -> Self {
        Self {
            id: id.into(),
            chain_id,
            details: None,
        }
    }

    /// Descriptor carrying everything needed to register the chain.
    pub fn custom(id: impl Into<String>, chain_id: u64, details: ChainDetails) -> Self {
        Self {
            id: id.into(),
            chain_id,
            details: Some(details),
        }
    }

    /// Access the chain details if present.
    pub fn details(&self) -> Option<&ChainDetails> {
        self.details.as_ref()
    }

    /// Human readable name, if the descriptor carries one.
    pub fn chain_name(&self) -> Option<&str> {
        self.details.as_ref().map(|d| d.chain_name.as_str())
    }

    /// Access RPC endpoints; empty for well-known chains.
    pub fn rpc_urls(&self) -> &[String] {
        self.details.as_ref().map_or(&[][..], |d| d.rpc_urls.as_slice())
    }

    /// Access block explorer URLs; empty for well-known chains.
    pub fn block_explorer_urls(&self) -> &[String] {
        self.details.as_ref().map_or(&[][..], |d| d.block_explorer_urls.as_slice())
    }
}

/// Metadata a wallet needs before it can add an unknown chain.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDetails {
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    #[serde(default)]
    pub rpc_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub block_explorer_urls: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl NativeCurrency {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// Keys that belong to [`ChainDetails`] when it is flattened into a parent.
const DETAIL_KEYS: [&str; 4] = [
    "chainName",
    "nativeCurrency",
    "rpcUrls",
    "blockExplorerUrls",
];

/// Reads flattened chain details: absent when none of their keys are
/// present, an error when only some of the required ones are.
pub(crate) fn deserialize_details<'de, D>(
    deserializer: D,
) -> Result<Option<ChainDetails>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    let rest = Map::<String, Value>::deserialize(deserializer)?;
    if !DETAIL_KEYS.iter().any(|key| rest.contains_key(*key)) {
        return Ok(None);
    }
    ChainDetails::deserialize(Value::Object(rest))
        .map(Some)
        .map_err(D::Error::custom)
}

/// Canonical wallet encoding of a chain id: `0x` plus lowercase hex, no padding.
pub fn chain_id_hex(chain_id: u64) -> String {
    format!("0x{:x}", chain_id)
}

pub(crate) fn serialize_chain_id<S>(chain_id: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&chain_id_hex(*chain_id))
}

pub(crate) fn deserialize_chain_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de;

    struct ChainIdVisitor;

    impl de::Visitor<'_> for ChainIdVisitor {
        type Value = u64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a u64 or a 0x-prefixed hex string")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            crate::network::parse_chain_id_hex(value).map_err(E::custom)
        }
    }

    deserializer.deserialize_any(ChainIdVisitor)
}
