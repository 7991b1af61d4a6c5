//! The built-in network table and registry lookups.

use crate::eip::WalletMethod;
use crate::schema::{ChainDetails, NativeCurrency, NetworkDescriptor};
use alloy_primitives::U256;
use once_cell::sync::OnceCell;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

/// Networks shipped in the built-in registry, ordered by chain id.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Network {
    Ethereum,
    Ropsten,
    Rinkeby,
    Goerli,
    Bsc,
    Polygon,
}

impl Network {
    /// Symbolic id used as the registry key.
    pub fn id(&self) -> &'static str {
        self.into()
    }

    /// Returns the numerical chain id.
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Ethereum => 1,
            Self::Ropsten => 3,
            Self::Rinkeby => 4,
            Self::Goerli => 5,
            Self::Bsc => 56,
            Self::Polygon => 137,
        }
    }

    /// Hex chain id string (usable for EIP-3085/3326).
    pub fn chain_id_hex(&self) -> String {
        crate::schema::chain_id_hex(self.chain_id())
    }

    /// Registry entry for this network.
    pub fn descriptor(&self) -> &'static NetworkDescriptor {
        // The builtin table is generated from `Network::iter()`, so the
        // discriminant is the entry's index.
        &NetworkRegistry::builtin().entries[*self as usize]
    }

    /// Whether MetaMask-style wallets ship with this chain preconfigured.
    pub fn is_wallet_default(&self) -> bool {
        matches!(
            self,
            Self::Ethereum | Self::Ropsten | Self::Rinkeby | Self::Goerli
        )
    }

    /// The request that moves a wallet onto this network.
    pub fn wallet_method(&self) -> WalletMethod {
        if self.is_wallet_default() {
            WalletMethod::SwitchEthereumChain
        } else {
            WalletMethod::AddEthereumChain
        }
    }

    /// Resolves a chain id as reported by a wallet's `chainChanged` event.
    pub fn from_chain_id_hex(value: &str) -> Result<Self, NetworkFromHexError> {
        let chain_id = parse_chain_id_hex(value)?;
        Ok(Self::try_from(chain_id)?)
    }

    fn build_descriptor(&self) -> NetworkDescriptor {
        match self {
            Self::Ethereum | Self::Ropsten | Self::Rinkeby | Self::Goerli => {
                NetworkDescriptor::well_known(self.id(), self.chain_id())
            }
            Self::Polygon => NetworkDescriptor::custom(
                self.id(),
                self.chain_id(),
                ChainDetails {
                    chain_name: "Polygon Mainnet".to_string(),
                    native_currency: NativeCurrency::new("MATIC", "MATIC", 18),
                    rpc_urls: urls(&["https://polygon-rpc.com/"]),
                    block_explorer_urls: urls(&["https://polygonscan.com/"]),
                },
            ),
            Self::Bsc => NetworkDescriptor::custom(
                self.id(),
                self.chain_id(),
                ChainDetails {
                    chain_name: "Binance Smart Chain Mainnet".to_string(),
                    native_currency: NativeCurrency::new("Binance Chain Native Token", "BNB", 18),
                    rpc_urls: urls(&[
                        "https://bsc-dataseed1.binance.org",
                        "https://bsc-dataseed2.binance.org",
                        "https://bsc-dataseed3.binance.org",
                        "https://bsc-dataseed4.binance.org",
                        "https://bsc-dataseed1.defibit.io",
                        "https://bsc-dataseed2.defibit.io",
                        "https://bsc-dataseed3.defibit.io",
                        "https://bsc-dataseed4.defibit.io",
                        "https://bsc-dataseed1.ninicoin.io",
                        "https://bsc-dataseed2.ninicoin.io",
                        "https://bsc-dataseed3.ninicoin.io",
                        "https://bsc-dataseed4.ninicoin.io",
                        "wss://bsc-ws-node.nariox.org",
                    ]),
                    block_explorer_urls: urls(&["https://bscscan.com"]),
                },
            ),
        }
    }
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl TryFrom<u64> for Network {
    type Error = ChainIdNotSupported;

    /// Initializes `Network` from a chain ID, returns error if the chain id is not supported
    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::iter()
            .find(|network| network.chain_id() == value)
            .ok_or_else(|| ChainIdNotSupported(value.to_string()))
    }
}

impl TryFrom<U256> for Network {
    type Error = ChainIdNotSupported;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        match u64::try_from(value) {
            Ok(id) => Self::try_from(id),
            Err(_) => Err(ChainIdNotSupported(value.to_string())),
        }
    }
}

impl Serialize for Network {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NetworkVisitor;

        impl de::Visitor<'_> for NetworkVisitor {
            type Value = Network;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a network id, a chain id or a hex chain id")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Network::try_from(value).map_err(E::custom)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if let Ok(network) = value.parse::<Network>() {
                    return Ok(network);
                }
                if value.starts_with("0x") {
                    return Network::from_chain_id_hex(value).map_err(E::custom);
                }
                match value.parse::<u64>() {
                    Ok(id) => Network::try_from(id).map_err(E::custom),
                    Err(_) => Err(E::custom(UnknownNetwork(value.to_string()))),
                }
            }
        }

        deserializer.deserialize_any(NetworkVisitor)
    }
}

/// Parses a `0x`-prefixed hex chain id into its numeric value.
pub fn parse_chain_id_hex(value: &str) -> Result<u64, InvalidChainIdHex> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| InvalidChainIdHex::MissingPrefix(value.to_string()))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(InvalidChainIdHex::NotHex(value.to_string()));
    }
    let wide = U256::from_str_radix(digits, 16)
        .map_err(|_| InvalidChainIdHex::Overflow(value.to_string()))?;
    u64::try_from(wide).map_err(|_| InvalidChainIdHex::Overflow(value.to_string()))
}

/// A lookup table of network descriptors keyed by symbolic id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkRegistry {
    entries: Vec<NetworkDescriptor>,
}

static BUILTIN: OnceCell<NetworkRegistry> = OnceCell::new();

impl NetworkRegistry {
    /// The registry of every [`Network`], created on first use.
    pub fn builtin() -> &'static NetworkRegistry {
        BUILTIN.get_or_init(|| NetworkRegistry {
            entries: Network::iter().map(|n| n.build_descriptor()).collect(),
        })
    }

    /// Builds a registry, rejecting duplicate ids and chain ids.
    pub fn new(entries: Vec<NetworkDescriptor>) -> Result<Self, RegistryLoadError> {
        let mut ids = HashSet::new();
        let mut chain_ids = HashSet::new();
        for entry in &entries {
            if !ids.insert(entry.id.as_str()) {
                return Err(RegistryLoadError::DuplicateId(entry.id.clone()));
            }
            if !chain_ids.insert(entry.chain_id) {
                return Err(RegistryLoadError::DuplicateChainId(entry.chain_id));
            }
        }
        Ok(Self { entries })
    }

    /// Loads a registry from a JSON array of descriptors.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryLoadError> {
        let entries: Vec<NetworkDescriptor> =
            serde_json::from_str(json).map_err(RegistryLoadError::Json)?;
        Self::new(entries)
    }

    /// Looks a descriptor up by its symbolic id.
    pub fn get(&self, id: &str) -> Result<&NetworkDescriptor, UnknownNetwork> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| UnknownNetwork(id.to_string()))
    }

    pub fn by_chain_id(&self, chain_id: u64) -> Option<&NetworkDescriptor> {
        self.entries.iter().find(|entry| entry.chain_id == chain_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The requested network id is not in the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown network {0:?}")]
pub struct UnknownNetwork(pub String);

/// Error indicating that a particular chain ID is not supported.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("chain id {0} not supported")]
pub struct ChainIdNotSupported(pub String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidChainIdHex {
    #[error("chain id {0:?} is missing the 0x prefix")]
    MissingPrefix(String),
    #[error("chain id {0:?} is not a hex number")]
    NotHex(String),
    #[error("chain id {0:?} does not fit in 64 bits")]
    Overflow(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkFromHexError {
    #[error(transparent)]
    Invalid(#[from] InvalidChainIdHex),
    #[error(transparent)]
    NotSupported(#[from] ChainIdNotSupported),
}

/// Errors when building a registry from external data.
#[derive(Debug, Error)]
pub enum RegistryLoadError {
    #[error("failed to parse network table: {0}")]
    Json(#[source] serde_json::Error),
    #[error("network id {0:?} defined more than once")]
    DuplicateId(String),
    #[error("chain id {0} defined more than once")]
    DuplicateChainId(u64),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn chain_id_hex_is_canonical() {
        for (id, hex) in [
            (1u64, "0x1"),
            (3, "0x3"),
            (4, "0x4"),
            (5, "0x5"),
            (56, "0x38"),
            (137, "0x89"),
        ] {
            let network = Network::try_from(id).unwrap();
            assert_eq!(network.chain_id_hex(), hex);
            assert_eq!(network.descriptor().chain_id, id);
            assert_eq!(parse_chain_id_hex(hex), Ok(id));
        }
    }

    #[test]
    fn parse_chain_id_hex_rejects_garbage() {
        assert!(matches!(
            parse_chain_id_hex("89"),
            Err(InvalidChainIdHex::MissingPrefix(_))
        ));
        assert!(matches!(
            parse_chain_id_hex("0x"),
            Err(InvalidChainIdHex::NotHex(_))
        ));
        assert!(matches!(
            parse_chain_id_hex("0xzz"),
            Err(InvalidChainIdHex::NotHex(_))
        ));
        assert!(matches!(
            parse_chain_id_hex("0x10000000000000000"),
            Err(InvalidChainIdHex::Overflow(_))
        ));
        // Wallets are not required to send lowercase.
        assert_eq!(parse_chain_id_hex("0xA"), Ok(10));
    }

    #[test]
    fn descriptor_index_matches_network() {
        for network in Network::iter() {
            let descriptor = network.descriptor();
            assert_eq!(descriptor.id, network.id());
            assert_eq!(descriptor.chain_id, network.chain_id());
        }
    }

    #[test]
    fn networks_sorted_and_unique() {
        let ids: Vec<u64> = Network::iter().map(|n| n.chain_id()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted, "Network variants should stay ordered by chain id");

        let unique: HashSet<u64> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn builtin_lookup() {
        let registry = NetworkRegistry::builtin();
        assert_eq!(registry.len(), 6);

        let polygon = registry.get("polygon").unwrap();
        assert_eq!(polygon.chain_id, 137);
        assert_eq!(polygon.chain_name(), Some("Polygon Mainnet"));

        let bsc = registry.by_chain_id(56).unwrap();
        assert_eq!(bsc.id, "bsc");
        assert_eq!(bsc.rpc_urls().len(), 13);
        assert_eq!(bsc.rpc_urls()[0], "https://bsc-dataseed1.binance.org");

        assert!(registry.get("ethereum").unwrap().details().is_none());
        assert_eq!(
            registry.get("kovan"),
            Err(UnknownNetwork("kovan".to_string()))
        );
    }

    #[test]
    fn wallet_methods() {
        assert_eq!(
            Network::Goerli.wallet_method(),
            WalletMethod::SwitchEthereumChain
        );
        assert_eq!(Network::Bsc.wallet_method(), WalletMethod::AddEthereumChain);
    }

    #[test]
    fn u256_conversion() {
        assert_eq!(Network::try_from(U256::from(137u64)), Ok(Network::Polygon));
        assert!(Network::try_from(U256::MAX).is_err());
    }

    #[test]
    fn from_chain_id_hex() {
        assert_eq!(Network::from_chain_id_hex("0x38"), Ok(Network::Bsc));
        assert!(matches!(
            Network::from_chain_id_hex("0x2a"),
            Err(NetworkFromHexError::NotSupported(_))
        ));
    }

    #[test]
    fn deserialize_network() {
        let network: Network = serde_json::from_str("\"rinkeby\"").unwrap();
        assert_eq!(network, Network::Rinkeby);
        let network: Network = serde_json::from_str("137").unwrap();
        assert_eq!(network, Network::Polygon);
        let network: Network = serde_json::from_str("\"0x5\"").unwrap();
        assert_eq!(network, Network::Goerli);
        let network: Network = serde_json::from_str("\"56\"").unwrap();
        assert_eq!(network, Network::Bsc);

        assert!(serde_json::from_str::<Network>("\"invalid\"").is_err());
        assert!(serde_json::from_str::<Network>("42").is_err());

        assert_eq!(serde_json::to_string(&Network::Bsc).unwrap(), "\"bsc\"");
    }

    #[test]
    fn registry_from_json() {
        let json = r#"[
            {"id": "mainnet", "chainId": "0x1"},
            {
                "id": "gnosis",
                "chainId": 100,
                "chainName": "Gnosis",
                "nativeCurrency": {"name": "xDAI", "symbol": "XDAI", "decimals": 18},
                "rpcUrls": ["https://rpc.gnosischain.com"]
            }
        ]"#;
        let registry = NetworkRegistry::from_json_str(json).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get("mainnet").unwrap().details().is_none());

        let gnosis = registry.get("gnosis").unwrap();
        assert_eq!(gnosis.chain_id, 100);
        assert_eq!(gnosis.chain_name(), Some("Gnosis"));
        assert!(gnosis.block_explorer_urls().is_empty());
    }

    #[test]
    fn registry_rejects_partial_details() {
        let json = r#"[{
            "id": "gnosis",
            "chainId": "0x64",
            "chainName": "Gnosis",
            "rpcUrls": ["https://rpc.gnosischain.com"]
        }]"#;
        let err = NetworkRegistry::from_json_str(json).unwrap_err();
        assert!(
            matches!(&err, RegistryLoadError::Json(e) if e.to_string().contains("nativeCurrency")),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn registry_rejects_duplicates() {
        let json = r#"[{"id": "a", "chainId": "0x1"}, {"id": "b", "chainId": "0x1"}]"#;
        assert!(matches!(
            NetworkRegistry::from_json_str(json),
            Err(RegistryLoadError::DuplicateChainId(1))
        ));

        let json = r#"[{"id": "a", "chainId": "0x1"}, {"id": "a", "chainId": "0x2"}]"#;
        assert!(matches!(
            NetworkRegistry::from_json_str(json),
            Err(RegistryLoadError::DuplicateId(id)) if id == "a"
        ));

        assert!(matches!(
            NetworkRegistry::from_json_str("{}"),
            Err(RegistryLoadError::Json(_))
        ));
    }

    #[test]
    fn descriptor_serializes_with_hex_chain_id() {
        let value = serde_json::to_value(Network::Polygon.descriptor()).unwrap();
        assert_eq!(value["chainId"], "0x89");
        assert_eq!(value["chainName"], "Polygon Mainnet");
        assert_eq!(value["nativeCurrency"]["decimals"], 18);

        let value = serde_json::to_value(Network::Ethereum.descriptor()).unwrap();
        assert_eq!(value, serde_json::json!({"id": "ethereum", "chainId": "0x1"}));
    }
}
