//! Ask an injected wallet to switch or add EVM networks
//!
//! Look up a network descriptor, send it to the wallet with
//! `wallet_switchEthereumChain` or `wallet_addEthereumChain`, and show the
//! wallet's answer.
//!
//! ## Building blocks
//!
//! - [`NetworkRegistry`]: the built-in network table (Ethereum mainnet, the
//!   Ropsten/Rinkeby/Goerli test networks, Polygon, BSC).
//! - [`WalletProvider`]: the wallet capability. Browser bindings implement it
//!   against the injected object; [`SimulatedWallet`] implements it in memory.
//! - [`WalletBridge`]: the two wallet operations.
//! - [`NetworkSwitcher`]: the headless screen with one button per network.
//!
//! ## Examples
//!
//! ```rust
//! use chainswitch_rs::{Network, NetworkSwitcher, SimulatedWallet, WalletBridge};
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let wallet = Arc::new(SimulatedWallet::new());
//! let view = NetworkSwitcher::new(WalletBridge::with_provider(wallet.clone()));
//! let _active = view.activate().unwrap();
//!
//! view.click(Network::Polygon).await;
//! assert_eq!(view.error(), None);
//! assert_eq!(wallet.current_chain_id(), 137);
//! assert_eq!(view.current_chain().borrow().as_deref(), Some("0x89"));
//! # });
//! ```

pub mod bridge;
pub mod eip;
pub mod network;
pub mod provider;
pub mod schema;
pub mod simulated;
pub mod view;

pub use bridge::{BridgeError, WalletBridge};
pub use eip::{RequestArguments, WalletMethod};
pub use network::{Network, NetworkRegistry, UnknownNetwork};
pub use provider::{ProviderError, WalletProvider};
pub use schema::{ChainDetails, NativeCurrency, NetworkDescriptor};
pub use simulated::SimulatedWallet;
pub use view::NetworkSwitcher;
