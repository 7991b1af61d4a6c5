//! An in-memory wallet that behaves like a MetaMask-style provider.
//!
//! It knows a set of chains, switches between them, accepts new chains via
//! `wallet_addEthereumChain`, emits `chainChanged` whenever the active chain
//! actually changes and records every request it receives.

use crate::eip::{codes, Eip3085Params, Eip3326Params, RequestArguments, WalletMethod};
use crate::provider::{
    ChainChangedHandler, ChainChangedListeners, ListenerId, ProviderError, WalletProvider,
};
use crate::schema::chain_id_hex;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{BTreeSet, VecDeque};

/// Chains a fresh MetaMask install knows about.
pub const DEFAULT_KNOWN_CHAINS: [u64; 4] = [1, 3, 4, 5];

#[derive(Debug)]
pub struct SimulatedWallet {
    state: Mutex<WalletState>,
    listeners: ChainChangedListeners,
}

#[derive(Debug)]
struct WalletState {
    current_chain: u64,
    known_chains: BTreeSet<u64>,
    requests: Vec<RequestArguments>,
    scripted_failures: VecDeque<ProviderError>,
}

impl Default for SimulatedWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedWallet {
    /// A wallet on Ethereum mainnet knowing [`DEFAULT_KNOWN_CHAINS`].
    pub fn new() -> Self {
        Self::with_known_chains(DEFAULT_KNOWN_CHAINS, 1)
    }

    /// A wallet knowing `chains`, currently on `current` (which is added to
    /// the known set if missing).
    pub fn with_known_chains(chains: impl IntoIterator<Item = u64>, current: u64) -> Self {
        let mut known_chains: BTreeSet<u64> = chains.into_iter().collect();
        known_chains.insert(current);
        Self {
            state: Mutex::new(WalletState {
                current_chain: current,
                known_chains,
                requests: Vec::new(),
                scripted_failures: VecDeque::new(),
            }),
            listeners: ChainChangedListeners::new(),
        }
    }

    pub fn current_chain_id(&self) -> u64 {
        self.state.lock().current_chain
    }

    pub fn knows_chain(&self, chain_id: u64) -> bool {
        self.state.lock().known_chains.contains(&chain_id)
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RequestArguments> {
        self.state.lock().requests.clone()
    }

    /// Makes the next request fail with `error` regardless of its content.
    pub fn fail_next(&self, error: ProviderError) {
        self.state.lock().scripted_failures.push_back(error);
    }

    /// Number of registered `chainChanged` handlers.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Emits `chainChanged` as if the user switched chains in the wallet UI.
    /// The chain becomes known to the wallet if it was not already.
    pub fn emit_chain_changed(&self, chain_id: u64) {
        {
            let mut state = self.state.lock();
            state.known_chains.insert(chain_id);
            state.current_chain = chain_id;
        }
        self.listeners.emit(&chain_id_hex(chain_id));
    }

    /// Applies a request to the wallet state; returns the chain to announce,
    /// if the active chain changed.
    fn apply(&self, args: &RequestArguments) -> Result<Option<u64>, ProviderError> {
        let mut state = self.state.lock();
        state.requests.push(args.clone());
        if let Some(error) = state.scripted_failures.pop_front() {
            return Err(error);
        }

        let target = match args.method {
            WalletMethod::SwitchEthereumChain => {
                let params: Eip3326Params = single_param(args)?;
                if !state.known_chains.contains(&params.chain_id) {
                    return Err(ProviderError::new(
                        codes::UNRECOGNIZED_CHAIN,
                        format!(
                            "Unrecognized chain ID \"{}\". Try adding the chain using wallet_addEthereumChain first.",
                            chain_id_hex(params.chain_id)
                        ),
                    ));
                }
                params.chain_id
            }
            WalletMethod::AddEthereumChain => {
                let params: Eip3085Params = single_param(args)?;
                let details = params.details.ok_or_else(|| {
                    ProviderError::new(
                        codes::INVALID_PARAMS,
                        "Expected a string 'chainName' and an object 'nativeCurrency'",
                    )
                })?;
                if details.rpc_urls.is_empty() {
                    return Err(ProviderError::new(
                        codes::INVALID_PARAMS,
                        "Expected an array with at least one valid string HTTPS url 'rpcUrls'",
                    ));
                }
                state.known_chains.insert(params.chain_id);
                params.chain_id
            }
        };

        if state.current_chain == target {
            return Ok(None);
        }
        state.current_chain = target;
        Ok(Some(target))
    }
}

fn single_param<T>(args: &RequestArguments) -> Result<T, ProviderError>
where
    T: serde::de::DeserializeOwned,
{
    if args.params.len() != 1 {
        return Err(ProviderError::new(
            codes::INVALID_PARAMS,
            format!("Expected single, object parameter. Received: {} parameters", args.params.len()),
        ));
    }
    match args.first_param() {
        Some(Ok(params)) => Ok(params),
        Some(Err(err)) => Err(ProviderError::new(
            codes::INVALID_PARAMS,
            format!("Invalid parameters: {err}"),
        )),
        None => Err(ProviderError::new(codes::INVALID_PARAMS, "Missing parameters")),
    }
}

#[async_trait::async_trait]
impl WalletProvider for SimulatedWallet {
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderError> {
        // Notify after the state lock is released so handlers can query the wallet.
        if let Some(chain_id) = self.apply(&args)? {
            self.listeners.emit(&chain_id_hex(chain_id));
        }
        Ok(Value::Null)
    }

    fn on_chain_changed(&self, handler: ChainChangedHandler) -> ListenerId {
        self.listeners.add(handler)
    }

    fn remove_chain_changed_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}
