//! Forwards network descriptors to the wallet.

use crate::eip::{RequestArguments, WalletMethod};
use crate::provider::{ChainChangedHandler, ChainSubscription, ProviderError, WalletProvider};
use crate::schema::NetworkDescriptor;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("No crypto wallet found")]
    NoProvider,
    #[error(transparent)]
    ProviderRequest(#[from] ProviderError),
    #[error("failed to encode wallet parameters: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Wallet access for the view; the provider is optional because it is
/// injected by the environment and may simply not be there.
#[derive(Clone, Default)]
pub struct WalletBridge {
    provider: Option<Arc<dyn WalletProvider>>,
}

impl WalletBridge {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>) -> Self {
        Self { provider }
    }

    pub fn with_provider(provider: Arc<dyn WalletProvider>) -> Self {
        Self::new(Some(provider))
    }

    /// A bridge for an environment without a wallet.
    pub fn disconnected() -> Self {
        Self::new(None)
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&Arc<dyn WalletProvider>, BridgeError> {
        self.provider.as_ref().ok_or(BridgeError::NoProvider)
    }

    /// Asks the wallet to switch to a chain it already knows (EIP-3326).
    pub async fn switch_to_known_network(
        &self,
        descriptor: &NetworkDescriptor,
    ) -> Result<(), BridgeError> {
        self.switch_network(descriptor, WalletMethod::SwitchEthereumChain)
            .await
    }

    /// Asks the wallet to add the chain and switch to it (EIP-3085).
    pub async fn add_or_switch_network(
        &self,
        descriptor: &NetworkDescriptor,
    ) -> Result<(), BridgeError> {
        self.switch_network(descriptor, WalletMethod::AddEthereumChain)
            .await
    }

    /// Sends `descriptor` to the wallet using `method`.
    ///
    /// Success means only that the wallet accepted the request; the active
    /// chain is announced separately through `chainChanged`.
    pub async fn switch_network(
        &self,
        descriptor: &NetworkDescriptor,
        method: WalletMethod,
    ) -> Result<(), BridgeError> {
        let provider = self.provider()?;
        let args = RequestArguments::new(method, descriptor)?;
        tracing::debug!(network = %descriptor.id, ?args, "sending wallet request");
        match provider.request(args).await {
            Ok(_) => Ok(()),
            Err(err) => {
                tracing::warn!(
                    network = %descriptor.id,
                    %method,
                    code = err.code,
                    "wallet rejected request: {}",
                    err.message
                );
                Err(err.into())
            }
        }
    }

    /// Registers `handler` for `chainChanged` until the returned guard drops.
    pub fn subscribe_chain_changed(
        &self,
        handler: ChainChangedHandler,
    ) -> Result<ChainSubscription, BridgeError> {
        let provider = self.provider()?;
        Ok(ChainSubscription::new(provider.clone(), handler))
    }
}

impl std::fmt::Debug for WalletBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletBridge")
            .field("has_provider", &self.has_provider())
            .finish()
    }
}
