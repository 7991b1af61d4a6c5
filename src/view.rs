//! Headless view model: one button per network and a single error line.

use crate::bridge::{BridgeError, WalletBridge};
use crate::eip::WalletMethod;
use crate::network::{Network, UnknownNetwork};
use crate::provider::ChainSubscription;
use parking_lot::Mutex;
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub network: Network,
    pub method: WalletMethod,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Panel {
    pub title: &'static str,
    pub buttons: Vec<Button>,
}

/// Button caption for a network.
pub fn label(network: Network) -> &'static str {
    match network {
        Network::Ethereum => "Switch to Ethereum Mainnet",
        Network::Ropsten => "Switch to Ropsten Testnet",
        Network::Rinkeby => "Switch to Rinkeby Testnet",
        Network::Goerli => "Switch to Goerli Testnet",
        Network::Polygon => "Switch to Polygon Mainnet",
        Network::Bsc => "Switch to BSC Mainnet",
    }
}

/// Network switching screen.
///
/// Clicks are not serialized: each one clears the error when it starts and
/// records its own failure when it finishes. Of several failing clicks in
/// flight, the one finishing last decides the error line; a success never
/// clears a failure that landed while it was pending.
#[derive(Debug)]
pub struct NetworkSwitcher {
    bridge: WalletBridge,
    error: Mutex<Option<String>>,
    chain: Arc<watch::Sender<Option<String>>>,
}

impl NetworkSwitcher {
    pub fn new(bridge: WalletBridge) -> Self {
        let (chain, _) = watch::channel(None);
        Self {
            bridge,
            error: Mutex::new(None),
            chain: Arc::new(chain),
        }
    }

    /// The two button groups, wallet defaults first.
    pub fn panels(&self) -> Vec<Panel> {
        let (defaults, others): (Vec<Button>, Vec<Button>) = [
            Network::Ethereum,
            Network::Ropsten,
            Network::Rinkeby,
            Network::Goerli,
            Network::Polygon,
            Network::Bsc,
        ]
        .into_iter()
        .map(|network| Button {
            label: label(network),
            network,
            method: network.wallet_method(),
        })
        .partition(|button| button.method == WalletMethod::SwitchEthereumChain);

        vec![
            Panel {
                title: "Switch to Default Metamask networks",
                buttons: defaults,
            },
            Panel {
                title: "Switch to other networks",
                buttons: others,
            },
        ]
    }

    pub fn buttons(&self) -> Vec<Button> {
        self.panels()
            .into_iter()
            .flat_map(|panel| panel.buttons)
            .collect()
    }

    /// Handles a button press for `network`.
    pub async fn click(&self, network: Network) {
        self.set_error(None);
        let descriptor = network.descriptor();
        let result = match network.wallet_method() {
            WalletMethod::SwitchEthereumChain => {
                self.bridge.switch_to_known_network(descriptor).await
            }
            WalletMethod::AddEthereumChain => self.bridge.add_or_switch_network(descriptor).await,
        };
        if let Err(err) = result {
            self.set_error(Some(err.to_string()));
        }
    }

    /// Handles a button press by symbolic network id.
    pub async fn click_id(&self, id: &str) -> Result<(), UnknownNetwork> {
        let network = id
            .parse::<Network>()
            .map_err(|_| UnknownNetwork(id.to_string()))?;
        self.click(network).await;
        Ok(())
    }

    /// The message currently shown, if any.
    pub fn error(&self) -> Option<String> {
        self.error.lock().clone()
    }

    fn set_error(&self, error: Option<String>) {
        *self.error.lock() = error;
    }

    /// Latest chain id announced by the wallet while the view was active.
    pub fn current_chain(&self) -> watch::Receiver<Option<String>> {
        self.chain.subscribe()
    }

    /// Starts listening for `chainChanged`; stops when the guard drops.
    pub fn activate(&self) -> Result<ActiveView, BridgeError> {
        let chain = self.chain.clone();
        let subscription = self.bridge.subscribe_chain_changed(Arc::new(move |chain_id| {
            tracing::info!(chain_id, "wallet changed network");
            chain.send_replace(Some(chain_id.to_string()));
        }))?;
        Ok(ActiveView { subscription })
    }

    /// Plain-text rendering of the panels and the error line.
    pub fn render(&self) -> String {
        let error = self.error();
        let mut out = String::new();
        for panel in self.panels() {
            let _ = writeln!(out, "{}", panel.title);
            for button in &panel.buttons {
                let _ = writeln!(out, "  [{}] {}", button.network, button.label);
            }
            if let Some(error) = &error {
                let _ = writeln!(out, "  ! {error}");
            }
        }
        out
    }
}

/// Active `chainChanged` subscription of a [`NetworkSwitcher`].
#[derive(Debug)]
#[must_use = "the view stops listening as soon as this is dropped"]
pub struct ActiveView {
    subscription: ChainSubscription,
}

impl ActiveView {
    /// Tears the view down, removing its listener.
    pub fn deactivate(self) {
        tracing::debug!(id = ?self.subscription.id(), "deactivating view");
    }
}
