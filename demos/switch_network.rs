//! Click through every button against an in-memory wallet.
//!
//! Run with `RUST_LOG=debug` to see the requests and `chainChanged` events.

use chainswitch_rs::{Network, NetworkSwitcher, ProviderError, SimulatedWallet, WalletBridge};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let wallet = Arc::new(SimulatedWallet::new());
    let view = NetworkSwitcher::new(WalletBridge::with_provider(wallet.clone()));
    let active = view.activate()?;
    let chain = view.current_chain();

    print!("{}", view.render());
    for button in view.buttons() {
        view.click(button.network).await;
        println!(
            "{} -> wallet on {}, last event {:?}, error {:?}",
            button.label,
            wallet.current_chain_id(),
            chain.borrow().as_deref(),
            view.error(),
        );
    }

    wallet.fail_next(ProviderError::user_rejected());
    view.click(Network::Ethereum).await;
    print!("{}", view.render());

    active.deactivate();

    let offline = NetworkSwitcher::new(WalletBridge::disconnected());
    offline.click_id("polygon").await?;
    print!("{}", offline.render());

    Ok(())
}
