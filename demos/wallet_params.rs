//! Show the EIP-3326 and EIP-3085 request bodies sent for a network.
//!
//! Usage: `cargo run --example wallet_params -- polygon`

use chainswitch_rs::schema::chain_id_hex;
use chainswitch_rs::{NetworkRegistry, RequestArguments, WalletMethod};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let id = std::env::args().nth(1).unwrap_or_else(|| "polygon".to_string());
    let descriptor = NetworkRegistry::builtin().get(&id)?;

    println!("Hex chain id (3085/3326): {}", chain_id_hex(descriptor.chain_id));
    for method in [WalletMethod::SwitchEthereumChain, WalletMethod::AddEthereumChain] {
        let args = RequestArguments::new(method, descriptor)?;
        println!("{}", serde_json::to_string_pretty(&args)?);
    }

    Ok(())
}
