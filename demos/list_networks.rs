//! Print every network in the built-in registry.

use chainswitch_rs::NetworkRegistry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = NetworkRegistry::builtin();
    println!("Total networks: {}", registry.len());

    for descriptor in registry.iter() {
        println!(
            "{} (chain id {}) name: {} rpc urls: {}",
            descriptor.id,
            descriptor.chain_id,
            descriptor.chain_name().unwrap_or("<wallet default>"),
            descriptor.rpc_urls().len(),
        );
    }

    Ok(())
}
