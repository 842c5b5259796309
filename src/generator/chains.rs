// src/generator/chains.rs

/// Name of an EVM chain Etherscan's multichain API can serve ABIs for.
/// Unknown chain ids return `None`.
pub fn etherscan_chain_name(chain_id: u64) -> Option<&'static str> {
    let name = match chain_id {
        // Ethereum
        1 => "Ethereum Mainnet",
        11155111 => "Sepolia",
        17000 => "Holesky",
        560048 => "Hoodi",
        // L2s and sidechains
        10 => "OP Mainnet",
        11155420 => "OP Sepolia",
        56 => "BNB Smart Chain",
        97 => "BNB Smart Chain Testnet",
        204 => "opBNB",
        137 => "Polygon",
        80002 => "Polygon Amoy",
        42161 => "Arbitrum One",
        42170 => "Arbitrum Nova",
        421614 => "Arbitrum Sepolia",
        8453 => "Base",
        84532 => "Base Sepolia",
        43114 => "Avalanche C-Chain",
        43113 => "Avalanche Fuji",
        59144 => "Linea",
        59141 => "Linea Sepolia",
        534352 => "Scroll",
        534351 => "Scroll Sepolia",
        324 => "zkSync",
        81457 => "Blast",
        5000 => "Mantle",
        100 => "Gnosis",
        1284 => "Moonbeam",
        1285 => "Moonriver",
        42220 => "Celo",
        252 => "Fraxtal",
        130 => "Unichain",
        480 => "World Chain",
        146 => "Sonic",
        167000 => "Taiko",
        _ => return None,
    };
    Some(name)
}
