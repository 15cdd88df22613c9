use data_encoding::HEXLOWER;
use rand::RngCore;

/// Number of random bytes behind an address (40 hex characters)
pub const WALLET_ADDRESS_BYTES: usize = 20;
pub const WALLET_ADDRESS_PREFIX: &str = "0x";

/// Generate an opaque wallet address for this node.
///
/// The address is random, not derived from any key pair.
pub fn generate_wallet_address() -> String {
    let mut bytes = [0u8; WALLET_ADDRESS_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{WALLET_ADDRESS_PREFIX}{}", HEXLOWER.encode(&bytes))
}
