use bech32_addr_converter::converter::any_addr_to_prefix_addr;

use crate::error::Error;

/// Derives the wallet a validator self-delegates from, by re-encoding its
/// operator address with the chain's account prefix.
pub fn wallet_address(operator_address: &str, prefix: &str) -> Result<String, Error> {
    any_addr_to_prefix_addr(operator_address.to_string(), prefix).map_err(|e| {
        Error::Address(format!(
            "cannot convert {operator_address} to a {prefix} address: {e:?}"
        ))
    })
}
