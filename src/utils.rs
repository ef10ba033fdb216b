//! Identifier generation.

use bech32::Bech32m;
use uuid7::uuid7;

use crate::error::Error;

/// Mint a fresh identifier: a uuid7 payload bech32m-encoded under the given
/// human-readable prefix.
pub fn new_id(hrp: &str) -> Result<String, Error> {
    let hrp = bech32::Hrp::parse(hrp).map_err(|e| Error::Malformed(e.to_string()))?;
    let encoded = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())
        .map_err(|e| Error::Malformed(e.to_string()))?;
    Ok(encoded)
}

/// Contract ids are minted at creation and immutable afterwards.
pub fn new_contract_id() -> Result<String, Error> {
    new_id("contract")
}
