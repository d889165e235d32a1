use std::fmt;
use thiserror::Error;

/// Prefix byte of every mainnet TRON account address
pub const TRON_ADDRESS_PREFIX: u8 = 0x41;

#[derive(Error, Debug, PartialEq)]
pub enum AddressError {
    #[error("Invalid Base58Check address: {0}")]
    InvalidBase58(String),
    #[error("Address must decode to 21 bytes, got {0}")]
    InvalidLength(usize),
    #[error("Address must start with 0x41, got 0x{0:02x}")]
    InvalidPrefix(u8),
}

/// A TRON account address in both its human-facing and raw forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TronAddress {
    base58: String,
    raw_hex: String,
}

impl TronAddress {
    /// Decode a Base58Check address (`T...`) into its raw `41...` hex encoding
    pub fn parse(base58: &str) -> Result<Self, AddressError> {
        let base58 = base58.trim();
        let bytes = bs58::decode(base58)
            .with_check(None)
            .into_vec()
            .map_err(|e| AddressError::InvalidBase58(e.to_string()))?;

        if bytes.len() != 21 {
            return Err(AddressError::InvalidLength(bytes.len()));
        }
        if bytes[0] != TRON_ADDRESS_PREFIX {
            return Err(AddressError::InvalidPrefix(bytes[0]));
        }

        Ok(Self {
            base58: base58.to_string(),
            raw_hex: hex::encode(&bytes),
        })
    }

    pub fn as_base58(&self) -> &str {
        &self.base58
    }

    /// Lowercase hex of the 21 raw bytes, `41` prefix included
    pub fn raw_hex(&self) -> &str {
        &self.raw_hex
    }

    /// True if `other` names this account, whether given as Base58 or as hex
    /// with or without the `0x`/`41` prefix
    pub fn matches(&self, other: &str) -> bool {
        let other = other.trim();
        if other == self.base58 {
            return true;
        }
        !other.is_empty() && normalize_address(other) == normalize_address(&self.raw_hex)
    }
}

impl fmt::Display for TronAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base58)
    }
}

/// Normalize a hex address to the lowercase 20-byte body.
/// Strips `0x` and the `41` network prefix so contract addresses compare
/// equal however the provider chose to render them.
pub fn normalize_address(address: &str) -> String {
    let addr = address.trim();
    let addr = if addr.starts_with("0x") || addr.starts_with("0X") {
        &addr[2..]
    } else {
        addr
    };
    let lower = addr.to_lowercase();
    if lower.len() == 42 && lower.starts_with("41") {
        lower[2..].to_string()
    } else {
        lower
    }
}
