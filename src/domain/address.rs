use crate::error::FaucetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of an account identity in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Identity of a caller, owner, or recipient.
///
/// The text form is `0x` followed by 40 hex digits. Parsing is case-insensitive
/// and display is always lower-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const ZERO: Self = Self([0; ADDRESS_LEN]);

    pub fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = FaucetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| FaucetError::ValidationError(format!("Invalid address {s:?}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = FaucetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_case() {
        let address: Address = "0x92d3267215Ec56542b985473E73C8417403B15ac"
            .parse()
            .unwrap();
        assert_eq!(
            address.to_string(),
            "0x92d3267215ec56542b985473e73c8417403b15ac"
        );
    }

    #[test]
    fn test_parse_without_prefix() {
        let address: Address = "0000000000000000000000000000000000000001".parse().unwrap();
        let mut expected = [0u8; ADDRESS_LEN];
        expected[19] = 1;
        assert_eq!(address, Address::new(expected));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            "0x1234".parse::<Address>(),
            Err(FaucetError::ValidationError(_))
        ));
        assert!(matches!(
            "0xzz00000000000000000000000000000000000000".parse::<Address>(),
            Err(FaucetError::ValidationError(_))
        ));
    }

    #[test]
    fn test_serde_as_string() {
        let address: Address = "0x00000000000000000000000000000000000000ff"
            .parse()
            .unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"0x00000000000000000000000000000000000000ff\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
