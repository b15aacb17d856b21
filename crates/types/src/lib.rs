use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod request;

pub use catalog::{FieldKind, FieldSpec, OperationSpec};
pub use request::{FormPart, FormValue, RequestBody, RequestPlan};

/// Brickken API environment a request is sent against.
///
/// Every operation resolves its base URL from the selected environment unless
/// an explicit override is supplied via [`Environment::base_url_env_var`].
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    /// Base URL used for API requests.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://api.sandbox.brickken.com",
            Self::Production => "https://api.brickken.com",
        }
    }

    /// Base URL used by the credential connectivity check.
    ///
    /// The check endpoint historically lives on `api-sandbox.brickken.com`
    /// while API traffic is served from `api.sandbox.brickken.com`. Upstream
    /// has never unified the two hosts, so both are kept verbatim here.
    pub fn auth_check_base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://api-sandbox.brickken.com",
            Self::Production => "https://api.brickken.com",
        }
    }

    /// Environment variable that overrides the base URL for this environment.
    pub fn base_url_env_var(&self) -> &'static str {
        "BRICKKEN_API_BASE"
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sandbox => f.write_str("sandbox"),
            Self::Production => f.write_str("production"),
        }
    }
}

impl FromStr for Environment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            _ => Err(ParseEnvironmentError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseEnvironmentError;

impl fmt::Display for ParseEnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid environment; expected 'sandbox' or 'production'")
    }
}

impl Error for ParseEnvironmentError {}

/// Blockchain network selector.
///
/// The wire representation is the upstream chain identifier string
/// (decimal or hex, e.g. `"1"` for Ethereum mainnet, `"aa36a7"` for Sepolia).
/// Networks outside the built-in list travel as [`ChainId::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChainId {
    EthereumMainnet,
    BaseMainnet,
    BnbMainnet,
    PolygonMainnet,
    Sepolia,
    PolygonAmoy,
    Custom(String),
}

impl ChainId {
    /// Selector value that requests a user-supplied chain id.
    pub const CUSTOM: &'static str = "custom";

    /// Wire values of the built-in networks, in menu order.
    pub const KNOWN: [&'static str; 6] = ["1", "2105", "38", "89", "aa36a7", "13882"];

    /// The string sent to the API under the `chainId` property.
    pub fn wire_value(&self) -> &str {
        match self {
            Self::EthereumMainnet => "1",
            Self::BaseMainnet => "2105",
            Self::BnbMainnet => "38",
            Self::PolygonMainnet => "89",
            Self::Sepolia => "aa36a7",
            Self::PolygonAmoy => "13882",
            Self::Custom(id) => id,
        }
    }

    /// Whether this is a custom network with no chain id supplied.
    pub fn is_empty_custom(&self) -> bool {
        matches!(self, Self::Custom(id) if id.trim().is_empty())
    }
}

impl Default for ChainId {
    fn default() -> Self {
        Self::Sepolia
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}

impl FromStr for ChainId {
    type Err = ParseChainIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::EthereumMainnet),
            "2105" => Ok(Self::BaseMainnet),
            "38" => Ok(Self::BnbMainnet),
            "89" => Ok(Self::PolygonMainnet),
            "aa36a7" => Ok(Self::Sepolia),
            "13882" => Ok(Self::PolygonAmoy),
            other => Err(ParseChainIdError {
                value: other.to_string(),
            }),
        }
    }
}

impl Serialize for ChainId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseChainIdError {
    pub value: String,
}

impl fmt::Display for ParseChainIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown chain id '{}'; expected one of {:?} or '{}'",
            self.value,
            ChainId::KNOWN,
            ChainId::CUSTOM
        )
    }
}

impl Error for ParseChainIdError {}

/// Asset class of a token being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    #[serde(rename = "DEBT")]
    Debt,
    #[serde(rename = "EQUITY")]
    Equity,
    #[serde(rename = "REVENUE_SHARE")]
    Funds,
    #[serde(rename = "BILL_FACTORING")]
    PrivateCredit,
    #[serde(rename = "PROFIT_SHARING")]
    ProfitSharing,
    #[serde(rename = "RWA_TOKEN")]
    RwaToken,
}

impl TokenType {
    /// Wire values accepted by the API, in menu order.
    pub const KNOWN: [&'static str; 6] = [
        "DEBT",
        "EQUITY",
        "REVENUE_SHARE",
        "BILL_FACTORING",
        "PROFIT_SHARING",
        "RWA_TOKEN",
    ];

    pub fn wire_value(&self) -> &'static str {
        match self {
            Self::Debt => "DEBT",
            Self::Equity => "EQUITY",
            Self::Funds => "REVENUE_SHARE",
            Self::PrivateCredit => "BILL_FACTORING",
            Self::ProfitSharing => "PROFIT_SHARING",
            Self::RwaToken => "RWA_TOKEN",
        }
    }
}

impl Default for TokenType {
    fn default() -> Self {
        Self::Equity
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}

impl FromStr for TokenType {
    type Err = ParseTokenTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "DEBT" => Ok(Self::Debt),
            "EQUITY" => Ok(Self::Equity),
            "REVENUE_SHARE" => Ok(Self::Funds),
            "BILL_FACTORING" => Ok(Self::PrivateCredit),
            "PROFIT_SHARING" => Ok(Self::ProfitSharing),
            "RWA_TOKEN" => Ok(Self::RwaToken),
            other => Err(ParseTokenTypeError {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenTypeError {
    pub value: String,
}

impl fmt::Display for ParseTokenTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown token type '{}'; expected one of {:?}",
            self.value,
            TokenType::KNOWN
        )
    }
}

impl Error for ParseTokenTypeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_base_urls() {
        assert_eq!(
            Environment::Sandbox.default_base_url(),
            "https://api.sandbox.brickken.com"
        );
        assert_eq!(
            Environment::Production.default_base_url(),
            "https://api.brickken.com"
        );
    }

    #[test]
    fn auth_check_uses_the_legacy_sandbox_host() {
        assert_eq!(
            Environment::Sandbox.auth_check_base_url(),
            "https://api-sandbox.brickken.com"
        );
        assert_eq!(
            Environment::Production.auth_check_base_url(),
            "https://api.brickken.com"
        );
    }

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!("Sandbox".parse::<Environment>(), Ok(Environment::Sandbox));
        assert_eq!(
            "PRODUCTION".parse::<Environment>(),
            Ok(Environment::Production)
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn chain_id_round_trips_known_values() {
        for value in ChainId::KNOWN {
            let chain: ChainId = value.parse().expect("known chain id");
            assert_eq!(chain.wire_value(), value);
        }
        assert!("9999".parse::<ChainId>().is_err());
    }

    #[test]
    fn chain_id_serializes_to_wire_string() {
        let json = serde_json::to_value(ChainId::Sepolia).unwrap();
        assert_eq!(json, serde_json::json!("aa36a7"));
        let json = serde_json::to_value(ChainId::Custom("0x539".into())).unwrap();
        assert_eq!(json, serde_json::json!("0x539"));
    }

    #[test]
    fn empty_custom_chain_is_detected() {
        assert!(ChainId::Custom(String::new()).is_empty_custom());
        assert!(ChainId::Custom("  ".into()).is_empty_custom());
        assert!(!ChainId::Custom("0x1".into()).is_empty_custom());
        assert!(!ChainId::Sepolia.is_empty_custom());
    }

    #[test]
    fn token_type_wire_values() {
        assert_eq!(
            serde_json::to_value(TokenType::Funds).unwrap(),
            serde_json::json!("REVENUE_SHARE")
        );
        assert_eq!(
            "BILL_FACTORING".parse::<TokenType>().unwrap(),
            TokenType::PrivateCredit
        );
    }
}
