//! Configuration for the token ledger

use crate::types::{Amount, TokenMetadata};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Largest `decimals` whose unit (10^decimals) still fits in 256 bits
pub const MAX_DECIMALS: u8 = 77;

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Token parameters
    pub token: TokenConfig,

    /// Actor host configuration
    pub actor: ActorConfig,

    /// Audit journal configuration
    pub journal: JournalConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "token-ledger".to_string(),
            token: TokenConfig::default(),
            actor: ActorConfig::default(),
            journal: JournalConfig::default(),
        }
    }
}

/// Token parameters fixed at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Human-readable name
    pub name: String,

    /// Ticker symbol
    pub symbol: String,

    /// Display decimals
    pub decimals: u8,

    /// Supply cap as a decimal string; `None` for uncapped
    #[serde(default)]
    pub cap: Option<String>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "ODX Token".to_string(),
            symbol: "ODX".to_string(),
            decimals: 18,
            cap: None,
        }
    }
}

impl TokenConfig {
    /// Parsed supply cap
    pub fn cap(&self) -> Result<Option<Amount>> {
        let Some(raw) = self.cap.as_deref() else {
            return Ok(None);
        };

        let cap = Amount::from_dec_str(raw.trim())
            .map_err(|e| Error::Config(format!("Invalid cap {:?}: {:?}", raw, e)))?;
        if cap.is_zero() {
            return Err(Error::Config("Cap must be positive".to_string()));
        }
        Ok(Some(cap))
    }

    /// Metadata derived from this configuration
    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
        }
    }

    /// Check all fields
    pub fn validate(&self) -> Result<()> {
        self.metadata().validate()?;
        self.cap()?;
        Ok(())
    }
}

/// Actor host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorConfig {
    /// Bounded mailbox size (backpressure)
    pub mailbox_capacity: usize,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 1000,
        }
    }
}

/// Audit journal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Record committed calls
    pub enabled: bool,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(name) = std::env::var("TOKEN_NAME") {
            config.token.name = name;
        }

        if let Ok(symbol) = std::env::var("TOKEN_SYMBOL") {
            config.token.symbol = symbol;
        }

        if let Ok(decimals) = std::env::var("TOKEN_DECIMALS") {
            config.token.decimals = decimals
                .parse()
                .map_err(|e| Error::Config(format!("Invalid TOKEN_DECIMALS: {}", e)))?;
        }

        if let Ok(cap) = std::env::var("TOKEN_CAP") {
            config.token.cap = Some(cap);
        }

        if let Ok(capacity) = std::env::var("LEDGER_MAILBOX_CAPACITY") {
            config.actor.mailbox_capacity = capacity
                .parse()
                .map_err(|e| Error::Config(format!("Invalid LEDGER_MAILBOX_CAPACITY: {}", e)))?;
        }

        if let Ok(enabled) = std::env::var("LEDGER_JOURNAL_ENABLED") {
            config.journal.enabled = enabled
                .parse()
                .map_err(|e| Error::Config(format!("Invalid LEDGER_JOURNAL_ENABLED: {}", e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check all sections
    pub fn validate(&self) -> Result<()> {
        self.token.validate()?;
        if self.actor.mailbox_capacity == 0 {
            return Err(Error::Config("Mailbox capacity must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "token-ledger");
        assert_eq!(config.token.decimals, 18);
        assert!(config.journal.enabled);
        config.validate().unwrap();
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml(
            r#"
            service_name = "odx"

            [token]
            name = "ODX Test Token 01"
            symbol = "ODXT"
            decimals = 18
            cap = "1000000000000000000000000000"

            [actor]
            mailbox_capacity = 16

            [journal]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.token.symbol, "ODXT");
        assert_eq!(
            config.token.cap().unwrap(),
            Some(Amount::from_dec_str("1000000000000000000000000000").unwrap())
        );
        assert_eq!(config.actor.mailbox_capacity, 16);
        assert!(!config.journal.enabled);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut token = TokenConfig::default();
        token.cap = Some("0".to_string());
        assert!(matches!(token.validate(), Err(Error::Config(_))));

        token.cap = Some("12abc".to_string());
        assert!(matches!(token.validate(), Err(Error::Config(_))));

        let mut token = TokenConfig::default();
        token.decimals = 78;
        assert!(matches!(token.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.actor.mailbox_capacity = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    const ENV_VARS: [&str; 6] = [
        "TOKEN_NAME",
        "TOKEN_SYMBOL",
        "TOKEN_DECIMALS",
        "TOKEN_CAP",
        "LEDGER_MAILBOX_CAPACITY",
        "LEDGER_JOURNAL_ENABLED",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    // Single test so the process-wide variables are never touched concurrently
    #[test]
    fn test_from_env_overrides_and_rejections() {
        clear_env();

        std::env::set_var("TOKEN_SYMBOL", "ODXT");
        std::env::set_var("TOKEN_DECIMALS", "6");
        std::env::set_var("TOKEN_CAP", "5000");
        std::env::set_var("LEDGER_MAILBOX_CAPACITY", "32");
        std::env::set_var("LEDGER_JOURNAL_ENABLED", "false");

        let config = Config::from_env().unwrap();
        assert_eq!(config.token.name, "ODX Token");
        assert_eq!(config.token.symbol, "ODXT");
        assert_eq!(config.token.decimals, 6);
        assert_eq!(config.token.cap().unwrap(), Some(Amount::from(5_000u64)));
        assert_eq!(config.actor.mailbox_capacity, 32);
        assert!(!config.journal.enabled);

        std::env::set_var("TOKEN_DECIMALS", "six");
        assert!(matches!(Config::from_env(), Err(Error::Config(_))));
        std::env::set_var("TOKEN_DECIMALS", "6");

        std::env::set_var("LEDGER_MAILBOX_CAPACITY", "0");
        assert!(matches!(Config::from_env(), Err(Error::Config(_))));
        std::env::set_var("LEDGER_MAILBOX_CAPACITY", "32");

        std::env::set_var("TOKEN_CAP", "0");
        assert!(matches!(Config::from_env(), Err(Error::Config(_))));

        clear_env();
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.toml");
        std::fs::write(
            &path,
            "service_name = \"file\"\n[token]\nname = \"A\"\nsymbol = \"B\"\ndecimals = 0\n[actor]\nmailbox_capacity = 4\n[journal]\nenabled = true\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.service_name, "file");
        assert_eq!(config.token.cap().unwrap(), None);
    }
}
