//! Merchant configuration for the Authorize.net gateway
//!
//! Settings are entered by the site operator and are read-only while a
//! transaction is being submitted. They can be built in code, read from the
//! environment (optionally seeded from a `.env` file) or parsed from a TOML
//! table:
//!
//! ```toml
//! api_login_id = "5KP3u95bQpv"
//! transaction_key = "346HZ32z3fP4hTG2"
//! production_enabled = false
//! purchase_description = "Tickets for Summer Fest"
//! solution_id = "AAA100302"
//! currency = "USD"
//! ```

use crate::error::ConfigError;
use crate::money::Currency;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Default environment variable prefix
pub const DEFAULT_ENV_PREFIX: &str = "AUTHORIZENET";

/// Window in which the gateway rejects an identical resubmission
pub const DEFAULT_DUPLICATE_WINDOW_SECS: u32 = 600;

/// Longest duplicate window the gateway accepts (8 hours)
pub const MAX_DUPLICATE_WINDOW_SECS: u32 = 28_800;

const MAX_LOGIN_ID_LEN: usize = 25;
const MAX_TRANSACTION_KEY_LEN: usize = 16;
const MAX_DESCRIPTION_LEN: usize = 255;

/// Gateway environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Authorize.net sandbox (apitest)
    #[default]
    Sandbox,
    /// Live transactions
    Production,
}

impl Environment {
    /// JSON API endpoint for this environment
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://apitest.authorize.net/xml/v1/request.api",
            Self::Production => "https://api.authorize.net/xml/v1/request.api",
        }
    }

    /// Is this the live environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sandbox => write!(f, "sandbox"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Merchant credentials and plugin settings
#[derive(Debug)]
pub struct MerchantCredentials {
    /// API login ID
    pub api_login_id: SecretString,
    /// Transaction key
    pub transaction_key: SecretString,
    /// Send transactions to the production API
    pub production_enabled: bool,
    /// Authorize.net solution ID (reseller/integrator attribution)
    pub solution_id: Option<String>,
    /// Description shown on the buyer's bank statement
    pub purchase_description: String,
    /// Settlement currency of the merchant account
    pub currency: Currency,
    /// Duplicate transaction window in seconds
    pub duplicate_window: u32,
    /// HTTP timeout for the gateway round trip
    pub timeout: Duration,
}

impl MerchantCredentials {
    /// Create sandbox credentials with default settings
    pub fn new(
        api_login_id: impl Into<String>,
        transaction_key: impl Into<String>,
        purchase_description: impl Into<String>,
    ) -> Self {
        Self {
            api_login_id: SecretString::new(api_login_id.into().into()),
            transaction_key: SecretString::new(transaction_key.into().into()),
            production_enabled: false,
            solution_id: None,
            purchase_description: purchase_description.into(),
            currency: Currency::default(),
            duplicate_window: DEFAULT_DUPLICATE_WINDOW_SECS,
            timeout: Duration::from_secs(30),
        }
    }

    /// Use the production API
    pub fn production(mut self) -> Self {
        self.production_enabled = true;
        self
    }

    /// Set the solution ID
    pub fn with_solution_id(mut self, solution_id: impl Into<String>) -> Self {
        self.solution_id = Some(solution_id.into());
        self
    }

    /// Set the merchant account currency
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Set the duplicate window
    pub fn with_duplicate_window(mut self, seconds: u32) -> Self {
        self.duplicate_window = seconds;
        self
    }

    /// Set the HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Gateway environment selected by the production flag
    pub fn environment(&self) -> Environment {
        if self.production_enabled {
            Environment::Production
        } else {
            Environment::Sandbox
        }
    }

    /// Read settings from `{PREFIX}_*` environment variables
    pub fn from_env(prefix: Option<&str>) -> Result<Self, ConfigError> {
        let prefix = prefix.unwrap_or(DEFAULT_ENV_PREFIX);
        let var = |key: &str| -> Option<String> {
            env::var(format!("{}_{}", prefix, key))
                .ok()
                .filter(|v| !v.trim().is_empty())
        };
        let required = |key: &str| -> Result<String, ConfigError> {
            var(key).ok_or_else(|| ConfigError::Missing(format!("{}_{}", prefix, key)))
        };

        let raw = RawSettings {
            api_login_id: required("API_LOGIN_ID")?,
            transaction_key: required("TRANSACTION_KEY")?,
            production_enabled: var("PRODUCTION_ENABLED")
                .map(|v| parse_bool("production_enabled", &v))
                .transpose()?,
            solution_id: var("SOLUTION_ID"),
            purchase_description: required("PURCHASE_DESCRIPTION")?,
            currency: var("CURRENCY"),
            duplicate_window: var("DUPLICATE_WINDOW")
                .map(|v| parse_number("duplicate_window", &v))
                .transpose()?,
            timeout_secs: var("TIMEOUT_SECS")
                .map(|v| parse_number("timeout_secs", &v).map(u64::from))
                .transpose()?,
        };

        raw.into_credentials()
    }

    /// Load a `.env` file into the process environment, then read it
    pub fn from_dotenv(path: Option<&Path>, prefix: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::Load(e.to_string()))?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Self::from_env(prefix)
    }

    /// Parse settings from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawSettings =
            toml::from_str(content).map_err(|e| ConfigError::Parse(format!("TOML parse error: {}", e)))?;
        raw.into_credentials()
    }

    /// Parse settings from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Load(format!("Failed to read file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Check values against the gateway's limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        let login_id = self.api_login_id.expose_secret();
        if login_id.trim().is_empty() {
            return Err(ConfigError::Missing("api_login_id".into()));
        }
        if login_id.chars().count() > MAX_LOGIN_ID_LEN {
            return Err(invalid(
                "api_login_id",
                format!("must be at most {} characters", MAX_LOGIN_ID_LEN),
            ));
        }

        let key = self.transaction_key.expose_secret();
        if key.trim().is_empty() {
            return Err(ConfigError::Missing("transaction_key".into()));
        }
        if key.chars().count() > MAX_TRANSACTION_KEY_LEN {
            return Err(invalid(
                "transaction_key",
                format!("must be at most {} characters", MAX_TRANSACTION_KEY_LEN),
            ));
        }

        if self.purchase_description.trim().is_empty() {
            return Err(ConfigError::Missing("purchase_description".into()));
        }
        if self.purchase_description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(invalid(
                "purchase_description",
                format!("must be at most {} characters", MAX_DESCRIPTION_LEN),
            ));
        }

        if self.duplicate_window > MAX_DUPLICATE_WINDOW_SECS {
            return Err(invalid(
                "duplicate_window",
                format!("must be at most {} seconds", MAX_DUPLICATE_WINDOW_SECS),
            ));
        }

        if self.timeout.is_zero() {
            return Err(invalid("timeout_secs", "must be greater than zero".into()));
        }

        Ok(())
    }
}

/// Settings as they appear in files and the environment
#[derive(Debug, Deserialize)]
struct RawSettings {
    api_login_id: String,
    transaction_key: String,
    #[serde(default)]
    production_enabled: Option<bool>,
    #[serde(default)]
    solution_id: Option<String>,
    purchase_description: String,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    duplicate_window: Option<u32>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

impl RawSettings {
    fn into_credentials(self) -> Result<MerchantCredentials, ConfigError> {
        let mut credentials = MerchantCredentials::new(
            self.api_login_id.trim(),
            self.transaction_key.trim(),
            self.purchase_description.trim(),
        );
        credentials.production_enabled = self.production_enabled.unwrap_or(false);
        credentials.solution_id = self
            .solution_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(code) = self.currency {
            credentials.currency = Currency::from_code(code.trim())
                .ok_or_else(|| invalid("currency", format!("unsupported currency '{}'", code.trim())))?;
        }
        if let Some(window) = self.duplicate_window {
            credentials.duplicate_window = window;
        }
        if let Some(secs) = self.timeout_secs {
            credentials.timeout = Duration::from_secs(secs);
        }

        credentials.validate()?;
        Ok(credentials)
    }
}

/// Lenient boolean parsing for operator-entered flags
pub fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(invalid(key, format!("expected a boolean, got '{}'", other))),
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(key, format!("expected a number, got '{}'", value.trim())))
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        message,
    }
}
