//! Error types for Authorize.net payment processing

use thiserror::Error;

/// Payment error types
///
/// Only [`PaymentError::Validation`] and [`PaymentError::InvalidAmount`] are
/// raised before the gateway is contacted. The gateway-facing variants are
/// raised after the payment record has already been marked failed and the
/// failure has been logged on the order.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// The gateway could not be contacted, or its reply could not be read
    #[error("Could not contact payment gateway: {0}")]
    GatewayUnreachable(String),

    /// A reply arrived but lacked the structure needed to classify it
    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),

    /// The gateway reported a processing error (distinct from a decline)
    #[error("Transaction error: {0}")]
    TransactionError(String),

    /// Checkout data failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The host framework rejected a state transition
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        PaymentError::Serialization(err.to_string())
    }
}

impl PaymentError {
    /// Short message that is safe to show to the buyer
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::GatewayUnreachable(_) => "Could not contact the payment gateway, please try again later.",
            Self::MalformedResponse(_) => "API request error, please try again later.",
            Self::TransactionError(_) => {
                "There was an error processing your payment. Please try again or contact the event organizer."
            }
            Self::Validation(_) => "Please check your payment details and try again.",
            Self::InvalidAmount(_) | Self::Host(_) | Self::Config(_) | Self::Serialization(_) => {
                "Your payment could not be processed. Please contact the event organizer."
            }
        }
    }

    /// Whether the checkout step must be aborted
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }
}

/// Result type for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

/// Transport-level gateway failures
///
/// Every variant is treated as "no response" by the classifier.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Non-success HTTP status
    #[error("Unexpected HTTP status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// Body could not be decoded
    #[error("Could not decode gateway response: {0}")]
    Decode(String),

    /// Invalid endpoint URL
    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required setting is missing
    #[error("Missing setting: {0}")]
    Missing(String),

    /// Setting has an invalid value
    #[error("Invalid value for {key}: {message}")]
    Invalid {
        /// Setting name
        key: String,
        /// What is wrong with it
        message: String,
    },

    /// Settings source could not be read
    #[error("Failed to load configuration: {0}")]
    Load(String),

    /// Settings source could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Errors reported by the host framework's payment record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The payment is not in a state that allows the transition
    #[error("Invalid payment state: {0}")]
    InvalidState(String),

    /// The order can no longer be paid (quota exhausted, expired, ...)
    #[error("Order cannot be confirmed: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_detail() {
        let err = PaymentError::GatewayUnreachable("connection refused on 10.0.0.1:443".into());
        assert!(!err.user_message().contains("10.0.0.1"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_user_message_hides_parser_and_config_detail() {
        let errors = [
            PaymentError::MalformedResponse("expected value at line 1 column 1".into()),
            PaymentError::Config(ConfigError::Invalid {
                key: "http_client".into(),
                message: "builder error for https://api.authorize.net".into(),
            }),
        ];
        for err in errors {
            assert!(!err.user_message().contains("line 1"));
            assert!(!err.user_message().contains("https://"));
        }
    }

    #[test]
    fn test_validation_is_not_fatal() {
        assert!(!PaymentError::Validation("zip".into()).is_fatal());
        assert!(PaymentError::TransactionError("E00027".into()).is_fatal());
        assert!(PaymentError::GatewayUnreachable("timeout".into()).is_fatal());
    }

    #[test]
    fn test_host_error_conversion() {
        let err: PaymentError = HostError::InvalidState("already confirmed".into()).into();
        assert!(matches!(err, PaymentError::Host(_)));
    }
}
