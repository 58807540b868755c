//! Inbound `createTransactionResponse` payload and its classification

use serde::{Deserialize, Deserializer};
use std::fmt;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// ============================================================================
// Wire types
// ============================================================================

/// The gateway's reply, as received
///
/// Every field is optional: the classifier decides what a missing section
/// means instead of the decoder rejecting the reply.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    #[serde(default)]
    pub ref_id: Option<String>,
    #[serde(default)]
    pub messages: Option<ResultMessages>,
    #[serde(default)]
    pub transaction_response: Option<TransactionResult>,
}

/// Overall result of the API call
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultMessages {
    /// `Ok` or `Error`
    #[serde(default)]
    pub result_code: Option<String>,
    #[serde(default)]
    pub message: Vec<ResultMessage>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ResultMessage {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub text: String,
}

/// The transaction section of the reply
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    #[serde(default, deserialize_with = "string_or_number")]
    pub response_code: Option<String>,
    #[serde(default, rename = "transId", deserialize_with = "string_or_number")]
    pub trans_id: Option<String>,
    #[serde(default)]
    pub auth_code: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<TransactionMessage>>,
    #[serde(default)]
    pub errors: Option<Vec<TransactionError>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TransactionMessage {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionError {
    #[serde(default)]
    pub error_code: String,
    #[serde(default)]
    pub error_text: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(s) => s,
        Scalar::Integer(n) => n.to_string(),
    }))
}

impl TransactionResponse {
    /// Decode a reply body, skipping the byte order mark the gateway prepends
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body.strip_prefix(UTF8_BOM).unwrap_or(body))
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Transaction response codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Approved,
    Declined,
    Error,
    HeldForReview,
}

impl ResponseCode {
    /// Parse the gateway's numeric code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::Approved),
            "2" => Some(Self::Declined),
            "3" => Some(Self::Error),
            "4" => Some(Self::HeldForReview),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::Declined => write!(f, "declined"),
            Self::Error => write!(f, "error"),
            Self::HeldForReview => write!(f, "held for review"),
        }
    }
}

/// Informational message (code + text)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayMessage {
    pub code: String,
    pub text: String,
}

impl From<TransactionMessage> for GatewayMessage {
    fn from(m: TransactionMessage) -> Self {
        Self {
            code: m.code,
            text: m.description,
        }
    }
}

impl From<ResultMessage> for GatewayMessage {
    fn from(m: ResultMessage) -> Self {
        Self {
            code: m.code,
            text: m.text,
        }
    }
}

/// Error reported for a transaction (code + text)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayErrorDetail {
    pub code: String,
    pub text: String,
}

impl From<TransactionError> for GatewayErrorDetail {
    fn from(e: TransactionError) -> Self {
        Self {
            code: e.error_code,
            text: e.error_text,
        }
    }
}

/// Why a reply could not be classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// No transaction section at all
    MissingTransactionResponse,
    /// Transaction section without a response code
    MissingResponseCode,
    /// The response code requires messages but none were sent
    MissingMessages(ResponseCode),
    /// The response code requires errors but none were sent
    MissingErrors(ResponseCode),
    /// A response code this provider does not handle
    UnknownResponseCode(String),
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTransactionResponse => write!(f, "no transaction response"),
            Self::MissingResponseCode => write!(f, "transaction response has no response code"),
            Self::MissingMessages(code) => write!(f, "{} response without messages", code),
            Self::MissingErrors(code) => write!(f, "{} response without errors", code),
            Self::UnknownResponseCode(code) => write!(f, "unknown response code '{}'", code),
        }
    }
}

/// Classified gateway reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResponse {
    /// The charge went through
    Approved {
        transaction_id: Option<String>,
        messages: Vec<GatewayMessage>,
    },
    /// The issuer refused the card
    Declined {
        transaction_id: Option<String>,
        errors: Vec<GatewayErrorDetail>,
    },
    /// The gateway could not process the transaction
    Error {
        transaction_id: Option<String>,
        errors: Vec<GatewayErrorDetail>,
    },
    /// Flagged by fraud filters; settles or voids later
    HeldForReview {
        transaction_id: Option<String>,
        messages: Vec<GatewayMessage>,
    },
    /// A reply arrived but could not be classified
    Malformed {
        transaction_id: Option<String>,
        reason: MalformedReason,
        /// Top-level result messages, if any
        messages: Vec<GatewayMessage>,
    },
    /// No reply at all
    ConnectivityFailure,
}

fn non_empty<T>(list: Option<Vec<T>>) -> Option<Vec<T>> {
    list.filter(|l| !l.is_empty())
}

impl GatewayResponse {
    /// Classify a reply; `None` means the gateway could not be reached
    pub fn from_reply(reply: Option<TransactionResponse>) -> Self {
        let Some(reply) = reply else {
            return Self::ConnectivityFailure;
        };

        let result_messages: Vec<GatewayMessage> = reply
            .messages
            .map(|m| m.message.into_iter().map(Into::into).collect())
            .unwrap_or_default();

        let Some(txn) = reply.transaction_response else {
            return Self::Malformed {
                transaction_id: None,
                reason: MalformedReason::MissingTransactionResponse,
                messages: result_messages,
            };
        };

        let transaction_id = txn.trans_id.filter(|id| !id.trim().is_empty());

        let malformed = |transaction_id, reason| Self::Malformed {
            transaction_id,
            reason,
            messages: result_messages,
        };

        let Some(code) = txn.response_code else {
            return malformed(transaction_id, MalformedReason::MissingResponseCode);
        };

        let messages = non_empty(txn.messages).map(|m| m.into_iter().map(Into::into).collect());
        let errors = non_empty(txn.errors).map(|e| e.into_iter().map(Into::into).collect());

        match ResponseCode::from_code(&code) {
            Some(ResponseCode::Approved) => match messages {
                Some(messages) => Self::Approved {
                    transaction_id,
                    messages,
                },
                None => malformed(transaction_id, MalformedReason::MissingMessages(ResponseCode::Approved)),
            },
            Some(ResponseCode::Declined) => match errors {
                Some(errors) => Self::Declined {
                    transaction_id,
                    errors,
                },
                None => malformed(transaction_id, MalformedReason::MissingErrors(ResponseCode::Declined)),
            },
            Some(ResponseCode::Error) => match errors {
                Some(errors) => Self::Error {
                    transaction_id,
                    errors,
                },
                None => malformed(transaction_id, MalformedReason::MissingErrors(ResponseCode::Error)),
            },
            Some(ResponseCode::HeldForReview) => match messages {
                Some(messages) => Self::HeldForReview {
                    transaction_id,
                    messages,
                },
                None => malformed(
                    transaction_id,
                    MalformedReason::MissingMessages(ResponseCode::HeldForReview),
                ),
            },
            None => malformed(transaction_id, MalformedReason::UnknownResponseCode(code)),
        }
    }

    /// Gateway transaction id, when one was assigned
    pub fn transaction_id(&self) -> Option<&str> {
        match self {
            Self::Approved { transaction_id, .. }
            | Self::Declined { transaction_id, .. }
            | Self::Error { transaction_id, .. }
            | Self::HeldForReview { transaction_id, .. }
            | Self::Malformed { transaction_id, .. } => transaction_id.as_deref(),
            Self::ConnectivityFailure => None,
        }
    }

    /// Whether this outcome must abort the checkout step
    ///
    /// A reply without a transaction section is survivable only when the
    /// gateway explained itself through result messages.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::ConnectivityFailure | Self::Error { .. } => true,
            Self::Approved { .. } | Self::Declined { .. } | Self::HeldForReview { .. } => false,
            Self::Malformed { reason, messages, .. } => match reason {
                MalformedReason::MissingTransactionResponse | MalformedReason::MissingResponseCode => {
                    messages.is_empty()
                }
                _ => true,
            },
        }
    }
}
