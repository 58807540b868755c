//! Checkout data collection
//!
//! The host framework renders the fields declared here, stores what the
//! buyer typed in the checkout session and asks the provider whether the
//! session is valid before the order is placed. This module turns that
//! loosely typed session data into a [`StagedPaymentInput`], which is the
//! only thing the transaction submitter reads.

use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Prefix the host framework puts in front of provider session keys
pub const SESSION_PREFIX: &str = "payment_authorizenet_";

static CARD_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{15,19}$").unwrap());

static CARD_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3,4}$").unwrap());

static EXPIRATION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{2})/(\d{2})$").unwrap());

/// States offered in the billing address choice
pub const US_STATES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM",
    "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

// Gateway field limits
const MAX_NAME_LEN: usize = 50;
const MAX_ADDRESS_LEN: usize = 60;
const MAX_CITY_LEN: usize = 40;
const MAX_ZIP_LEN: usize = 20;

/// Session field names
pub mod fields {
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const ADDRESS: &str = "address";
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";
    pub const ZIP: &str = "zip";
    pub const CARD_NUMBER: &str = "cardNumber";
    pub const CARD_EXPIRATION: &str = "cardExpiration";
    pub const CARD_CODE: &str = "cardCode";
}

// ============================================================================
// Form field descriptors
// ============================================================================

/// Kind of input the host should render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    /// Text whose value must never be echoed back
    Secret,
    Integer,
    Boolean,
    Choice,
}

/// Declarative description of a form field
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub pattern: Option<&'static str>,
    pub placeholder: Option<&'static str>,
    pub help_text: Option<&'static str>,
    pub choices: Vec<&'static str>,
}

impl FormField {
    fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
            pattern: None,
            placeholder: None,
            help_text: None,
            choices: Vec::new(),
        }
    }

    fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    fn pattern(mut self, pattern: &'static str) -> Self {
        self.pattern = Some(pattern);
        self
    }

    fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    fn help_text(mut self, help_text: &'static str) -> Self {
        self.help_text = Some(help_text);
        self
    }

    fn choices(mut self, choices: &[&'static str]) -> Self {
        self.choices = choices.to_vec();
        self
    }
}

/// Fields the buyer fills in during checkout
pub fn payment_form_fields() -> Vec<FormField> {
    vec![
        FormField::new(fields::FIRST_NAME, "First Name", FieldKind::Text),
        FormField::new(fields::LAST_NAME, "Last Name", FieldKind::Text),
        FormField::new(fields::ADDRESS, "Street Address", FieldKind::Text),
        FormField::new(fields::CITY, "City", FieldKind::Text),
        FormField::new(fields::STATE, "State", FieldKind::Choice).choices(&US_STATES),
        FormField::new(fields::ZIP, "Zipcode", FieldKind::Integer),
        FormField::new(fields::CARD_NUMBER, "Card Number", FieldKind::Secret)
            .pattern(r"^\d{15,19}$")
            .placeholder("Card Number, No Spaces"),
        FormField::new(fields::CARD_EXPIRATION, "Card Expiration Date", FieldKind::Text)
            .pattern(r"^\d{2}/\d{2}$")
            .placeholder("mm/yy")
            .help_text("Please use format MM/YY"),
        FormField::new(fields::CARD_CODE, "Card Code", FieldKind::Secret)
            .pattern(r"^\d{3,4}$")
            .placeholder("Code on Back of Card"),
    ]
}

/// Fields the site operator configures
pub fn settings_form_fields() -> Vec<FormField> {
    vec![
        FormField::new("productionEnabled", "Enable Production API", FieldKind::Boolean).optional(),
        FormField::new("apiLoginID", "API Login ID", FieldKind::Secret),
        FormField::new("transactionKey", "Transaction Key", FieldKind::Secret),
        FormField::new("purchaseDescription", "Purchase Description", FieldKind::Text)
            .placeholder("Appears on bank statements"),
        FormField::new("solutionID", "Solution ID", FieldKind::Text).optional(),
    ]
}

// ============================================================================
// Validation errors
// ============================================================================

/// Validation error for a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field name that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Validation constraint that failed
    pub constraint: &'static str,
}

impl ValidationError {
    fn new(field: &str, constraint: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            constraint,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collection of validation errors
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether a field failed
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.errors.iter().map(|e| e.field.as_str()).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for crate::PaymentError {
    fn from(errors: ValidationErrors) -> Self {
        crate::PaymentError::Validation(errors.to_string())
    }
}

// ============================================================================
// Session
// ============================================================================

/// Checkout session data for this provider
///
/// Keys are stored with [`SESSION_PREFIX`], the same way the host keeps
/// them. Values are JSON because the host's form layer hands integer fields
/// over as numbers.
#[derive(Debug, Clone, Default)]
pub struct CheckoutSession {
    values: HashMap<String, Value>,
}

impl CheckoutSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session from submitted form values keyed by field name
    pub fn from_form<I, K>(form: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut session = Self::new();
        for (field, value) in form {
            session.set(field.as_ref(), value);
        }
        session
    }

    /// Store a field value
    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.values.insert(session_key(field), value.into());
    }

    /// Read a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(&session_key(field))
    }

    /// Remove a field value
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.values.remove(&session_key(field))
    }

    /// Drop card data once it has been submitted
    pub fn clear_card_data(&mut self) {
        for field in [fields::CARD_NUMBER, fields::CARD_EXPIRATION, fields::CARD_CODE] {
            self.remove(field);
        }
    }

    /// Raw session keys, prefixed
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Coerce numeric `zip` and `cardCode` values to text
    ///
    /// Numeric form fields lose leading zeros, so zip codes are padded back
    /// to five digits and card codes to three.
    pub fn normalize(&mut self) {
        self.normalize_numeric(fields::ZIP, 5);
        self.normalize_numeric(fields::CARD_CODE, 3);
    }

    fn normalize_numeric(&mut self, field: &str, width: usize) {
        let text = match self.get(field) {
            Some(Value::Number(number)) => match number.as_u64() {
                Some(n) => format!("{:0>width$}", n, width = width),
                None => number.to_string(),
            },
            _ => return,
        };
        self.set(field, Value::String(text));
    }

    /// Text value of a field, trimmed; `None` when missing or blank
    fn text(&self, field: &str) -> Result<Option<String>, ValidationError> {
        match self.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(ValidationError::new(field, "type", format!("{} must be text", field))),
        }
    }
}

fn session_key(field: &str) -> String {
    format!("{}{}", SESSION_PREFIX, field)
}

// ============================================================================
// Staged input
// ============================================================================

/// Card expiration month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CardExpiration {
    /// Four-digit year
    pub year: i32,
    /// Month, 1-12
    pub month: u32,
}

impl CardExpiration {
    /// Parse `MM/YY`
    pub fn parse(value: &str) -> Option<Self> {
        let caps = EXPIRATION_REGEX.captures(value.trim())?;
        let month: u32 = caps[1].parse().ok()?;
        let year: i32 = caps[2].parse().ok()?;
        (1..=12)
            .contains(&month)
            .then_some(Self { year: 2000 + year, month })
    }

    /// Whether the card is past its last valid month
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        (self.year, self.month) < (today.year(), today.month())
    }

    /// `MM/YY`, as sent to the gateway
    pub fn to_gateway_format(&self) -> String {
        format!("{:02}/{:02}", self.month, self.year % 100)
    }
}

/// Buyer-entered checkout data, validated and ready for submission
#[derive(Debug)]
pub struct StagedPaymentInput {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub card_number: SecretString,
    pub expiration: CardExpiration,
    pub card_code: SecretString,
}

impl StagedPaymentInput {
    /// Validate and stage session data against today's date
    pub fn from_session(session: &CheckoutSession) -> Result<Self, ValidationErrors> {
        Self::from_session_on(session, Utc::now().date_naive())
    }

    /// Validate and stage session data against a given date
    pub fn from_session_on(session: &CheckoutSession, today: NaiveDate) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let mut text = |field: &str, max_len: Option<usize>| -> String {
            match session.text(field) {
                Ok(Some(value)) => {
                    if let Some(max) = max_len
                        && value.chars().count() > max
                    {
                        errors.push(ValidationError::new(
                            field,
                            "maxLength",
                            format!("{} must be at most {} characters", field, max),
                        ));
                    }
                    value
                }
                Ok(None) => {
                    errors.push(ValidationError::new(
                        field,
                        "required",
                        format!("{} is required", field),
                    ));
                    String::new()
                }
                Err(e) => {
                    errors.push(e);
                    String::new()
                }
            }
        };

        let first_name = text(fields::FIRST_NAME, Some(MAX_NAME_LEN));
        let last_name = text(fields::LAST_NAME, Some(MAX_NAME_LEN));
        let address = text(fields::ADDRESS, Some(MAX_ADDRESS_LEN));
        let city = text(fields::CITY, Some(MAX_CITY_LEN));
        let state = text(fields::STATE, None);
        let zip = text(fields::ZIP, Some(MAX_ZIP_LEN));
        let card_number = text(fields::CARD_NUMBER, None);
        let expiration = text(fields::CARD_EXPIRATION, None);
        let card_code = text(fields::CARD_CODE, None);

        if !state.is_empty() && !US_STATES.contains(&state.as_str()) {
            errors.push(ValidationError::new(
                fields::STATE,
                "choice",
                "state must be a US state code",
            ));
        }

        if !card_number.is_empty() && !CARD_NUMBER_REGEX.is_match(&card_number) {
            errors.push(ValidationError::new(
                fields::CARD_NUMBER,
                "pattern",
                "card number must be 15 to 19 digits without spaces",
            ));
        }

        if !card_code.is_empty() && !CARD_CODE_REGEX.is_match(&card_code) {
            errors.push(ValidationError::new(
                fields::CARD_CODE,
                "pattern",
                "card code must be 3 or 4 digits",
            ));
        }

        let parsed_expiration = if expiration.is_empty() {
            None
        } else {
            match CardExpiration::parse(&expiration) {
                Some(exp) if exp.is_expired_on(today) => {
                    errors.push(ValidationError::new(
                        fields::CARD_EXPIRATION,
                        "expired",
                        "card has expired",
                    ));
                    None
                }
                Some(exp) => Some(exp),
                None => {
                    errors.push(ValidationError::new(
                        fields::CARD_EXPIRATION,
                        "format",
                        "expiration date must use the format MM/YY",
                    ));
                    None
                }
            }
        };

        match parsed_expiration {
            Some(expiration) if errors.is_empty() => Ok(Self {
                first_name,
                last_name,
                address,
                city,
                state,
                zip,
                card_number: SecretString::new(card_number.into()),
                expiration,
                card_code: SecretString::new(card_code.into()),
            }),
            _ => Err(errors),
        }
    }

    /// Card number with all but the last four digits hidden
    pub fn masked_card_number(&self) -> String {
        let number = self.card_number.expose_secret();
        let last4 = &number[number.len().saturating_sub(4)..];
        format!("XXXX{}", last4)
    }

    /// Buyer's full name
    pub fn cardholder_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Normalize the session, then report whether it can be staged
pub fn is_valid_session(session: &mut CheckoutSession) -> bool {
    session.normalize();
    StagedPaymentInput::from_session(session).is_ok()
}
