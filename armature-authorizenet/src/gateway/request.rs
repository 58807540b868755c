//! Outbound `createTransactionRequest` payload
//!
//! Authorize.net's JSON API is a direct translation of its XML schema and
//! rejects elements that arrive out of schema order, so the struct field
//! order below is significant.

use crate::{
    checkout::StagedPaymentInput,
    config::MerchantCredentials,
    error::{PaymentError, PaymentResult},
    money::Money,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use tracing::warn;

/// Longest invoice number the gateway accepts
pub const MAX_INVOICE_NUMBER_LEN: usize = 20;

/// Longest reference id the gateway accepts
pub const MAX_REF_ID_LEN: usize = 20;

const MAX_DESCRIPTION_LEN: usize = 255;

/// Identifies the order and payment a charge belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReference {
    /// Order code, used as the invoice number
    pub code: String,
    /// Internal payment id, used as the request reference id
    pub payment_id: String,
}

impl OrderReference {
    /// Create an order reference
    pub fn new(code: impl Into<String>, payment_id: impl ToString) -> Self {
        Self {
            code: code.into(),
            payment_id: payment_id.to_string(),
        }
    }
}

/// Transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionType {
    /// Authorize and capture in one step
    #[serde(rename = "authCaptureTransaction")]
    AuthCapture,
}

/// A complete charge request, ready to be posted
#[derive(Debug, Serialize)]
pub struct TransactionRequest {
    #[serde(rename = "createTransactionRequest")]
    body: CreateTransaction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTransaction {
    merchant_authentication: MerchantAuthentication,
    ref_id: String,
    transaction_request: TransactionDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MerchantAuthentication {
    #[serde(serialize_with = "expose")]
    name: SecretString,
    #[serde(serialize_with = "expose")]
    transaction_key: SecretString,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionDetails {
    transaction_type: TransactionType,
    amount: String,
    payment: PaymentDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<Solution>,
    order: Order,
    bill_to: BillTo,
    transaction_settings: TransactionSettings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentDetails {
    credit_card: CreditCard,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreditCard {
    #[serde(serialize_with = "expose")]
    card_number: SecretString,
    expiration_date: String,
    #[serde(serialize_with = "expose")]
    card_code: SecretString,
}

#[derive(Debug, Serialize)]
struct Solution {
    id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Order {
    invoice_number: String,
    description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BillTo {
    first_name: String,
    last_name: String,
    address: String,
    city: String,
    state: String,
    zip: String,
}

#[derive(Debug, Serialize)]
struct TransactionSettings {
    setting: Vec<Setting>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Setting {
    setting_name: String,
    setting_value: String,
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::new(secret.expose_secret().into())
}

/// Truncate to at most `max` characters
fn truncate(value: &str, max: usize) -> (String, bool) {
    match value.char_indices().nth(max) {
        Some((idx, _)) => (value[..idx].to_string(), true),
        None => (value.to_string(), false),
    }
}

impl TransactionRequest {
    /// Build the charge request for one checkout attempt
    pub fn build(
        input: &StagedPaymentInput,
        credentials: &MerchantCredentials,
        order: &OrderReference,
        amount: Money,
    ) -> PaymentResult<Self> {
        if !amount.is_positive() {
            return Err(PaymentError::InvalidAmount(format!(
                "charge amount must be positive, got {}",
                amount
            )));
        }
        if amount.currency != credentials.currency {
            return Err(PaymentError::InvalidAmount(format!(
                "merchant account settles in {}, cannot charge {}",
                credentials.currency, amount
            )));
        }
        if order.code.trim().is_empty() {
            return Err(PaymentError::Validation("order code is empty".into()));
        }

        let (invoice_number, truncated) = truncate(order.code.trim(), MAX_INVOICE_NUMBER_LEN);
        if truncated {
            warn!(
                order = %order.code,
                invoice_number = %invoice_number,
                "Order code exceeds invoice number limit, truncating"
            );
        }

        let (ref_id, truncated) = truncate(&order.payment_id, MAX_REF_ID_LEN);
        if truncated {
            warn!(payment_id = %order.payment_id, "Payment id exceeds reference id limit, truncating");
        }

        let (description, _) = truncate(&credentials.purchase_description, MAX_DESCRIPTION_LEN);

        Ok(Self {
            body: CreateTransaction {
                merchant_authentication: MerchantAuthentication {
                    name: copy_secret(&credentials.api_login_id),
                    transaction_key: copy_secret(&credentials.transaction_key),
                },
                ref_id,
                transaction_request: TransactionDetails {
                    transaction_type: TransactionType::AuthCapture,
                    amount: amount.gateway_amount(),
                    payment: PaymentDetails {
                        credit_card: CreditCard {
                            card_number: copy_secret(&input.card_number),
                            expiration_date: input.expiration.to_gateway_format(),
                            card_code: copy_secret(&input.card_code),
                        },
                    },
                    solution: credentials.solution_id.clone().map(|id| Solution { id }),
                    order: Order {
                        invoice_number,
                        description,
                    },
                    bill_to: BillTo {
                        first_name: input.first_name.clone(),
                        last_name: input.last_name.clone(),
                        address: input.address.clone(),
                        city: input.city.clone(),
                        state: input.state.clone(),
                        zip: input.zip.clone(),
                    },
                    transaction_settings: TransactionSettings {
                        setting: vec![Setting {
                            setting_name: "duplicateWindow".to_string(),
                            setting_value: credentials.duplicate_window.to_string(),
                        }],
                    },
                },
            },
        })
    }

    /// Reference id echoed back by the gateway
    pub fn ref_id(&self) -> &str {
        &self.body.ref_id
    }

    /// Invoice number sent with the order
    pub fn invoice_number(&self) -> &str {
        &self.body.transaction_request.order.invoice_number
    }

    /// Amount as sent
    pub fn amount(&self) -> &str {
        &self.body.transaction_request.amount
    }

    /// Transaction type
    pub fn transaction_type(&self) -> TransactionType {
        self.body.transaction_request.transaction_type
    }

    /// Duplicate window in seconds, if set
    pub fn duplicate_window(&self) -> Option<u32> {
        self.body
            .transaction_request
            .transaction_settings
            .setting
            .iter()
            .find(|s| s.setting_name == "duplicateWindow")
            .and_then(|s| s.setting_value.parse().ok())
    }

    /// Serialize to the JSON wire format
    pub fn to_json(&self) -> PaymentResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{fields, CheckoutSession};
    use crate::money::Currency;
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    fn staged() -> StagedPaymentInput {
        let session = CheckoutSession::from_form([
            (fields::FIRST_NAME, json!("Ellen")),
            (fields::LAST_NAME, json!("Johnson")),
            (fields::ADDRESS, json!("14 Main Street")),
            (fields::CITY, json!("Pecan Springs")),
            (fields::STATE, json!("TX")),
            (fields::ZIP, json!("44628")),
            (fields::CARD_NUMBER, json!("4111111111111111")),
            (fields::CARD_EXPIRATION, json!("12/28")),
            (fields::CARD_CODE, json!("123")),
        ]);
        StagedPaymentInput::from_session_on(&session, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
            .unwrap()
    }

    fn credentials() -> MerchantCredentials {
        MerchantCredentials::new("5KP3u95bQpv", "346HZ32z3fP4hTG2", "Summer Fest tickets")
    }

    #[test]
    fn test_wire_shape() {
        let request = TransactionRequest::build(
            &staged(),
            &credentials(),
            &OrderReference::new("Q7XJ9", 42),
            Money::usd(2500),
        )
        .unwrap();

        let value: Value = serde_json::from_slice(&request.to_json().unwrap()).unwrap();
        let body = &value["createTransactionRequest"];
        assert_eq!(body["merchantAuthentication"]["name"], "5KP3u95bQpv");
        assert_eq!(body["merchantAuthentication"]["transactionKey"], "346HZ32z3fP4hTG2");
        assert_eq!(body["refId"], "42");

        let txn = &body["transactionRequest"];
        assert_eq!(txn["transactionType"], "authCaptureTransaction");
        assert_eq!(txn["amount"], "25.00");
        assert_eq!(txn["payment"]["creditCard"]["cardNumber"], "4111111111111111");
        assert_eq!(txn["payment"]["creditCard"]["expirationDate"], "12/28");
        assert_eq!(txn["payment"]["creditCard"]["cardCode"], "123");
        assert_eq!(txn["order"]["invoiceNumber"], "Q7XJ9");
        assert_eq!(txn["order"]["description"], "Summer Fest tickets");
        assert_eq!(txn["billTo"]["zip"], "44628");
        assert_eq!(
            txn["transactionSettings"]["setting"][0],
            json!({"settingName": "duplicateWindow", "settingValue": "600"})
        );
        assert!(txn.get("solution").is_none());
    }

    #[test]
    fn test_field_order() {
        let request = TransactionRequest::build(
            &staged(),
            &credentials().with_solution_id("AAA100302"),
            &OrderReference::new("Q7XJ9", 42),
            Money::usd(2500),
        )
        .unwrap();
        let json = String::from_utf8(request.to_json().unwrap()).unwrap();

        let order = [
            "\"merchantAuthentication\"",
            "\"refId\"",
            "\"transactionRequest\"",
            "\"transactionType\"",
            "\"amount\"",
            "\"payment\"",
            "\"solution\"",
            "\"order\"",
            "\"billTo\"",
            "\"transactionSettings\"",
        ];
        let positions: Vec<usize> = order.iter().map(|key| json.find(key).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_invoice_number_truncated() {
        let request = TransactionRequest::build(
            &staged(),
            &credentials(),
            &OrderReference::new("ORDER-CODE-THAT-IS-FAR-TOO-LONG", "123456789012345678901234"),
            Money::usd(100),
        )
        .unwrap();

        assert_eq!(request.invoice_number().chars().count(), MAX_INVOICE_NUMBER_LEN);
        assert_eq!(request.invoice_number(), "ORDER-CODE-THAT-IS-F");
        assert_eq!(request.ref_id(), "12345678901234567890");
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let result = TransactionRequest::build(
            &staged(),
            &credentials(),
            &OrderReference::new("Q7XJ9", 1),
            Money::usd(0),
        );
        assert!(matches!(result, Err(PaymentError::InvalidAmount(_))));
    }

    #[test]
    fn test_rejects_foreign_currency() {
        let result = TransactionRequest::build(
            &staged(),
            &credentials(),
            &OrderReference::new("Q7XJ9", 1),
            Money::new(2500, Currency::EUR),
        );
        assert!(matches!(result, Err(PaymentError::InvalidAmount(ref m)) if m.contains("EUR")));
    }

    #[test]
    fn test_charges_in_account_currency() {
        let request = TransactionRequest::build(
            &staged(),
            &credentials().with_currency(Currency::CAD),
            &OrderReference::new("Q7XJ9", 1),
            Money::new(2500, Currency::CAD),
        )
        .unwrap();
        assert_eq!(request.amount(), "25.00");

        let result = TransactionRequest::build(
            &staged(),
            &credentials().with_currency(Currency::CAD),
            &OrderReference::new("Q7XJ9", 1),
            Money::usd(2500),
        );
        assert!(matches!(result, Err(PaymentError::InvalidAmount(_))));
    }

    #[test]
    fn test_debug_redacts_card_data() {
        let request = TransactionRequest::build(
            &staged(),
            &credentials(),
            &OrderReference::new("Q7XJ9", 1),
            Money::usd(2500),
        )
        .unwrap();
        let debug = format!("{:?}", request);
        assert!(!debug.contains("4111111111111111"));
        assert!(!debug.contains("346HZ32z3fP4hTG2"));
        assert_eq!(request.duplicate_window(), Some(600));
        assert_eq!(request.amount(), "25.00");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("ÄÖÜ", 2), ("ÄÖ".to_string(), true));
        assert_eq!(truncate("abc", 3), ("abc".to_string(), false));
    }
}
