//! Transaction submission and response handling
//!
//! One checkout attempt builds exactly one request, makes exactly one
//! gateway call and maps the classified reply onto the host's payment record:
//!
//! | reply                 | payment     | result                          |
//! |-----------------------|-------------|---------------------------------|
//! | no reply              | failed      | `Err(GatewayUnreachable)`       |
//! | malformed             | failed      | `Ok(Failed)` or `Err(Malformed)`|
//! | approved              | confirmed   | `Ok(Confirmed)`                 |
//! | declined              | failed      | `Ok(Declined)`                  |
//! | error                 | failed      | `Err(TransactionError)`         |
//! | held for review       | unchanged   | `Ok(HeldForReview)`             |
//!
//! Every branch writes at least one entry to the order log, tagged with the
//! gateway transaction id (`0` when none was assigned).

use crate::{
    checkout::{self, CheckoutSession, FormField, StagedPaymentInput},
    config::MerchantCredentials,
    error::{ConfigError, GatewayError, PaymentError, PaymentResult},
    gateway::{
        GatewayErrorDetail, GatewayMessage, GatewayResponse, HttpGateway, OrderReference,
        TransactionGateway, TransactionRequest, TransactionResponse,
    },
    host::{MessageLevel, MessageSink, PaymentProvider, PaymentRecord},
    money::Money,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

/// Order log action names
pub mod actions {
    pub const APPROVED: &str = "authorizenet.payment.approved";
    pub const DECLINE: &str = "authorizenet.payment.decline";
    pub const ERROR: &str = "authorizenet.payment.error";
    pub const MESSAGE: &str = "authorizenet.payment.message";
    pub const FAILURE: &str = "authorizenet.payment.failure";
    pub const FAIL: &str = "authorizenet.payment.fail";
}

const UNREACHABLE_INFO: &str = "could not contact gateway";
const NO_TRANSACTION_RESPONSE_INFO: &str = "API request failed. No Transaction Response";
const UNREACHABLE_MESSAGE: &str = "Could not contact the payment gateway, please try again later";
const API_ERROR_MESSAGE: &str = "API request error, please try again later";

/// Non-fatal result of a checkout attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Charged; the payment is confirmed
    Confirmed { transaction_id: Option<String> },
    /// The card was declined; the buyer may try again
    Declined {
        transaction_id: Option<String>,
        reason: String,
    },
    /// Under fraud review; the payment is left pending
    HeldForReview { transaction_id: Option<String> },
    /// The gateway refused the API request itself and said why
    Failed {
        transaction_id: Option<String>,
        reason: String,
    },
}

impl Outcome {
    /// Gateway transaction id, when one was assigned
    pub fn transaction_id(&self) -> Option<&str> {
        match self {
            Self::Confirmed { transaction_id }
            | Self::Declined { transaction_id, .. }
            | Self::HeldForReview { transaction_id }
            | Self::Failed { transaction_id, .. } => transaction_id.as_deref(),
        }
    }
}

/// Authorize.net payment provider
pub struct AuthorizeNetProvider<G: TransactionGateway = HttpGateway> {
    credentials: MerchantCredentials,
    gateway: G,
}

impl AuthorizeNetProvider<HttpGateway> {
    /// Create a provider talking to the real gateway
    pub fn from_credentials(credentials: MerchantCredentials) -> PaymentResult<Self> {
        credentials.validate()?;
        let gateway = HttpGateway::from_credentials(&credentials).map_err(|e| {
            PaymentError::Config(ConfigError::Invalid {
                key: "http_client".into(),
                message: e.to_string(),
            })
        })?;
        Ok(Self::new(credentials, gateway))
    }
}

impl<G: TransactionGateway> AuthorizeNetProvider<G> {
    /// Create a provider with a custom gateway
    pub fn new(credentials: MerchantCredentials, gateway: G) -> Self {
        Self {
            credentials,
            gateway,
        }
    }

    /// Merchant settings
    pub fn credentials(&self) -> &MerchantCredentials {
        &self.credentials
    }

    /// The gateway transport
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Charge a card once and record the result on the payment
    pub async fn submit<P, M>(
        &self,
        input: &StagedPaymentInput,
        order: &OrderReference,
        amount: Money,
        payment: &mut P,
        messages: &mut M,
    ) -> PaymentResult<Outcome>
    where
        P: PaymentRecord,
        M: MessageSink,
    {
        let request = TransactionRequest::build(input, &self.credentials, order, amount)?;
        let environment = self.credentials.environment();

        debug!(
            gateway = self.gateway.name(),
            environment = %environment,
            ref_id = request.ref_id(),
            invoice_number = request.invoice_number(),
            amount = %amount,
            card = %input.masked_card_number(),
            "Submitting card transaction"
        );

        let reply = self.gateway.submit(&request, environment).await;
        Self::record_reply(reply, payment, messages)
    }

    /// Classify a gateway call result and apply it to the payment
    pub fn record_reply<P, M>(
        reply: Result<TransactionResponse, GatewayError>,
        payment: &mut P,
        messages: &mut M,
    ) -> PaymentResult<Outcome>
    where
        P: PaymentRecord,
        M: MessageSink,
    {
        match reply {
            Ok(reply) => apply_response(GatewayResponse::from_reply(Some(reply)), payment, messages),
            Err(e) => {
                warn!(error = %e, "Gateway call failed");
                apply_unreachable(e.to_string(), payment, messages)
            }
        }
    }
}

/// Apply a classified reply to the payment record
pub fn apply_response<P, M>(
    response: GatewayResponse,
    payment: &mut P,
    messages: &mut M,
) -> PaymentResult<Outcome>
where
    P: PaymentRecord,
    M: MessageSink,
{
    let fatal = response.is_fatal();

    match response {
        GatewayResponse::ConnectivityFailure => {
            apply_unreachable("no response".into(), payment, messages)
        }

        GatewayResponse::Approved {
            transaction_id,
            messages: gateway_messages,
        } => {
            let trans_id = trans_id_value(transaction_id.as_deref());
            payment.set_info(json!({ "id": transaction_id }));
            log_messages(payment, actions::APPROVED, &trans_id, &gateway_messages);
            show_messages(messages, MessageLevel::Success, &gateway_messages);
            payment.confirm()?;
            info!(transaction_id = transaction_id.as_deref(), "Transaction approved");
            Ok(Outcome::Confirmed { transaction_id })
        }

        GatewayResponse::Declined {
            transaction_id,
            errors,
        } => {
            let trans_id = trans_id_value(transaction_id.as_deref());
            let reason = first_error_text(&errors);
            log_errors(payment, actions::DECLINE, &trans_id, &errors);
            show_errors(messages, &errors);
            payment.fail(json!({ "reason": reason, "transId": trans_id }));
            info!(transaction_id = transaction_id.as_deref(), reason = %reason, "Transaction declined");
            Ok(Outcome::Declined {
                transaction_id,
                reason,
            })
        }

        GatewayResponse::Error {
            transaction_id,
            errors,
        } => {
            let trans_id = trans_id_value(transaction_id.as_deref());
            let reason = first_error_text(&errors);
            log_errors(payment, actions::ERROR, &trans_id, &errors);
            show_errors(messages, &errors);
            payment.fail(json!({ "error": reason, "transId": trans_id }));
            error!(transaction_id = transaction_id.as_deref(), reason = %reason, "Transaction error");
            Err(PaymentError::TransactionError(reason))
        }

        GatewayResponse::HeldForReview {
            transaction_id,
            messages: gateway_messages,
        } => {
            let trans_id = trans_id_value(transaction_id.as_deref());
            log_messages(payment, actions::MESSAGE, &trans_id, &gateway_messages);
            show_messages(messages, MessageLevel::Info, &gateway_messages);
            warn!(
                transaction_id = transaction_id.as_deref(),
                "Transaction held for review, payment left pending"
            );
            Ok(Outcome::HeldForReview { transaction_id })
        }

        GatewayResponse::Malformed {
            transaction_id,
            reason,
            messages: result_messages,
        } => {
            let trans_id = trans_id_value(transaction_id.as_deref());
            payment.fail(json!({
                "error": NO_TRANSACTION_RESPONSE_INFO,
                "reason": reason.to_string(),
                "transId": trans_id,
            }));
            if result_messages.is_empty() {
                payment.log_action(
                    actions::FAILURE,
                    json!({ "transId": trans_id, "resultCode": Value::Null, "description": reason.to_string() }),
                );
            } else {
                log_messages(payment, actions::FAILURE, &trans_id, &result_messages);
            }
            messages.add_message(MessageLevel::Error, API_ERROR_MESSAGE.to_string());
            error!(transaction_id = transaction_id.as_deref(), reason = %reason, "Unusable gateway response");

            if fatal {
                Err(PaymentError::MalformedResponse(reason.to_string()))
            } else {
                let reason = result_messages
                    .first()
                    .map(|m| m.text.clone())
                    .unwrap_or_else(|| reason.to_string());
                Ok(Outcome::Failed {
                    transaction_id,
                    reason,
                })
            }
        }
    }
}

fn apply_unreachable<P, M>(detail: String, payment: &mut P, messages: &mut M) -> PaymentResult<Outcome>
where
    P: PaymentRecord,
    M: MessageSink,
{
    payment.log_action(actions::FAIL, json!({ "transId": 0, "error": UNREACHABLE_INFO }));
    payment.fail(json!({ "error": UNREACHABLE_INFO }));
    messages.add_message(MessageLevel::Error, UNREACHABLE_MESSAGE.to_string());
    error!(detail = %detail, "Could not contact payment gateway");
    Err(PaymentError::GatewayUnreachable(detail))
}

/// Transaction id as logged: numeric when possible, `0` when absent
fn trans_id_value(transaction_id: Option<&str>) -> Value {
    match transaction_id {
        Some(id) => id.parse::<u64>().map(Value::from).unwrap_or_else(|_| json!(id)),
        None => json!(0),
    }
}

fn first_error_text(errors: &[GatewayErrorDetail]) -> String {
    errors.first().map(|e| e.text.clone()).unwrap_or_default()
}

fn log_messages<P: PaymentRecord>(payment: &mut P, action: &str, trans_id: &Value, list: &[GatewayMessage]) {
    for message in list {
        payment.log_action(
            action,
            json!({ "transId": trans_id, "resultCode": message.code, "description": message.text }),
        );
    }
}

fn log_errors<P: PaymentRecord>(payment: &mut P, action: &str, trans_id: &Value, list: &[GatewayErrorDetail]) {
    for err in list {
        payment.log_action(
            action,
            json!({ "transId": trans_id, "errorCode": err.code, "errorText": err.text }),
        );
    }
}

fn show_messages<M: MessageSink>(sink: &mut M, level: MessageLevel, list: &[GatewayMessage]) {
    for message in list {
        sink.add_message(level, message.text.clone());
    }
}

fn show_errors<M: MessageSink>(sink: &mut M, list: &[GatewayErrorDetail]) {
    for err in list {
        sink.add_message(MessageLevel::Error, err.text.clone());
    }
}

#[async_trait]
impl<G: TransactionGateway> PaymentProvider for AuthorizeNetProvider<G> {
    fn identifier(&self) -> &'static str {
        "authorizenet"
    }

    fn verbose_name(&self) -> &'static str {
        "Authorize.net Payment"
    }

    fn public_name(&self) -> &'static str {
        "Credit Card Payment"
    }

    fn settings_form_fields(&self) -> Vec<FormField> {
        checkout::settings_form_fields()
    }

    fn payment_form_fields(&self) -> Vec<FormField> {
        checkout::payment_form_fields()
    }

    fn settings_content_render(&self) -> String {
        "Refunds are not supported through this plugin. Issue them manually in the Authorize.net \
         merchant interface."
            .to_string()
    }

    fn is_valid_session(&self, session: &mut CheckoutSession) -> bool {
        checkout::is_valid_session(session)
    }

    fn checkout_confirm_render(&self, session: &CheckoutSession) -> String {
        let notice = "Your credit card information is forwarded to our payment processor using \
                      industry standard encryption. It is not stored on our servers after the \
                      transaction is complete.";
        match StagedPaymentInput::from_session(session) {
            Ok(input) => format!("Card {}. {}", input.masked_card_number(), notice),
            Err(_) => notice.to_string(),
        }
    }

    fn refunds_supported(&self) -> bool {
        false
    }

    async fn execute_payment<P, M>(
        &self,
        session: &mut CheckoutSession,
        payment: &mut P,
        messages: &mut M,
    ) -> PaymentResult<()>
    where
        P: PaymentRecord,
        M: MessageSink,
    {
        session.normalize();
        let input = StagedPaymentInput::from_session(session)?;
        let order = OrderReference::new(payment.order_code(), payment.id());
        let amount = payment.amount();

        let result = self.submit(&input, &order, amount, payment, messages).await;
        session.clear_card_data();
        result.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;

    #[derive(Default)]
    struct Payment {
        info: Option<Value>,
        confirmed: u32,
        failed: Vec<Value>,
        log: Vec<(String, Value)>,
        reject_confirm: bool,
    }

    impl PaymentRecord for Payment {
        fn id(&self) -> String {
            "42".into()
        }

        fn amount(&self) -> Money {
            Money::usd(2500)
        }

        fn order_code(&self) -> String {
            "Q7XJ9".into()
        }

        fn set_info(&mut self, info: Value) {
            self.info = Some(info);
        }

        fn confirm(&mut self) -> Result<(), HostError> {
            if self.reject_confirm {
                return Err(HostError::Unavailable("quota exceeded".into()));
            }
            self.confirmed += 1;
            Ok(())
        }

        fn fail(&mut self, info: Value) {
            self.failed.push(info);
        }

        fn log_action(&mut self, action: &str, data: Value) {
            self.log.push((action.to_string(), data));
        }
    }

    #[derive(Default)]
    struct Messages(Vec<(MessageLevel, String)>);

    impl MessageSink for Messages {
        fn add_message(&mut self, level: MessageLevel, text: String) {
            self.0.push((level, text));
        }
    }

    fn msg(code: &str, text: &str) -> GatewayMessage {
        GatewayMessage {
            code: code.into(),
            text: text.into(),
        }
    }

    fn err(code: &str, text: &str) -> GatewayErrorDetail {
        GatewayErrorDetail {
            code: code.into(),
            text: text.into(),
        }
    }

    #[test]
    fn test_trans_id_value() {
        assert_eq!(trans_id_value(Some("60123456789")), json!(60123456789u64));
        assert_eq!(trans_id_value(Some("abc")), json!("abc"));
        assert_eq!(trans_id_value(None), json!(0));
    }

    #[test]
    fn test_approved_confirms_once() {
        let mut payment = Payment::default();
        let mut messages = Messages::default();

        let outcome = apply_response(
            GatewayResponse::Approved {
                transaction_id: Some("60123456789".into()),
                messages: vec![msg("1", "This transaction has been approved.")],
            },
            &mut payment,
            &mut messages,
        )
        .unwrap();

        assert_eq!(outcome.transaction_id(), Some("60123456789"));
        assert_eq!(payment.confirmed, 1);
        assert!(payment.failed.is_empty());
        assert_eq!(payment.info, Some(json!({"id": "60123456789"})));
        assert_eq!(payment.log[0].0, actions::APPROVED);
        assert_eq!(payment.log[0].1["transId"], json!(60123456789u64));
        assert_eq!(messages.0[0].0, MessageLevel::Success);
    }

    #[test]
    fn test_approved_but_host_rejects() {
        let mut payment = Payment {
            reject_confirm: true,
            ..Default::default()
        };
        let result = apply_response(
            GatewayResponse::Approved {
                transaction_id: Some("1".into()),
                messages: vec![msg("1", "ok")],
            },
            &mut payment,
            &mut Messages::default(),
        );
        assert!(matches!(result, Err(PaymentError::Host(_))));
        assert_eq!(payment.info, Some(json!({"id": "1"})));
    }

    #[test]
    fn test_declined_is_not_fatal() {
        let mut payment = Payment::default();
        let mut messages = Messages::default();

        let outcome = apply_response(
            GatewayResponse::Declined {
                transaction_id: Some("60123456790".into()),
                errors: vec![err("2", "Card was declined."), err("27", "AVS mismatch.")],
            },
            &mut payment,
            &mut messages,
        )
        .unwrap();

        assert!(matches!(outcome, Outcome::Declined { ref reason, .. } if reason == "Card was declined."));
        assert_eq!(payment.confirmed, 0);
        assert_eq!(
            payment.failed,
            vec![json!({"reason": "Card was declined.", "transId": 60123456790u64})]
        );
        assert_eq!(payment.log.len(), 2);
        assert!(payment.log.iter().all(|(action, _)| action == actions::DECLINE));
        assert_eq!(messages.0.len(), 2);
    }

    #[test]
    fn test_declined_without_transaction_id() {
        let mut payment = Payment::default();
        apply_response(
            GatewayResponse::Declined {
                transaction_id: None,
                errors: vec![err("2", "Card was declined.")],
            },
            &mut payment,
            &mut Messages::default(),
        )
        .unwrap();

        assert_eq!(payment.failed[0]["transId"], json!(0));
        assert_eq!(payment.log[0].1["transId"], json!(0));
    }

    #[test]
    fn test_error_is_fatal() {
        let mut payment = Payment::default();
        let result = apply_response(
            GatewayResponse::Error {
                transaction_id: Some("0".into()),
                errors: vec![err("6", "The credit card number is invalid.")],
            },
            &mut payment,
            &mut Messages::default(),
        );

        assert!(matches!(result, Err(PaymentError::TransactionError(ref t)) if t == "The credit card number is invalid."));
        assert_eq!(payment.failed.len(), 1);
        assert_eq!(payment.failed[0]["error"], "The credit card number is invalid.");
        assert_eq!(payment.failed[0]["transId"], json!(0));
        assert_eq!(payment.log[0].0, actions::ERROR);
    }

    #[test]
    fn test_held_for_review_leaves_payment() {
        let mut payment = Payment::default();
        let mut messages = Messages::default();
        let outcome = apply_response(
            GatewayResponse::HeldForReview {
                transaction_id: Some("60123456791".into()),
                messages: vec![msg("252", "Your order has been received.")],
            },
            &mut payment,
            &mut messages,
        )
        .unwrap();

        assert!(matches!(outcome, Outcome::HeldForReview { .. }));
        assert_eq!(payment.confirmed, 0);
        assert!(payment.failed.is_empty());
        assert!(payment.info.is_none());
        assert_eq!(payment.log[0].0, actions::MESSAGE);
        assert_eq!(messages.0[0], (MessageLevel::Info, "Your order has been received.".to_string()));
    }

    #[test]
    fn test_connectivity_failure() {
        let mut payment = Payment::default();
        let result = apply_response(GatewayResponse::ConnectivityFailure, &mut payment, &mut Messages::default());

        assert!(matches!(result, Err(PaymentError::GatewayUnreachable(_))));
        assert_eq!(payment.failed, vec![json!({"error": "could not contact gateway"})]);
        assert_eq!(payment.log[0].0, actions::FAIL);
        assert_eq!(payment.log[0].1["transId"], json!(0));
    }

    #[test]
    fn test_malformed_with_messages_is_not_fatal() {
        let mut payment = Payment::default();
        let mut messages = Messages::default();
        let outcome = apply_response(
            GatewayResponse::Malformed {
                transaction_id: None,
                reason: crate::gateway::MalformedReason::MissingTransactionResponse,
                messages: vec![msg("E00007", "User authentication failed.")],
            },
            &mut payment,
            &mut messages,
        )
        .unwrap();

        assert_eq!(
            outcome,
            Outcome::Failed {
                transaction_id: None,
                reason: "User authentication failed.".into()
            }
        );
        assert_eq!(payment.failed[0]["error"], NO_TRANSACTION_RESPONSE_INFO);
        assert_eq!(payment.log[0].0, actions::FAILURE);
        assert_eq!(payment.log[0].1["resultCode"], "E00007");
        assert_eq!(messages.0, vec![(MessageLevel::Error, API_ERROR_MESSAGE.to_string())]);
    }

    #[test]
    fn test_malformed_keeps_transaction_id() {
        let mut payment = Payment::default();
        let result = apply_response(
            GatewayResponse::Malformed {
                transaction_id: Some("60123456789".into()),
                reason: crate::gateway::MalformedReason::MissingMessages(crate::gateway::ResponseCode::Approved),
                messages: vec![],
            },
            &mut payment,
            &mut Messages::default(),
        );

        assert!(matches!(result, Err(PaymentError::MalformedResponse(_))));
        assert_eq!(payment.confirmed, 0);
        assert_eq!(payment.log.len(), 1);
        assert_eq!(payment.log[0].1["transId"], json!(60123456789u64));
        assert_eq!(payment.failed[0]["transId"], json!(60123456789u64));
    }

    struct CountingGateway(std::sync::atomic::AtomicUsize);

    #[async_trait]
    impl TransactionGateway for CountingGateway {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn submit(
            &self,
            _request: &TransactionRequest,
            _environment: crate::config::Environment,
        ) -> Result<TransactionResponse, GatewayError> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Err(GatewayError::Network("connection refused".into()))
        }
    }

    fn staged() -> StagedPaymentInput {
        let session = CheckoutSession::from_form([
            ("firstName", json!("Ellen")),
            ("lastName", json!("Johnson")),
            ("address", json!("14 Main Street")),
            ("city", json!("Pecan Springs")),
            ("state", json!("TX")),
            ("zip", json!("44628")),
            ("cardNumber", json!("4111111111111111")),
            ("cardExpiration", json!("12/28")),
            ("cardCode", json!("123")),
        ]);
        let today = chrono::NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        StagedPaymentInput::from_session_on(&session, today).unwrap()
    }

    fn counting_provider() -> AuthorizeNetProvider<CountingGateway> {
        AuthorizeNetProvider::new(
            MerchantCredentials::new("5KP3u95bQpv", "346HZ32z3fP4hTG2", "Event tickets"),
            CountingGateway(Default::default()),
        )
    }

    #[test]
    fn test_submit_rejects_zero_amount_before_calling_gateway() {
        let provider = counting_provider();
        let mut payment = Payment::default();

        let result = tokio_test::block_on(provider.submit(
            &staged(),
            &OrderReference::new("Q7XJ9", 42),
            Money::usd(0),
            &mut payment,
            &mut Messages::default(),
        ));

        assert!(matches!(result, Err(PaymentError::InvalidAmount(_))));
        assert_eq!(provider.gateway().0.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert!(payment.log.is_empty());
    }

    #[test]
    fn test_submit_calls_gateway_once() {
        let provider = counting_provider();
        let mut payment = Payment::default();
        let mut messages = Messages::default();

        let result = tokio_test::block_on(provider.submit(
            &staged(),
            &OrderReference::new("Q7XJ9", 42),
            Money::usd(2500),
            &mut payment,
            &mut messages,
        ));

        assert!(matches!(result, Err(PaymentError::GatewayUnreachable(ref d)) if d.contains("connection refused")));
        assert_eq!(provider.gateway().0.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(payment.failed, vec![json!({"error": "could not contact gateway"})]);
        assert_eq!(messages.0, vec![(MessageLevel::Error, UNREACHABLE_MESSAGE.to_string())]);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn submit_with_logs(level: tracing::Level) -> String {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();

        let provider = counting_provider();
        tracing::subscriber::with_default(subscriber, || {
            let _ = tokio_test::block_on(provider.submit(
                &staged(),
                &OrderReference::new("Q7XJ9", 42),
                Money::usd(2500),
                &mut Payment::default(),
                &mut Messages::default(),
            ));
        });

        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_submission_trace_is_debug_level() {
        let info = submit_with_logs(tracing::Level::INFO);
        assert!(!info.contains("Submitting card transaction"));
        assert!(info.contains("Could not contact payment gateway"));

        let debug = submit_with_logs(tracing::Level::DEBUG);
        assert!(debug.contains("Submitting card transaction"));
        assert!(debug.contains("XXXX1111"));
        assert!(!debug.contains("4111111111111111"));
        assert!(!debug.contains("346HZ32z3fP4hTG2"));
    }
}
