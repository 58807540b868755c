//! Contracts consumed from the host ticketing framework
//!
//! The host owns orders, payments, sessions and user messaging. The provider
//! only ever talks to them through these traits.

use crate::{
    checkout::{CheckoutSession, FormField},
    error::{HostError, PaymentResult},
    money::Money,
};
use async_trait::async_trait;
use serde_json::Value;

/// A payment attempt on an order, as persisted by the host
pub trait PaymentRecord: Send {
    /// Internal payment id
    fn id(&self) -> String;

    /// Amount to charge
    fn amount(&self) -> Money;

    /// Code of the order this payment belongs to
    fn order_code(&self) -> String;

    /// Replace the provider-specific info stored on the payment
    fn set_info(&mut self, info: Value);

    /// Mark the payment confirmed
    fn confirm(&mut self) -> Result<(), HostError>;

    /// Mark the payment failed
    fn fail(&mut self, info: Value);

    /// Append an entry to the order's audit log
    fn log_action(&mut self, action: &str, data: Value);
}

/// Severity of a message shown to the buyer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Flash-message channel to the buyer's browser
pub trait MessageSink: Send {
    /// Queue a message for display
    fn add_message(&mut self, level: MessageLevel, text: String);
}

/// The payment provider interface the host framework calls
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Stable identifier used in settings and session keys
    fn identifier(&self) -> &'static str;

    /// Name shown to the operator
    fn verbose_name(&self) -> &'static str;

    /// Name shown to the buyer
    fn public_name(&self) -> &'static str;

    /// Operator settings
    fn settings_form_fields(&self) -> Vec<FormField>;

    /// Buyer checkout fields
    fn payment_form_fields(&self) -> Vec<FormField>;

    /// Notice shown above the settings form
    fn settings_content_render(&self) -> String;

    /// Called when the buyer places the order
    fn is_valid_session(&self, session: &mut CheckoutSession) -> bool;

    /// Text for the payment box on the order confirmation page
    fn checkout_confirm_render(&self, session: &CheckoutSession) -> String;

    /// Whether refunds can be issued through the provider
    fn refunds_supported(&self) -> bool;

    /// Charge the payment
    ///
    /// Outcomes are recorded on `payment` and `messages` before this returns.
    /// An `Err` may carry transport or parser detail in its `Display`; show
    /// the buyer [`PaymentError::user_message`](crate::PaymentError::user_message)
    /// and keep the `Display` text for operator logs.
    async fn execute_payment<P, M>(
        &self,
        session: &mut CheckoutSession,
        payment: &mut P,
        messages: &mut M,
    ) -> PaymentResult<()>
    where
        P: PaymentRecord,
        M: MessageSink;
}
