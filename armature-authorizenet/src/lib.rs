//! Authorize.net Payment Provider for Armature Framework
//!
//! Charges credit cards through the Authorize.net JSON API on behalf of a
//! ticketing host. The host owns orders, payments and the checkout session;
//! this crate collects card details, submits a single `authCaptureTransaction`
//! and maps the gateway's answer onto the payment.
//!
//! ## Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Host framework                          │
//! │   checkout session │ payment record │ buyer messages          │
//! └──────────────────────────────────────────────────────────────┘
//!             │ is_valid_session()            │ execute_payment()
//!             ▼                               ▼
//! ┌──────────────────────┐        ┌───────────────────────────┐
//! │  checkout            │ staged │  processor                │
//! │  form fields         │──────▶ │  build request            │
//! │  validation          │ input  │  classify reply           │
//! └──────────────────────┘        │  confirm / fail / log     │
//!                                 └───────────────────────────┘
//!                                             │ one round trip
//!                                             ▼
//!                                 ┌───────────────────────────┐
//!                                 │  gateway (HTTP, JSON)     │
//!                                 │  sandbox │ production     │
//!                                 └───────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use armature_authorizenet::{AuthorizeNetProvider, MerchantCredentials, PaymentProvider};
//!
//! let credentials = MerchantCredentials::from_env(None)?;
//! let provider = AuthorizeNetProvider::from_credentials(credentials)?;
//!
//! if provider.is_valid_session(&mut session) {
//!     provider.execute_payment(&mut session, &mut payment, &mut messages).await?;
//! }
//! ```

pub mod checkout;
pub mod config;
pub mod error;
pub mod gateway;
pub mod host;
pub mod money;
pub mod processor;

pub use checkout::{
    CardExpiration, CheckoutSession, FieldKind, FormField, StagedPaymentInput, ValidationError,
    ValidationErrors, is_valid_session, payment_form_fields, settings_form_fields,
};
pub use config::{Environment, MerchantCredentials};
pub use error::{ConfigError, GatewayError, HostError, PaymentError, PaymentResult};
pub use gateway::{
    GatewayResponse, HttpGateway, OrderReference, TransactionGateway, TransactionRequest,
    TransactionResponse,
};
pub use host::{MessageLevel, MessageSink, PaymentProvider, PaymentRecord};
pub use money::{Currency, Money};
pub use processor::{AuthorizeNetProvider, Outcome, apply_response};
