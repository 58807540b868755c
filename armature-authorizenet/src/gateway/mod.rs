//! Authorize.net gateway: wire types and transport

pub mod client;
pub mod request;
pub mod response;

pub use client::HttpGateway;
pub use request::{OrderReference, TransactionRequest, TransactionType};
pub use response::{
    GatewayErrorDetail, GatewayMessage, GatewayResponse, MalformedReason, ResponseCode,
    TransactionResponse,
};

use crate::{config::Environment, error::GatewayError};
use async_trait::async_trait;

/// Transport for charge requests
///
/// Implementations perform exactly one round trip per call and never retry.
/// Any `Err` is treated as "the gateway could not be contacted".
#[async_trait]
pub trait TransactionGateway: Send + Sync {
    /// Gateway name
    fn name(&self) -> &'static str;

    /// Submit a charge request
    async fn submit(
        &self,
        request: &TransactionRequest,
        environment: Environment,
    ) -> Result<TransactionResponse, GatewayError>;
}
