//! HTTP transport for the Authorize.net JSON API

use super::{TransactionGateway, TransactionRequest, TransactionResponse};
use crate::{config::Environment, config::MerchantCredentials, error::GatewayError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const MAX_ERROR_BODY_LEN: usize = 512;

/// reqwest-backed gateway
pub struct HttpGateway {
    client: Client,
    endpoint: Option<Url>,
}

impl HttpGateway {
    /// Create a gateway with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("armature-authorizenet/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: None,
        })
    }

    /// Create a gateway using the merchant's timeout setting
    pub fn from_credentials(credentials: &MerchantCredentials) -> Result<Self, GatewayError> {
        Self::new(credentials.timeout)
    }

    /// Post to a fixed endpoint instead of the environment's
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, GatewayError> {
        let url = Url::parse(endpoint).map_err(|e| GatewayError::InvalidUrl(format!("{}: {}", endpoint, e)))?;
        self.endpoint = Some(url);
        Ok(self)
    }

    /// Endpoint a request for `environment` is posted to
    pub fn endpoint_for(&self, environment: Environment) -> String {
        match &self.endpoint {
            Some(url) => url.to_string(),
            None => environment.endpoint().to_string(),
        }
    }
}

#[async_trait]
impl TransactionGateway for HttpGateway {
    fn name(&self) -> &'static str {
        "authorizenet"
    }

    async fn submit(
        &self,
        request: &TransactionRequest,
        environment: Environment,
    ) -> Result<TransactionResponse, GatewayError> {
        let url = self.endpoint_for(environment);
        debug!(
            environment = %environment,
            ref_id = request.ref_id(),
            invoice_number = request.invoice_number(),
            "Submitting transaction"
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            let truncated: String = text.chars().take(MAX_ERROR_BODY_LEN).collect();
            warn!(status = status.as_u16(), "Gateway returned non-success status");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: truncated,
            });
        }

        let reply = TransactionResponse::from_slice(&body)?;
        debug!(
            ref_id = reply.ref_id.as_deref().unwrap_or_default(),
            result_code = reply
                .messages
                .as_ref()
                .and_then(|m| m.result_code.as_deref())
                .unwrap_or_default(),
            "Gateway replied"
        );

        Ok(reply)
    }
}
