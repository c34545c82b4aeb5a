use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use zonewise_core::context::LlmContext;
use zonewise_core::errors::GatewayError;
use zonewise_core::provider::{Completion, CompletionOptions, LlmProvider};

use crate::converter;
use crate::models::{self, ClaudeModelInfo};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Anthropic Messages API client. One blocking request per call, no streaming.
pub struct AnthropicProvider {
    client: Client,
    api_key: SecretString,
    model_name: String,
    model_info: &'static ClaudeModelInfo,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(api_key: SecretString, model_name: Option<&str>) -> Result<Self, GatewayError> {
        let model_info = model_name
            .and_then(models::find_model)
            .unwrap_or_else(models::default_model);

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::NetworkError(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            // Unknown model names are passed through; only the limits fall back.
            model_name: model_name.unwrap_or(model_info.name).to_string(),
            model_info,
            base_url: API_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint (proxies, local fakes).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn build_request(
        &self,
        context: &LlmContext,
        options: &CompletionOptions,
    ) -> reqwest::RequestBuilder {
        let options = CompletionOptions {
            max_tokens: models::clamp_max_tokens(self.model_info, options.max_tokens),
            ..options.clone()
        };
        let body = converter::build_request_body(context, &options, &self.model_name);

        self.client
            .post(&self.base_url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .header("accept", "application/json")
            .header("content-type", "application/json")
            .json(&body)
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model_name
    }

    #[instrument(skip(self, context, options), fields(model = %self.model_name, turns = context.turns.len()))]
    async fn complete(
        &self,
        context: &LlmContext,
        options: &CompletionOptions,
    ) -> Result<Completion, GatewayError> {
        let resp = self
            .build_request(context, options)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout(CONNECT_TIMEOUT)
                } else {
                    GatewayError::NetworkError(e.to_string())
                }
            })?;

        let status = resp.status();
        let retry_after = resp
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs);

        let body = resp
            .text()
            .await
            .map_err(|e| GatewayError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            return Err(match GatewayError::from_status(status.as_u16(), body) {
                GatewayError::RateLimited { .. } => GatewayError::RateLimited { retry_after },
                other => other,
            });
        }

        let completion = converter::parse_response(&body)?;
        debug!(
            chars = completion.text.len(),
            output_tokens = completion.usage.as_ref().map(|u| u.output_tokens).unwrap_or(0),
            "completion received"
        );
        Ok(completion)
    }
}
