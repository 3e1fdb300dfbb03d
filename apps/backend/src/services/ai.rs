//! Proxy to the upstream AI generation microservice.
//!
//! The backend never talks to an LLM itself; it forwards generation
//! requests to the AI service and maps its failures onto our error
//! vocabulary: unreachable upstream is 503, a timeout is 504, an
//! upstream 422 becomes a 400 for the caller, anything else from the
//! upstream is a 502.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ai::AiConfig;
use crate::error::AppError;
use crate::errors::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    Functional,
    EdgeCase,
    Negative,
    All,
}

fn default_test_type() -> TestType {
    TestType::All
}

fn default_max_tests() -> u32 {
    5
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TestGenerationRequest {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default = "default_test_type")]
    pub test_type: TestType,
    #[serde(default = "default_max_tests")]
    pub max_tests: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratedStep {
    pub step_number: u32,
    pub action: String,
    pub expected_result: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratedTestCase {
    pub title: String,
    #[serde(default)]
    pub preconditions: Option<String>,
    pub steps: Vec<GeneratedStep>,
    pub expected_result: String,
    pub priority: String,
    pub test_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TestGenerationResponse {
    pub test_cases: Vec<GeneratedTestCase>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

fn default_max_scenarios() -> u32 {
    3
}

fn default_include_examples() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BddGenerationRequest {
    pub feature_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default = "default_max_scenarios")]
    pub max_scenarios: u32,
    #[serde(default = "default_include_examples")]
    pub include_examples: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BddScenario {
    pub name: String,
    pub given: Vec<String>,
    pub when: Vec<String>,
    pub then: Vec<String>,
    #[serde(default)]
    pub examples: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BddGenerationResponse {
    pub feature_name: String,
    pub feature_description: String,
    pub scenarios: Vec<BddScenario>,
    pub gherkin: String,
}

#[derive(Clone)]
pub struct AiClient {
    http: reqwest::Client,
    config: AiConfig,
}

impl AiClient {
    pub fn new(config: AiConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build the AI service client: {e}")))?;
        Ok(Self { http, config })
    }

    pub async fn generate_tests(
        &self,
        request: &TestGenerationRequest,
    ) -> Result<TestGenerationResponse, AppError> {
        self.post_json("/generate/tests", request).await
    }

    pub async fn generate_bdd(
        &self,
        request: &BddGenerationRequest,
    ) -> Result<BddGenerationResponse, AppError> {
        self.post_json("/generate/bdd", request).await
    }

    async fn post_json<Req, Res>(&self, path: &str, body: &Req) -> Result<Res, AppError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let url = format!("{}{path}", self.config.base_url);
        let mut request = self.http.post(&url).json(body);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("X-API-Key", api_key);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if status.is_success() {
            return response.json::<Res>().await.map_err(|e| {
                warn!(error = %e, url, "AI service returned an unparseable body");
                AppError::BadGateway {
                    detail: "AI service returned an invalid response".to_string(),
                }
            });
        }

        let detail = response.text().await.unwrap_or_default();
        warn!(status = %status, url, "AI service request failed");
        match status {
            StatusCode::UNPROCESSABLE_ENTITY => Err(AppError::bad_request(
                ErrorCode::AiRejected,
                if detail.is_empty() {
                    "AI service rejected the request".to_string()
                } else {
                    detail
                },
            )),
            _ => Err(AppError::BadGateway {
                detail: format!("AI service answered with status {status}"),
            }),
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        return AppError::UpstreamTimeout {
            detail: "AI service did not answer in time".to_string(),
        };
    }
    if e.is_connect() {
        return AppError::UpstreamUnavailable {
            code: ErrorCode::AiUnavailable,
            detail: "AI service is unreachable".to_string(),
        };
    }
    warn!(error = %e, "AI service request error");
    AppError::UpstreamUnavailable {
        code: ErrorCode::AiUnavailable,
        detail: "AI service request failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{AiClient, BddGenerationRequest, TestGenerationRequest, TestType};
    use crate::config::ai::AiConfig;

    #[test]
    fn request_defaults() {
        let req: TestGenerationRequest =
            serde_json::from_str(r#"{"description": "Login form validation"}"#).unwrap();
        assert_eq!(req.test_type, TestType::All);
        assert_eq!(req.max_tests, 5);
        assert!(req.priority.is_none());

        let bdd: BddGenerationRequest =
            serde_json::from_str(r#"{"feature_description": "Password reset flow"}"#).unwrap();
        assert_eq!(bdd.max_scenarios, 3);
        assert!(bdd.include_examples);
    }

    #[test]
    fn optional_fields_skipped_when_forwarding() {
        let req = TestGenerationRequest {
            description: "Checkout".to_string(),
            context: None,
            test_type: TestType::EdgeCase,
            max_tests: 2,
            priority: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("context").is_none());
        assert!(json.get("priority").is_none());
        assert_eq!(json["test_type"], "edge_case");
    }

    #[test]
    fn client_builds_with_configured_timeout() {
        let config = AiConfig {
            base_url: "http://ai:8000".to_string(),
            api_key: None,
            timeout: Duration::from_secs(5),
        };
        assert!(AiClient::new(config).is_ok());
    }
}
