//! HTTP-backed recommender.
//!
//! Posts `{model, stats, analysis}` as JSON and expects a body shaped like
//! [`AiRecommendation`]. Any transport error, non-success status, or
//! malformed body is returned as `Err` so the engine can fall back.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use sampling_core::config::RecommenderConfig;
use sampling_core::errors::RecommendError;
use sampling_core::models::{AdvancedAnalysis, AiRecommendation, DescriptiveStats};
use sampling_core::traits::Recommender;

#[derive(Serialize)]
struct RecommendRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    stats: &'a DescriptiveStats,
    analysis: &'a AdvancedAnalysis,
}

/// Recommender that delegates to an external service.
pub struct HttpRecommender {
    endpoint: String,
    model: Option<String>,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl HttpRecommender {
    /// Build from config. Fails when no endpoint is configured or the
    /// credential env var is unset.
    pub fn from_config(config: &RecommenderConfig) -> Result<Self, RecommendError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(RecommendError::NotConfigured)?
            .to_string();

        let env = config.effective_api_key_env();
        let api_key = std::env::var(env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| RecommendError::MissingCredential {
                env: env.to_string(),
            })?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.effective_timeout_ms()))
            .build()
            .map_err(|e| RecommendError::Transport {
                reason: e.to_string(),
            })?;

        Ok(Self {
            endpoint,
            model: config.model.clone(),
            api_key,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Recommender for HttpRecommender {
    fn name(&self) -> &'static str {
        "http"
    }

    fn recommend(
        &self,
        stats: &DescriptiveStats,
        analysis: &AdvancedAnalysis,
    ) -> Result<AiRecommendation, RecommendError> {
        let request = RecommendRequest {
            model: self.model.as_deref(),
            stats,
            analysis,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| RecommendError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecommendError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| RecommendError::Transport {
            reason: e.to_string(),
        })?;
        let recommendation = parse_response(&body)?;

        debug!(
            method = recommendation.recommended_method.name(),
            confidence = recommendation.confidence_score,
            "remote recommendation received"
        );
        Ok(recommendation)
    }
}

/// Decode and sanity-check a service response body.
pub fn parse_response(body: &str) -> Result<AiRecommendation, RecommendError> {
    let recommendation: AiRecommendation =
        serde_json::from_str(body).map_err(|e| RecommendError::MalformedResponse {
            reason: e.to_string(),
        })?;

    if recommendation.confidence_score > 100 {
        return Err(RecommendError::MalformedResponse {
            reason: format!(
                "confidenceScore {} is above 100",
                recommendation.confidence_score
            ),
        });
    }
    if recommendation.reasoning.iter().all(|r| r.trim().is_empty()) {
        return Err(RecommendError::MalformedResponse {
            reason: "reasoning is empty".to_string(),
        });
    }
    Ok(recommendation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampling_core::models::{RiskIndicator, SamplingMethod};

    #[test]
    fn test_parse_valid_response() {
        let body = r#"{
            "recommendedMethod": "cav",
            "confidenceScore": 88,
            "reasoning": ["mixed signs"],
            "riskFactors": ["negative_values"],
            "directedSelectionAdvice": ""
        }"#;
        let rec = parse_response(body).unwrap();
        assert_eq!(rec.recommended_method, SamplingMethod::Cav);
        assert_eq!(rec.risk_factors, vec![RiskIndicator::NegativeValues]);
    }

    #[test]
    fn test_parse_rejects_out_of_range_confidence() {
        let body = r#"{"recommendedMethod":"mus","confidenceScore":150,"reasoning":["x"],"riskFactors":[]}"#;
        assert!(matches!(
            parse_response(body),
            Err(RecommendError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_method_and_empty_reasoning() {
        let unknown = r#"{"recommendedMethod":"dice","confidenceScore":50,"reasoning":["x"],"riskFactors":[]}"#;
        assert!(parse_response(unknown).is_err());
        let empty = r#"{"recommendedMethod":"mus","confidenceScore":50,"reasoning":[],"riskFactors":[]}"#;
        assert!(parse_response(empty).is_err());
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        let config = RecommenderConfig::default();
        assert!(matches!(
            HttpRecommender::from_config(&config),
            Err(RecommendError::NotConfigured)
        ));
    }

    #[test]
    fn test_from_config_requires_credential() {
        let config = RecommenderConfig {
            endpoint: Some("http://127.0.0.1:9/recommend".into()),
            api_key_env: Some("AUDIT_SAMPLING_TEST_KEY_THAT_IS_NEVER_SET".into()),
            ..Default::default()
        };
        match HttpRecommender::from_config(&config) {
            Err(RecommendError::MissingCredential { env }) => {
                assert_eq!(env, "AUDIT_SAMPLING_TEST_KEY_THAT_IS_NEVER_SET");
            }
            other => panic!("expected MissingCredential, got {:?}", other.err()),
        }
    }
}
