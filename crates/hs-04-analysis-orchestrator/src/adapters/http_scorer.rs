//! # HTTP Risk Scorer
//!
//! `POST {heart_rate, blood_pressure, oxygen_level}` and expects
//! `{risk_level, risk_category}` back.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::{RiskAssessment, ScoreRequest, ScoringError};
use crate::ports::RiskScorer;

/// Category used when the scorer omits one.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Risk scorer over HTTP.
pub struct HttpRiskScorer {
    client: Client,
    url: String,
}

impl HttpRiskScorer {
    /// Create a scorer posting to `url`, giving up after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ScoringError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| ScoringError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RiskScorer for HttpRiskScorer {
    async fn score(&self, request: ScoreRequest) -> Result<RiskAssessment, ScoringError> {
        debug!(?request, "[hs-04] Requesting risk score");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    "request timed out".to_string()
                } else if e.is_connect() {
                    format!("cannot connect to {}", self.url)
                } else {
                    e.to_string()
                };
                warn!("[hs-04] Scorer request failed: {}", reason);
                ScoringError::Unavailable(reason)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoringError::Unavailable(format!(
                "HTTP error! status: {}",
                status.as_u16()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ScoringError::Unavailable(format!("malformed response: {}", e)))?;

        parse_score_response(&body)
    }
}

/// Interpret a scorer response body.
///
/// Non-objects are `Unavailable`. A missing, null or non-integer
/// `risk_level` is `Indeterminate`. A missing `risk_category` becomes
/// `"Unknown"`.
pub fn parse_score_response(body: &Value) -> Result<RiskAssessment, ScoringError> {
    let obj = body
        .as_object()
        .ok_or_else(|| ScoringError::Unavailable("response is not a JSON object".to_string()))?;

    let level = match obj.get("risk_level") {
        None | Some(Value::Null) => {
            return Err(ScoringError::Indeterminate(
                "response carried no risk_level".to_string(),
            ))
        }
        Some(v) => v,
    };
    let risk_level = integer_value(level).ok_or_else(|| {
        ScoringError::Indeterminate(format!("risk_level is not an integer: {}", level))
    })?;

    let risk_category = match obj.get("risk_category") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => UNKNOWN_CATEGORY.to_string(),
        Some(other) => other.to_string(),
    };

    Ok(RiskAssessment {
        risk_level,
        risk_category,
    })
}

/// `2` and `2.0` are integers; `2.5` and `"2"` are not.
fn integer_value(v: &Value) -> Option<i64> {
    if let Some(i) = v.as_i64() {
        return Some(i);
    }
    let f = v.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
