//! Analysis submission boundary
//!
//! The orchestrator itself is remote; this module only fixes the request
//! and response shapes and validates the target before submission.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SessionError};

/// Body posted to the orchestrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub url: String,
}

/// Orchestrator reply: an analysis id on success, an error message otherwise.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResponse {
    pub analysis_id: Option<String>,
    pub error: Option<String>,
}

impl AnalysisResponse {
    /// The analysis id, or the reported error.
    pub fn into_result(self) -> Result<String> {
        match (self.analysis_id, self.error) {
            (Some(id), _) if !id.is_empty() => Ok(id),
            (_, Some(error)) => Err(SessionError::Submission(error)),
            _ => Err(SessionError::Submission(
                "Invalid response from server.".to_string(),
            )),
        }
    }
}

/// Remote service that starts an analysis.
pub trait Orchestrator {
    fn submit(&mut self, request: &AnalysisRequest) -> Result<AnalysisResponse>;
}

/// Require an absolute http or https URL with a host.
pub fn validate_target_url(raw: &str) -> Result<AnalysisRequest> {
    let invalid = |reason: &str| SessionError::InvalidTargetUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(raw.trim()).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host"));
    }

    Ok(AnalysisRequest {
        url: parsed.to_string(),
    })
}

/// Validate `raw` and submit it, returning the new analysis id.
pub fn submit_analysis<O>(orchestrator: &mut O, raw: &str) -> Result<String>
where
    O: Orchestrator + ?Sized,
{
    let request = validate_target_url(raw)?;
    tracing::info!(url = %request.url, "submitting analysis");
    let id = orchestrator.submit(&request)?.into_result()?;
    tracing::info!(analysis_id = %id, "analysis accepted");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedOrchestrator {
        reply: AnalysisResponse,
        seen: Vec<AnalysisRequest>,
    }

    impl Orchestrator for FixedOrchestrator {
        fn submit(&mut self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
            self.seen.push(request.clone());
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn test_validate_target_url() {
        assert_eq!(
            validate_target_url("https://example.com").unwrap().url,
            "https://example.com/"
        );
        assert!(validate_target_url("example.com").is_err());
        assert!(validate_target_url("ftp://example.com").is_err());
        assert!(matches!(
            validate_target_url("not a url"),
            Err(SessionError::InvalidTargetUrl { .. })
        ));
    }

    #[test]
    fn test_response_parsing() {
        let ok: AnalysisResponse =
            serde_json::from_value(json!({"analysis_id": "5f1c"})).unwrap();
        assert_eq!(ok.into_result().unwrap(), "5f1c");

        let err: AnalysisResponse =
            serde_json::from_value(json!({"error": "Invalid request. 'url' is required."}))
                .unwrap();
        assert!(matches!(err.into_result(), Err(SessionError::Submission(_))));

        assert!(AnalysisResponse::default().into_result().is_err());
    }

    #[test]
    fn test_submit_analysis() {
        let mut orchestrator = FixedOrchestrator {
            reply: AnalysisResponse {
                analysis_id: Some("abc".into()),
                error: None,
            },
            seen: Vec::new(),
        };
        assert_eq!(
            submit_analysis(&mut orchestrator, "http://example.org/page").unwrap(),
            "abc"
        );
        assert_eq!(orchestrator.seen[0].url, "http://example.org/page");

        assert!(submit_analysis(&mut orchestrator, "javascript:alert(1)").is_err());
        assert_eq!(orchestrator.seen.len(), 1);
    }
}
