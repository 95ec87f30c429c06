//! HTTP client for the governance API
//!
//! Every endpoint answers with `{ "ok": bool, "data": T, "error": String }`.
//! A non-success status or `ok: false` becomes an [`ApiError::Status`]
//! carrying the server's message, if it sent one.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use super::traits::GovernanceApi;
use super::types::{ApiResponse, NewGovernanceProposal, NewPollProposal, Proposal};

/// Default governance API address
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:8080/api";

/// Failure reported by the governance API itself
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("governance API request failed with status {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("governance API returned no data")]
    EmptyResponse,
}

impl ApiError {
    /// Human-readable message supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            Self::EmptyResponse => None,
        }
    }
}

/// Client for the governance REST API
#[derive(Debug, Clone)]
pub struct GovernanceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GovernanceClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("govsubmit/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid governance API URL {base_url:?}"))?;
        if base_url.cannot_be_a_base() {
            bail!("Invalid governance API URL {base_url}");
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Base URL with each segment appended and percent-encoded on its own
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Invalid governance API URL {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn create_request<T: Serialize>(&self, kind: &str, proposal: &T) -> Result<Request> {
        self.http
            .post(self.url(&["proposals", kind])?)
            .json(proposal)
            .build()
            .context("Failed to build create request")
    }

    fn proposal_request(&self, id: &str) -> Result<Request> {
        self.http
            .get(self.url(&["proposals", id])?)
            .build()
            .context("Failed to build proposal request")
    }

    fn voting_power_request(&self, address: &str, space: &str) -> Result<Request> {
        self.http
            .get(self.url(&["voting-power", address])?)
            .query(&[("space", space)])
            .build()
            .context("Failed to build voting power request")
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read governance API response")?;
        decode(status, &body)
    }
}

/// Unwrap a response envelope
fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    let envelope: ApiResponse<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: None,
            }
            .into())
        }
        Err(err) => return Err(err).context("Invalid response from governance API"),
    };

    if !status.is_success() || !envelope.ok {
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: envelope.error,
        }
        .into());
    }

    envelope.data.ok_or_else(|| ApiError::EmptyResponse.into())
}

/// Like [`decode`], but a 404 means the resource does not exist
fn decode_optional<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<Option<T>> {
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    decode(status, body).map(Some)
}

#[async_trait]
impl GovernanceApi for GovernanceClient {
    async fn create_proposal_governance(
        &self,
        proposal: &NewGovernanceProposal,
    ) -> Result<Proposal> {
        let request = self.create_request("governance", proposal)?;
        let response = self
            .http
            .execute(request)
            .await
            .context("Failed to create governance proposal")?;
        let created: Proposal = Self::read(response).await?;
        info!(id = %created.id, "Created governance proposal");
        Ok(created)
    }

    async fn create_proposal_poll(&self, proposal: &NewPollProposal) -> Result<Proposal> {
        let request = self.create_request("poll", proposal)?;
        let response = self
            .http
            .execute(request)
            .await
            .context("Failed to create poll")?;
        let created: Proposal = Self::read(response).await?;
        info!(id = %created.id, "Created poll");
        Ok(created)
    }

    async fn get_proposal(&self, id: &str) -> Result<Option<Proposal>> {
        let request = self.proposal_request(id)?;
        let response = self
            .http
            .execute(request)
            .await
            .with_context(|| format!("Failed to fetch proposal {id}"))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read governance API response")?;
        let proposal = decode_optional(status, &body)?;
        if proposal.is_none() {
            debug!(id, "Proposal not found");
        }
        Ok(proposal)
    }

    async fn get_voting_power(&self, address: &str, space: &str) -> Result<f64> {
        let request = self.voting_power_request(address, space)?;
        let response = self
            .http
            .execute(request)
            .await
            .context("Failed to fetch voting power")?;
        let power: f64 = Self::read(response).await?;
        debug!(address, space, power, "Fetched voting power");
        Ok(power)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    fn api_error(err: &anyhow::Error) -> &ApiError {
        err.downcast_ref::<ApiError>().expect("expected ApiError")
    }

    #[test]
    fn test_decode_success() {
        let power: f64 = decode(StatusCode::OK, r#"{"ok": true, "data": 1500.5}"#).unwrap();
        assert_eq!(power, 1500.5);
    }

    #[test]
    fn test_decode_server_message_on_error_status() {
        let err = decode::<Proposal>(
            StatusCode::BAD_REQUEST,
            r#"{"ok": false, "error": "Invalid title"}"#,
        )
        .unwrap_err();
        let api = api_error(&err);
        assert_eq!(api.server_message(), Some("Invalid title"));
        assert!(matches!(api, ApiError::Status { status: 400, .. }));
    }

    #[test]
    fn test_decode_ok_false_with_success_status() {
        let err = decode::<f64>(StatusCode::OK, r#"{"ok": false, "error": "nope"}"#).unwrap_err();
        assert_eq!(api_error(&err).server_message(), Some("nope"));
    }

    #[test]
    fn test_decode_non_json_error_body() {
        let err = decode::<f64>(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        let api = api_error(&err);
        assert_eq!(api.server_message(), None);
        assert_eq!(
            err.to_string(),
            "governance API request failed with status 502"
        );
    }

    #[test]
    fn test_decode_invalid_json_on_success() {
        let err = decode::<f64>(StatusCode::OK, "not json").unwrap_err();
        assert!(err.downcast_ref::<ApiError>().is_none());
        assert_eq!(err.to_string(), "Invalid response from governance API");
    }

    #[test]
    fn test_decode_missing_data() {
        let err = decode::<f64>(StatusCode::OK, r#"{"ok": true}"#).unwrap_err();
        assert!(matches!(api_error(&err), ApiError::EmptyResponse));
    }

    #[test]
    fn test_empty_server_message_is_ignored() {
        let err = ApiError::Status {
            status: 500,
            message: Some(String::new()),
        };
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_decode_optional_not_found_is_none() {
        let missing: Option<Proposal> =
            decode_optional(StatusCode::NOT_FOUND, r#"{"ok": false, "error": "not found"}"#)
                .unwrap();
        assert!(missing.is_none());

        let power: Option<f64> =
            decode_optional(StatusCode::OK, r#"{"ok": true, "data": 3.0}"#).unwrap();
        assert_eq!(power, Some(3.0));
    }

    #[test]
    fn test_decode_optional_keeps_other_errors() {
        let err = decode_optional::<Proposal>(StatusCode::INTERNAL_SERVER_ERROR, "").unwrap_err();
        assert!(matches!(api_error(&err), ApiError::Status { status: 500, .. }));
    }

    fn client() -> GovernanceClient {
        GovernanceClient::new("http://localhost:9000/api/").unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash() {
        assert_eq!(client().base_url(), "http://localhost:9000/api");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(GovernanceClient::new("not a url").is_err());
        assert!(GovernanceClient::new("mailto:dao@example.org").is_err());
    }

    #[test]
    fn test_create_requests() {
        let client = client();

        let governance = client
            .create_request("governance", &serde_json::json!({"title": "T"}))
            .unwrap();
        assert_eq!(*governance.method(), Method::POST);
        assert_eq!(governance.url().path(), "/api/proposals/governance");
        assert!(governance.body().is_some());

        let poll = client
            .create_request("poll", &serde_json::json!({"title": "T"}))
            .unwrap();
        assert_eq!(*poll.method(), Method::POST);
        assert_eq!(
            poll.url().as_str(),
            "http://localhost:9000/api/proposals/poll"
        );
    }

    #[test]
    fn test_proposal_request() {
        let request = client().proposal_request("p-1").unwrap();
        assert_eq!(*request.method(), Method::GET);
        assert_eq!(request.url().path(), "/api/proposals/p-1");
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn test_voting_power_request_has_space() {
        let request = client().voting_power_request("0xabc", "dao.eth").unwrap();
        assert_eq!(*request.method(), Method::GET);
        assert_eq!(request.url().path(), "/api/voting-power/0xabc");
        assert_eq!(request.url().query(), Some("space=dao.eth"));
    }

    #[test]
    fn test_id_stays_in_one_path_segment() {
        let client = client();

        let request = client.proposal_request("p1?space=evil#x").unwrap();
        assert_eq!(request.url().path(), "/api/proposals/p1%3Fspace=evil%23x");
        assert_eq!(request.url().query(), None);
        assert_eq!(request.url().fragment(), None);

        let request = client.proposal_request("../voting-power/0xabc").unwrap();
        let segments: Vec<_> = request.url().path_segments().unwrap().collect();
        assert_eq!(segments, vec!["api", "proposals", "..%2Fvoting-power%2F0xabc"]);
    }

    #[test]
    fn test_address_stays_in_one_path_segment() {
        let request = client()
            .voting_power_request("0xabc/../../proposals?x=1", "dao.eth")
            .unwrap();
        let segments: Vec<_> = request.url().path_segments().unwrap().collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1], "voting-power");
        assert_eq!(request.url().query(), Some("space=dao.eth"));
    }
}
