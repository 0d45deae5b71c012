use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::AppError;
use http::{header, HeaderMap, HeaderValue, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Error)]
pub enum GithubApiError {
    #[error("github api rejected the token for {endpoint}")]
    Unauthorized { endpoint: String },
    #[error("github api rate limit exhausted for {endpoint} (resets at {reset_at:?})")]
    RateLimited {
        endpoint: String,
        reset_at: Option<DateTime<Utc>>,
    },
    #[error("github api error: {status} for {endpoint}")]
    Http {
        status: StatusCode,
        endpoint: String,
    },
}

impl GithubApiError {
    /// Maps a non-success response onto the error the caller should see.
    pub fn from_response(
        status: StatusCode,
        headers: &HeaderMap,
        endpoint: impl Into<String>,
    ) -> Self {
        let endpoint = endpoint.into();
        if status == StatusCode::UNAUTHORIZED {
            return Self::Unauthorized { endpoint };
        }
        let exhausted = header_i64(headers, "x-ratelimit-remaining") == Some(0);
        if exhausted
            && (status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS)
        {
            let reset_at = header_i64(headers, "x-ratelimit-reset")
                .and_then(|ts| DateTime::from_timestamp(ts, 0));
            return Self::RateLimited { endpoint, reset_at };
        }
        Self::Http { status, endpoint }
    }

    pub fn status_code(&self) -> StatusCode {
        match *self {
            GithubApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            GithubApiError::RateLimited { .. } => StatusCode::FORBIDDEN,
            GithubApiError::Http { status, .. } => status,
        }
    }
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
}

/// Source of raw repository records for the authenticated user.
#[async_trait]
pub trait GithubClient: Send + Sync {
    /// One page of `GET /user/repos`, as raw JSON objects.
    async fn list_user_repos(&self, page: u32, per_page: u32) -> Result<Vec<Value>>;
}

pub struct RestGithubClient {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl RestGithubClient {
    pub fn new(token: String, user_agent: &str, api_base: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        let http = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .default_headers(headers)
            .build()
            .map_err(AppError::http)?;
        let base = Url::parse(api_base)?;
        Ok(Self { http, base, token })
    }

    fn join(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    fn with_query(url: &mut Url, params: &[(&str, String)]) {
        let mut query_pairs = url.query_pairs_mut();
        for (key, val) in params {
            query_pairs.append_pair(key, val);
        }
    }

    #[instrument(skip(self), fields(url = %url))]
    async fn get_json_array(&self, url: Url) -> Result<Vec<Value>> {
        let endpoint = url.path().trim_start_matches('/').to_string();
        debug!(endpoint = %endpoint, "dispatching github request");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(AppError::http)?;
        let status = response.status();
        if !status.is_success() {
            return Err(GithubApiError::from_response(status, response.headers(), endpoint).into());
        }
        let value: Value = response.json().await.map_err(AppError::http)?;
        match value {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            _ => Err(anyhow!("expected array response from {endpoint}")),
        }
    }
}

#[async_trait]
impl GithubClient for RestGithubClient {
    async fn list_user_repos(&self, page: u32, per_page: u32) -> Result<Vec<Value>> {
        let mut url = self.join("user/repos")?;
        let params = [
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ];
        Self::with_query(&mut url, &params);
        self.get_json_array(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn unauthorized_is_distinct() {
        let headers = HeaderMap::new();
        let err = GithubApiError::from_response(StatusCode::UNAUTHORIZED, &headers, "user/repos");
        assert!(matches!(err, GithubApiError::Unauthorized { .. }));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn exhausted_budget_is_rate_limited() {
        let err = GithubApiError::from_response(
            StatusCode::FORBIDDEN,
            &headers(&[
                ("x-ratelimit-remaining", "0"),
                ("x-ratelimit-reset", "1700000000"),
            ]),
            "user/repos",
        );
        match err {
            GithubApiError::RateLimited { reset_at, .. } => {
                assert_eq!(reset_at.map(|t| t.timestamp()), Some(1_700_000_000));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn forbidden_with_budget_left_is_plain_http() {
        let err = GithubApiError::from_response(
            StatusCode::FORBIDDEN,
            &headers(&[("x-ratelimit-remaining", "12")]),
            "user/repos",
        );
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert!(matches!(err, GithubApiError::Http { .. }));
    }

    #[test]
    fn base_url_joins_paths() {
        let client = RestGithubClient::new("t".into(), "ua", "https://example.test/api/")
            .expect("client builds");
        let url = client.join("user/repos").expect("joins");
        assert_eq!(url.as_str(), "https://example.test/api/user/repos");
    }
}
