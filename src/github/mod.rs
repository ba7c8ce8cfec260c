//! GitHub API plumbing.
//!
//! A thin blocking client over `ureq`. The sync loop is strictly sequential,
//! so a blocking client keeps the call sites simple; there is no retry logic
//! here - per-item failures are handled by the run controller.

pub mod auth;
pub mod issues;
pub mod repos;

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// User-Agent header required by the GitHub API.
const USER_AGENT: &str = "issue-sync";

/// Pinned REST API version.
const API_VERSION: &str = "2022-11-28";

/// Standard media type for REST endpoints.
pub const ACCEPT_JSON: &str = "application/vnd.github+json";

/// Preview media type required by the legacy (classic) projects API.
pub const ACCEPT_INERTIA: &str = "application/vnd.github.inertia-preview+json";

/// Page size for paginated listings.
const PER_PAGE: usize = 100;

/// Blocking GitHub client bound to one installation token.
pub struct GithubClient {
    token: String,
    api_url: String,
    graphql_url: String,
}

impl GithubClient {
    pub fn new(token: String, api_url: String, graphql_url: String) -> Self {
        Self {
            token,
            api_url,
            graphql_url,
        }
    }

    /// GET a REST endpoint and deserialize the JSON response.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        accept: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.api_url, path);
        let mut request = ureq::get(&url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", accept)
            .set("User-Agent", USER_AGENT)
            .set("X-GitHub-Api-Version", API_VERSION);
        for (key, value) in query {
            request = request.query(key, value);
        }

        let response = request.call().map_err(map_ureq_error)?;
        response
            .into_json()
            .map_err(|e| Error::Http(format!("failed to parse response from {}: {}", path, e)))
    }

    /// POST a JSON body to a REST endpoint and deserialize the response.
    pub fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
        accept: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.api_url, path);
        let response = ureq::post(&url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", accept)
            .set("User-Agent", USER_AGENT)
            .set("X-GitHub-Api-Version", API_VERSION)
            .send_json(body.clone())
            .map_err(map_ureq_error)?;
        response
            .into_json()
            .map_err(|e| Error::Http(format!("failed to parse response from {}: {}", path, e)))
    }

    /// GET every page of a paginated listing.
    ///
    /// Pages are requested with `per_page=100`; a short page ends the loop.
    /// Each run re-lists from scratch - the sequence is not restartable.
    pub fn get_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        extra_query: &[(&str, String)],
        accept: &str,
    ) -> Result<Vec<T>> {
        let mut all = Vec::new();
        let mut page = 1usize;
        loop {
            let mut query: Vec<(&str, String)> = vec![
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ];
            query.extend(extra_query.iter().map(|(k, v)| (*k, v.clone())));

            let batch: Vec<T> = self.get_json(path, &query, accept)?;
            let len = batch.len();
            all.extend(batch);

            if len < PER_PAGE {
                return Ok(all);
            }
            page += 1;
        }
    }

    /// POST a GraphQL query and return the `data` object.
    ///
    /// A response carrying an `errors` array maps to [`Error::Graphql`] even
    /// when partial data is present - the caller must be able to trust what
    /// it reads.
    pub fn graphql(&self, query: &str, variables: serde_json::Value) -> Result<serde_json::Value> {
        let body = serde_json::json!({ "query": query, "variables": variables });
        let response = ureq::post(&self.graphql_url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/json")
            .set("User-Agent", USER_AGENT)
            .send_json(body)
            .map_err(map_ureq_error)?;

        let payload: serde_json::Value = response
            .into_json()
            .map_err(|e| Error::Graphql(format!("failed to parse response: {}", e)))?;

        if let Some(errors) = payload.get("errors").and_then(|e| e.as_array()) {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
                .collect();
            return Err(Error::Graphql(messages.join("; ")));
        }

        payload
            .get("data")
            .cloned()
            .ok_or_else(|| Error::Graphql("response carried no data object".to_string()))
    }
}

/// Map a transport or status error onto the crate error type.
///
/// Primary (403) and secondary (429) rate limits are detected from the
/// `x-ratelimit-*` headers and surfaced as a distinct error kind carrying
/// the reset time, so the run controller can report when to come back.
fn map_ureq_error(err: ureq::Error) -> Error {
    match err {
        ureq::Error::Status(code, resp) => {
            if let Some(reset_at) = rate_limit_reset(
                code,
                resp.header("x-ratelimit-remaining"),
                resp.header("x-ratelimit-reset"),
            ) {
                return Error::RateLimited { reset_at };
            }
            let url = resp.get_url().to_string();
            let body = resp.into_string().unwrap_or_default();
            Error::Http(format!("HTTP {} from {}: {}", code, url, body.trim()))
        }
        other => Error::Http(other.to_string()),
    }
}

/// Decide whether a response represents an exhausted rate limit, and if so
/// when it resets.
fn rate_limit_reset(
    status: u16,
    remaining: Option<&str>,
    reset: Option<&str>,
) -> Option<DateTime<Utc>> {
    if status != 403 && status != 429 {
        return None;
    }
    if remaining != Some("0") {
        return None;
    }
    let epoch: i64 = reset?.parse().ok()?;
    Utc.timestamp_opt(epoch, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_detected_on_403() {
        let reset = rate_limit_reset(403, Some("0"), Some("1700000000")).unwrap();
        assert_eq!(reset.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_rate_limit_detected_on_429() {
        assert!(rate_limit_reset(429, Some("0"), Some("1700000000")).is_some());
    }

    #[test]
    fn test_plain_403_is_not_rate_limit() {
        // A 403 with remaining quota is a permissions problem, not throttling
        assert!(rate_limit_reset(403, Some("4999"), Some("1700000000")).is_none());
        assert!(rate_limit_reset(403, None, None).is_none());
    }

    #[test]
    fn test_other_statuses_never_rate_limit() {
        assert!(rate_limit_reset(500, Some("0"), Some("1700000000")).is_none());
        assert!(rate_limit_reset(404, Some("0"), Some("1700000000")).is_none());
    }

    #[test]
    fn test_unparseable_reset_header_ignored() {
        assert!(rate_limit_reset(403, Some("0"), Some("soon")).is_none());
        assert!(rate_limit_reset(403, Some("0"), None).is_none());
    }
}
