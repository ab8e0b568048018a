//! Remote HTTP backend for the brief collection.
//!
//! # Responsibility
//! - Map collection operations onto a JSON resource:
//!   `POST/GET {base}` and `GET/PUT/DELETE {base}/{id}`.
//! - Normalize response bodies into [`Brief`] records.
//!
//! # Invariants
//! - Any non-2xx status fails with `RepoError::Remote { status: Some(_) }`;
//!   transport failures use `status: None`. Nothing is retried.
//! - Update payloads never carry the id; it travels in the path and is
//!   re-attached to the returned record.
//! - List order is the server's order.

use crate::model::brief::{now_timestamp, Brief, BriefId, BriefInput, BriefStatus};
use crate::repo::brief_repo::{BriefRepository, RepoError, RepoResult};
use async_trait::async_trait;
use log::{info, warn};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Brief repository backed by a remote JSON collection resource.
pub struct HttpBriefRepository {
    client: Client,
    base_url: Url,
}

impl HttpBriefRepository {
    /// Creates a client for the collection at `base_url`.
    ///
    /// # Errors
    /// - `InvalidData` when `base_url` is not an absolute http(s) URL.
    /// - `Remote { status: None }` when the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> RepoResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|err| RepoError::InvalidData(format!("invalid base url `{base_url}`: {err}")))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(RepoError::InvalidData(format!(
                "base url must be absolute http(s), got `{base_url}`"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RepoError::Remote {
                status: None,
                message: format!("failed to build http client: {err}"),
            })?;

        Ok(Self { client, base_url })
    }

    fn item_url(&self, id: &BriefId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(&self, op: &'static str, request: RequestBuilder) -> RepoResult<Response> {
        let started_at = Instant::now();
        let response = request.send().await.map_err(|err| {
            warn!(
                "event={op} module=repo backend=remote status=error error_code=transport duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            RepoError::Remote {
                status: None,
                message: err.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "event={op} module=repo backend=remote status=error error_code=http_status http_status={} duration_ms={}",
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Err(RepoError::Remote {
                status: Some(status.as_u16()),
                message: summarize_body(&body),
            });
        }

        info!(
            "event={op} module=repo backend=remote status=ok http_status={} duration_ms={}",
            status.as_u16(),
            started_at.elapsed().as_millis()
        );
        Ok(response)
    }
}

#[async_trait]
impl BriefRepository for HttpBriefRepository {
    async fn create(&self, input: &BriefInput) -> RepoResult<Brief> {
        let payload = outgoing_payload(input, true);
        let response = self
            .send(
                "brief_create",
                self.request(Method::POST, self.base_url.clone()).json(&payload),
            )
            .await?;

        let created = read_json::<BriefInput>(response)
            .await?
            .unwrap_or_default()
            .fill_from(payload);
        let id = created.id.clone().ok_or_else(|| {
            RepoError::InvalidData("create response carries no brief id".to_string())
        })?;
        Ok(Brief::build(id, created))
    }

    async fn list_all(&self) -> RepoResult<Vec<Brief>> {
        let response = self
            .send("brief_list", self.request(Method::GET, self.base_url.clone()))
            .await?;

        read_json::<Vec<BriefInput>>(response)
            .await?
            .unwrap_or_default()
            .into_iter()
            .map(|item| {
                let id = item.id.clone().ok_or_else(|| {
                    RepoError::InvalidData("list response item carries no brief id".to_string())
                })?;
                Ok(Brief::build(id, item))
            })
            .collect()
    }

    async fn get_by_id(&self, id: &BriefId) -> RepoResult<Option<Brief>> {
        let response = self
            .send("brief_get", self.request(Method::GET, self.item_url(id)))
            .await?;

        let item = read_json::<BriefInput>(response).await?.ok_or_else(|| {
            RepoError::InvalidData(format!("empty response body for brief {id}"))
        })?;
        Ok(Some(Brief::build(id.clone(), item)))
    }

    async fn update(&self, id: &BriefId, input: &BriefInput) -> RepoResult<Brief> {
        let payload = outgoing_payload(input, false);
        let response = self
            .send(
                "brief_update",
                self.request(Method::PUT, self.item_url(id)).json(&payload),
            )
            .await?;

        let echoed = read_json::<BriefInput>(response)
            .await?
            .unwrap_or_default()
            .fill_from(payload);
        Ok(Brief::build(id.clone(), echoed))
    }

    async fn delete(&self, id: &BriefId) -> RepoResult<bool> {
        self.send("brief_delete", self.request(Method::DELETE, self.item_url(id)))
            .await?;
        Ok(true)
    }
}

/// Builds the JSON body for create/update: id stripped, absent fields set to
/// their model defaults. `createdAt` is stamped only for new briefs.
fn outgoing_payload(input: &BriefInput, stamp_created_at: bool) -> BriefInput {
    input.without_id().fill_from(BriefInput {
        id: None,
        title: Some(String::new()),
        description: Some(String::new()),
        colors: Some(Vec::new()),
        references: Some(Vec::new()),
        tags: Some(Vec::new()),
        status: Some(BriefStatus::default()),
        created_at: stamp_created_at.then(now_timestamp),
    })
}

/// Decodes a JSON body; an empty body yields `None`.
async fn read_json<T: DeserializeOwned>(response: Response) -> RepoResult<Option<T>> {
    let bytes = response.bytes().await.map_err(|err| RepoError::Remote {
        status: None,
        message: format!("failed to read response body: {err}"),
    })?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|err| RepoError::InvalidData(format!("malformed response body: {err}")))
}

fn summarize_body(body: &str) -> String {
    let flattened = body.replace(['\n', '\r'], " ");
    let trimmed = flattened.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    let mut summary = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>();
    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        summary.push_str("...");
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::{outgoing_payload, summarize_body, HttpBriefRepository};
    use crate::model::brief::{BriefId, BriefInput};
    use std::time::Duration;

    #[test]
    fn item_url_escapes_id_segment() {
        let repo =
            HttpBriefRepository::new("http://localhost:3000/api/briefs/", Duration::from_secs(1))
                .unwrap();
        let url = repo.item_url(&BriefId::from("a b/c"));
        assert_eq!(url.as_str(), "http://localhost:3000/api/briefs/a%20b%2Fc");
    }

    #[test]
    fn rejects_non_http_base_url() {
        assert!(HttpBriefRepository::new("ftp://example.com/briefs", Duration::from_secs(1)).is_err());
        assert!(HttpBriefRepository::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn update_payload_drops_id_and_keeps_created_at_unset() {
        let mut input = BriefInput::titled("Rebrand");
        input.id = Some(BriefId::from("7"));
        let payload = outgoing_payload(&input, false);
        assert!(payload.id.is_none());
        assert!(payload.created_at.is_none());
        assert_eq!(payload.tags, Some(Vec::new()));
    }

    #[test]
    fn summarize_body_flattens_and_truncates() {
        let long = "x\n".repeat(300);
        let summary = summarize_body(&long);
        assert!(!summary.contains('\n'));
        assert!(summary.ends_with("..."));
        assert_eq!(summarize_body("  "), "empty response body");
    }
}
