use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::{PlatformError, SocialPlatform};

const X_API_BASE_URL: &str = "https://api.x.com/2";

/// X API v2 client using an OAuth 2.0 user-context bearer token.
pub struct XClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl XClient {
    pub fn new(access_token: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: X_API_BASE_URL.to_string(),
            access_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<String, PlatformError> {
        let resp = req
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| PlatformError::Transient(format!("request failed: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| PlatformError::Transient(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(classify(status, &body));
        }
        parse_data_id(&body)
    }
}

#[async_trait]
impl SocialPlatform for XClient {
    async fn upload_media(&self, bytes: Vec<u8>) -> Result<String, PlatformError> {
        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name("poster.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| PlatformError::Transient(format!("invalid media part: {}", e)))?;
        let form = Form::new()
            .part("media", part)
            .text("media_category", "tweet_image");

        let id = self
            .send(self.client.post(self.url("media/upload")).multipart(form))
            .await?;
        debug!(media_id = %id, size, "media uploaded");
        Ok(id)
    }

    async fn create_post(
        &self,
        text: &str,
        media_id: Option<&str>,
        reply_to: Option<&str>,
    ) -> Result<String, PlatformError> {
        let body = post_body(text, media_id, reply_to);
        self.send(self.client.post(self.url("tweets")).json(&body))
            .await
    }
}

pub(crate) fn post_body(
    text: &str,
    media_id: Option<&str>,
    reply_to: Option<&str>,
) -> serde_json::Value {
    let mut body = serde_json::json!({ "text": text });
    if let Some(id) = media_id {
        body["media"] = serde_json::json!({ "media_ids": [id] });
    }
    if let Some(id) = reply_to {
        body["reply"] = serde_json::json!({ "in_reply_to_tweet_id": id });
    }
    body
}

/// Map a non-success response onto the cycle's failure taxonomy.
pub(crate) fn classify(status: StatusCode, body: &str) -> PlatformError {
    let detail = format!("{} - {}", status.as_u16(), body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            if body.contains("453") {
                warn!(
                    "Your API access level does not permit posting. Check the app's project \
                     settings in the X developer portal or upgrade the access tier."
                );
            }
            PlatformError::PermissionDenied(detail)
        }
        StatusCode::TOO_MANY_REQUESTS => PlatformError::RateLimited(detail),
        _ => PlatformError::Transient(detail),
    }
}

/// Both endpoints answer `{"data": {"id": "..."}}`.
fn parse_data_id(body: &str) -> Result<String, PlatformError> {
    let json: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| PlatformError::Transient(format!("unparseable response: {}", e)))?;
    json["data"]["id"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PlatformError::Transient(format!("response without data.id: {}", body)))
}
