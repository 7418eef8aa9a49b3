use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Free-text generation from a single prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: String, model: String, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            model,
            api_key,
        })
    }

    /// Resolve the generateContent endpoint for the configured model.
    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let model = self.model.trim_start_matches("models/");
        format!("{}/models/{}:generateContent", base, model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let contents = vec![Content {
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }];
        let body = serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "temperature": 0.9,
                "maxOutputTokens": 1024,
            },
        });

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("Failed to read Gemini response")?;
        if !status.is_success() {
            bail!("Gemini API error: {} - {}", status.as_u16(), text);
        }
        let json: serde_json::Value =
            serde_json::from_str(&text).context("Failed to parse Gemini JSON")?;

        Ok(extract_text(&json))
    }
}

/// Concatenate the text parts of the first candidate (empty when absent).
fn extract_text(json: &serde_json::Value) -> String {
    json["candidates"]
        .get(0)
        .and_then(|c| c["content"]["parts"].as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}
