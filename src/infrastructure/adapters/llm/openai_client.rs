//! OpenAI-compatible Chat Completions Client
//!
//! 实现 TextGeneratorPort trait，通过 HTTP 调用兼容 OpenAI 的 LLM 服务
//!
//! POST {base_url}/chat/completions
//! Request: {"model": "...", "messages": [{"role": "user", "content": "..."}],
//!           "response_format": {"type": "json_object"}}
//! Response: {"choices": [{"message": {"content": "..."}}]}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{
    GenerationError, GenerationRequest, ResponseFormat, TextGeneratorPort,
};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormatSpec>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormatSpec {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// LLM 客户端配置
#[derive(Debug, Clone)]
pub struct OpenAiClientConfig {
    /// API 基础 URL（不含 /chat/completions）
    pub base_url: String,
    /// 为 None 时生成请求返回 NotConfigured
    pub api_key: Option<String>,
    pub model: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for OpenAiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-5.1".to_string(),
            timeout_secs: 120,
        }
    }
}

impl OpenAiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// OpenAI 兼容的文本生成客户端
///
/// 单次请求，不重试、不流式
pub struct OpenAiTextGenerator {
    client: Client,
    config: OpenAiClientConfig,
}

impl OpenAiTextGenerator {
    pub fn new(config: OpenAiClientConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::NetworkError(e.to_string()))?;

        if config.api_key.is_none() {
            tracing::warn!("AI api key not set, generation endpoints will fail");
        }

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl TextGeneratorPort for OpenAiTextGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| GenerationError::NotConfigured("ai.api_key is not set".to_string()))?;

        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            response_format: match request.format {
                ResponseFormat::JsonObject => Some(ResponseFormatSpec {
                    kind: "json_object",
                }),
                ResponseFormat::Text => None,
            },
        };

        tracing::debug!(
            url = %self.completions_url(),
            model = %self.config.model,
            prompt_len = request.prompt.len(),
            format = ?request.format,
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else if e.is_connect() {
                    GenerationError::NetworkError(format!("Cannot connect to AI service: {}", e))
                } else {
                    GenerationError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "AI service returned an error");
            return Err(GenerationError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout
            } else {
                GenerationError::InvalidResponse(e.to_string())
            }
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::InvalidResponse("No choices in response".to_string()))?
            .message
            .content
            .unwrap_or_default();

        tracing::info!(
            model = %self.config.model,
            content_len = content.len(),
            "Chat completion received"
        );

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_config_default() {
        let config = OpenAiClientConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_config_builder() {
        let config = OpenAiClientConfig::new("http://localhost:1234/v1/")
            .with_api_key("sk-test")
            .with_model("local-model")
            .with_timeout(30);
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "local-model");
        assert_eq!(config.timeout_secs, 30);

        let client = OpenAiTextGenerator::new(config).unwrap();
        assert_eq!(
            client.completions_url(),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_is_not_configured() {
        let client = OpenAiTextGenerator::new(OpenAiClientConfig::default()).unwrap();
        let err = client
            .generate(GenerationRequest::text("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured(_)));
    }

    /// 本地假 LLM 服务，记录收到的请求体和 Authorization 头
    async fn spawn_fake_llm(reply: Value, status: u16) -> (String, Arc<Mutex<Vec<(Value, String)>>>) {
        let seen: Arc<Mutex<Vec<(Value, String)>>> = Arc::default();
        let recorder = seen.clone();
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let recorder = recorder.clone();
                let reply = reply.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    recorder.lock().unwrap().push((body, auth));
                    (
                        axum::http::StatusCode::from_u16(status).unwrap(),
                        Json(reply),
                    )
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/v1", addr), seen)
    }

    #[tokio::test]
    async fn test_json_request_shape_and_content() {
        let (base_url, seen) = spawn_fake_llm(
            json!({"choices": [{"message": {"content": "{\"plot\": \"p\"}"}}]}),
            200,
        )
        .await;
        let client = OpenAiTextGenerator::new(
            OpenAiClientConfig::new(base_url)
                .with_api_key("sk-test")
                .with_model("m1"),
        )
        .unwrap();

        let content = client
            .generate(GenerationRequest::json("outline please"))
            .await
            .unwrap();

        assert_eq!(content, "{\"plot\": \"p\"}");
        let seen = seen.lock().unwrap();
        let (body, auth) = &seen[0];
        assert_eq!(auth, "Bearer sk-test");
        assert_eq!(body["model"], "m1");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "outline please");
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[tokio::test]
    async fn test_text_request_omits_response_format() {
        let (base_url, seen) =
            spawn_fake_llm(json!({"choices": [{"message": {"content": "<p>x</p>"}}]}), 200).await;
        let client =
            OpenAiTextGenerator::new(OpenAiClientConfig::new(base_url).with_api_key("k")).unwrap();

        client.generate(GenerationRequest::text("chapter")).await.unwrap();

        let seen = seen.lock().unwrap();
        assert!(seen[0].0.get("response_format").is_none());
    }

    #[tokio::test]
    async fn test_service_error_status() {
        let (base_url, _) = spawn_fake_llm(json!({"error": "quota"}), 429).await;
        let client =
            OpenAiTextGenerator::new(OpenAiClientConfig::new(base_url).with_api_key("k")).unwrap();

        let err = client
            .generate(GenerationRequest::text("chapter"))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::ServiceError(msg) if msg.contains("429")));
    }

    #[tokio::test]
    async fn test_empty_choices_is_invalid_response() {
        let (base_url, _) = spawn_fake_llm(json!({"choices": []}), 200).await;
        let client =
            OpenAiTextGenerator::new(OpenAiClientConfig::new(base_url).with_api_key("k")).unwrap();

        let err = client
            .generate(GenerationRequest::text("chapter"))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::InvalidResponse(_)));
    }
}
