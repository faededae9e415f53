use async_trait::async_trait;
use quantflow_core::analysis::entity::{GroundedText, WebSource};
use quantflow_core::analysis::error::AiError;
use quantflow_core::analysis::port::AiAnalyst;
use quantflow_core::common::tls::ensure_crypto_provider;
use quantflow_core::config::AiConfig;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

/// # Summary
/// Google Gemini 分析师实现。
///
/// # Invariants
/// - API Key 通过 `x-goog-api-key` 请求头传递，不出现在 URL 中。
/// - 缺少 API Key 时不在构造阶段失败，而是每次调用返回 `AiError::Config`，
///   使行情部分仍可降级展示。
#[derive(Clone)]
pub struct GeminiAnalyst {
    client: Client,
    // 接口根地址
    base_url: String,
    // 模型名，如 gemini-2.5-flash
    model: String,
    api_key: String,
}

impl GeminiAnalyst {
    /// # Summary
    /// 按配置创建 Gemini 客户端。
    ///
    /// # Arguments
    /// * `config`: AI 配置段。
    ///
    /// # Returns
    /// HTTP 客户端构建失败时返回 `AiError::Config`。
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        ensure_crypto_provider();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AiError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.trim().to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// # Summary
    /// 发送一次 `generateContent` 请求。
    ///
    /// # Logic
    /// 1. 检查 API Key。
    /// 2. POST 请求体，传输失败映射为 `AiError::Network`。
    /// 3. 非成功状态码交由 `classify_failure` 区分配额与其他平台错误。
    /// 4. 成功响应反序列化为 `GenerateContentResponse`。
    async fn generate(&self, body: &Value) -> Result<GenerateContentResponse, AiError> {
        if self.api_key.is_empty() {
            return Err(AiError::Config("AI API key is not configured".into()));
        }

        debug!(model = %self.model, "Calling generateContent");
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let err = classify_failure(status, &text);
            warn!(%status, error = %err, "generateContent failed");
            return Err(err);
        }

        resp.json::<GenerateContentResponse>()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))
    }
}

/// # Summary
/// 将失败响应映射为领域错误。
///
/// # Logic
/// 1. HTTP 429，或响应体中出现 `RESOURCE_EXHAUSTED` / `quota` 字样，归为配额耗尽。
/// 2. 其余归为平台错误，优先使用错误体中的 message。
pub fn classify_failure(status: StatusCode, body: &str) -> AiError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error)
        .map(|e| {
            if e.status.is_empty() {
                e.message
            } else {
                format!("{}: {}", e.status, e.message)
            }
        })
        .unwrap_or_else(|| body.trim().to_string());

    let lowered = body.to_lowercase();
    if status == StatusCode::TOO_MANY_REQUESTS
        || lowered.contains("resource_exhausted")
        || lowered.contains("quota")
    {
        return AiError::Quota(message);
    }

    AiError::Platform(format!("HTTP {status}: {message}"))
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// # Summary
/// `generateContent` 响应体，仅映射用到的字段。
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize, Debug)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize, Debug)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize, Debug)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Deserialize, Debug)]
struct WebChunk {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// 首个候选的全部文本片段拼接
    pub fn text(&self) -> Result<String, AiError> {
        let Some(candidate) = self.candidates.first() else {
            let reason = self
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(AiError::Platform(format!("Empty response: {reason}")));
        };

        Ok(candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect())
    }

    /// 首个候选的联网搜索引用，仅保留标题与链接齐全的条目
    pub fn web_sources(&self) -> Vec<WebSource> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|meta| {
                meta.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .filter_map(|web| match (&web.title, &web.uri) {
                        (Some(title), Some(uri)) if !title.is_empty() && !uri.is_empty() => {
                            Some(WebSource {
                                title: title.clone(),
                                uri: uri.clone(),
                            })
                        }
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn user_content(prompt: &str) -> Value {
    json!([{ "role": "user", "parts": [{ "text": prompt }] }])
}

#[async_trait]
impl AiAnalyst for GeminiAnalyst {
    /// # Summary
    /// 启用 `google_search` 工具的联网查询。
    async fn search(&self, query: &str) -> Result<GroundedText, AiError> {
        let body = json!({
            "contents": user_content(query),
            "tools": [{ "google_search": {} }],
        });

        let resp = self.generate(&body).await?;
        let grounded = GroundedText {
            text: resp.text()?,
            sources: resp.web_sources(),
        };
        debug!(sources = grounded.sources.len(), chars = grounded.text.len(), "Grounded search finished");
        Ok(grounded)
    }

    /// # Summary
    /// 以 `application/json` + `responseSchema` 约束输出。
    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String, AiError> {
        let body = json!({
            "contents": user_content(prompt),
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            },
        });

        self.generate(&body).await?.text()
    }
}
