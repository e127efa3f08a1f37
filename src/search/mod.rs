//! 网络搜索服务客户端
//!
//! 目前对接 LinkUp 搜索 API。检索阶段通过 [`crate::llm::tools::search::AgentToolSearch`]
//! 间接使用这里的客户端，调用失败不会中断流水线。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::error::ResearchError;

/// 搜索深度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[serde(alias = "standard")]
    Shallow,
    #[default]
    Deep,
}

impl SearchDepth {
    /// LinkUp API使用的深度取值
    pub fn as_api_value(&self) -> &'static str {
        match self {
            SearchDepth::Shallow => "standard",
            SearchDepth::Deep => "deep",
        }
    }
}

impl std::fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchDepth::Shallow => write!(f, "shallow"),
            SearchDepth::Deep => write!(f, "deep"),
        }
    }
}

impl std::str::FromStr for SearchDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shallow" | "standard" => Ok(SearchDepth::Shallow),
            "deep" => Ok(SearchDepth::Deep),
            _ => Err(format!("Unknown search depth: {}", s)),
        }
    }
}

/// 搜索调用错误
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(String),

    #[error("search service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse search results: {0}")]
    Parse(String),
}

/// 远程搜索能力
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// 执行一次搜索，返回可直接交给LLM阅读的文本
    async fn search(&self, query: &str, depth: SearchDepth) -> Result<String, SearchError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LinkupSearchRequest<'a> {
    q: &'a str,
    depth: &'a str,
    output_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct LinkupSearchResponse {
    #[serde(default)]
    results: Vec<LinkupSearchResult>,
}

#[derive(Debug, Deserialize)]
struct LinkupSearchResult {
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

/// LinkUp 搜索客户端
#[derive(Clone)]
pub struct LinkupClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    max_results: usize,
    content_truncate_length: Option<usize>,
}

impl LinkupClient {
    /// 根据配置创建客户端，缺少凭据时立即失败
    pub fn new(config: &SearchConfig) -> Result<Self, ResearchError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(ResearchError::Configuration(format!(
                "search credential is missing, set {}",
                crate::config::SEARCH_API_KEY_ENV
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ResearchError::Configuration(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            endpoint: format!("{}/search", config.api_base_url.trim_end_matches('/')),
            max_results: config.max_results,
            content_truncate_length: config.content_truncate_length,
        })
    }

    /// 把搜索结果整理成文本
    fn format_results(&self, results: &[LinkupSearchResult]) -> String {
        let kept = &results[..results.len().min(self.max_results)];
        if kept.is_empty() {
            return "No results found.".to_string();
        }

        let mut content = String::new();
        for (i, result) in kept.iter().enumerate() {
            let body = match self.content_truncate_length {
                Some(limit) if result.content.chars().count() > limit => {
                    let truncated: String = result.content.chars().take(limit).collect();
                    format!("{}...(truncated)", truncated)
                }
                _ => result.content.clone(),
            };
            content.push_str(&format!(
                "{}. Title: {}\n   URL: {}\n   Content: {}\n\n",
                i + 1,
                result.name,
                result.url,
                body
            ));
        }
        content.trim_end().to_string()
    }
}

#[async_trait]
impl SearchBackend for LinkupClient {
    async fn search(&self, query: &str, depth: SearchDepth) -> Result<String, SearchError> {
        debug!(query, %depth, "sending linkup search request");

        let body = LinkupSearchRequest {
            q: query,
            depth: depth.as_api_value(),
            output_type: "searchResults",
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "linkup search failed");
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: LinkupSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        debug!(results = parsed.results.len(), "linkup search completed");
        Ok(self.format_results(&parsed.results))
    }
}
