//! LLM客户端 - 模型档位解析与阶段调用

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::{config::LLMConfig, error::ResearchError};

mod providers;
mod stage_executor;
pub mod types;

use providers::ProviderClient;
use stage_executor::StageExecutor;
pub use types::{ModelHandle, ModelTier, StageRequest};

/// 模型句柄工厂
///
/// 构造时立即检查凭据，之后只根据档位返回模型绑定，不持有任何可变状态。
#[derive(Debug, Clone)]
pub struct ModelClientFactory {
    model_standard: String,
    model_fast: String,
}

impl ModelClientFactory {
    pub fn new(config: &LLMConfig) -> Result<Self, ResearchError> {
        if config.api_key.trim().is_empty() {
            return Err(ResearchError::Configuration(format!(
                "LLM credential is missing, set {}",
                crate::config::LLM_API_KEY_ENV
            )));
        }
        Ok(Self {
            model_standard: config.model_standard.clone(),
            model_fast: config.model_fast.clone(),
        })
    }

    /// fast档位使用instant模型，其余档位使用versatile模型
    pub fn handle_for(&self, tier: ModelTier) -> ModelHandle {
        let model = match tier {
            ModelTier::Fast => self.model_fast.clone(),
            ModelTier::Standard => self.model_standard.clone(),
        };
        ModelHandle { tier, model }
    }
}

/// 外部Agent执行引擎的抽象
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// 执行一次阶段调用，返回该阶段的完整文本结果
    async fn complete(&self, request: StageRequest) -> Result<String>;
}

/// 基于rig的LLM客户端
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
    verbose: bool,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: &LLMConfig, verbose: bool) -> Result<Self, ResearchError> {
        let client = ProviderClient::new(config).map_err(|e| {
            ResearchError::Configuration(format!("failed to create LLM client: {}", e))
        })?;
        Ok(Self {
            config: config.clone(),
            client,
            verbose,
        })
    }
}

#[async_trait]
impl CompletionBackend for LLMClient {
    async fn complete(&self, request: StageRequest) -> Result<String> {
        debug!(
            stage = %request.stage,
            model = %request.model.model,
            prompt_chars = request.user_prompt.len(),
            "invoking model"
        );

        match &request.search_tool {
            Some(search_tool) => {
                let agent = self.client.create_agent_with_search(
                    &request.model.model,
                    &request.system_prompt,
                    &self.config,
                    search_tool,
                );
                StageExecutor::execute_with_tools(
                    &agent,
                    &request.user_prompt,
                    self.config.max_tool_turns,
                    self.verbose,
                )
                .await
            }
            None => {
                let agent = self.client.create_agent(
                    &request.model.model,
                    &request.system_prompt,
                    &self.config,
                );
                StageExecutor::execute_plain(&agent, &request.user_prompt).await
            }
        }
    }
}
