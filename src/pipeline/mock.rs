//! 测试用的执行引擎与搜索服务替身

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::config::LLMConfig;
use crate::llm::client::{CompletionBackend, ModelClientFactory, ModelHandle, StageRequest};
use crate::llm::tools::search::AgentToolSearch;
use crate::pipeline::registry::StageRegistry;
use crate::pipeline::runner::ReportPipeline;
use crate::pipeline::stage::StageId;
use crate::search::{SearchBackend, SearchDepth, SearchError};

/// 一次被记录下来的阶段调用
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub stage: StageId,
    pub topic: String,
    pub model: ModelHandle,
    pub system_prompt: String,
    pub user_prompt: String,
    pub context: String,
    pub had_search_tool: bool,
}

/// 按阶段返回固定文本的执行引擎
///
/// 带搜索工具的阶段会先调用一次工具；没有为该阶段配置固定输出时，直接返回工具结果。
#[derive(Default)]
pub struct RecordingBackend {
    outputs: HashMap<StageId, String>,
    failures: Mutex<VecDeque<(StageId, String)>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, stage: StageId, output: &str) -> Self {
        self.outputs.insert(stage, output.to_string());
        self
    }

    /// 下一次执行到该阶段时返回错误，可多次排队
    pub fn fail_on(self, stage: StageId, message: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .push_back((stage, message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionBackend for RecordingBackend {
    async fn complete(&self, request: StageRequest) -> Result<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            stage: request.stage,
            topic: request.topic.clone(),
            model: request.model.clone(),
            system_prompt: request.system_prompt.clone(),
            user_prompt: request.user_prompt.clone(),
            context: request.context.clone(),
            had_search_tool: request.search_tool.is_some(),
        });

        let failure = {
            let mut failures = self.failures.lock().unwrap();
            match failures.front() {
                Some((stage, _)) if *stage == request.stage => failures.pop_front(),
                _ => None,
            }
        };
        if let Some((_, message)) = failure {
            return Err(anyhow!(message));
        }

        let tool_output = match &request.search_tool {
            Some(tool) => Some(tool.run(&request.topic, SearchDepth::Deep).await),
            None => None,
        };

        match (self.outputs.get(&request.stage), tool_output) {
            (Some(output), _) => Ok(output.clone()),
            (None, Some(tool_output)) => Ok(tool_output),
            (None, None) => Ok(format!("{} output", request.stage)),
        }
    }
}

/// 返回固定结果或固定错误的搜索服务
pub struct ScriptedSearch {
    response: Result<String, String>,
    calls: Mutex<Vec<(String, SearchDepth)>>,
}

impl ScriptedSearch {
    pub fn ok(blob: &str) -> Self {
        Self {
            response: Ok(blob.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, SearchDepth)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for ScriptedSearch {
    async fn search(&self, query: &str, depth: SearchDepth) -> Result<String, SearchError> {
        self.calls.lock().unwrap().push((query.to_string(), depth));
        self.response.clone().map_err(SearchError::Request)
    }
}

pub fn test_llm_config() -> LLMConfig {
    LLMConfig {
        api_key: "test-groq-key".to_string(),
        ..Default::default()
    }
}

/// 用替身组装标准四阶段流水线
pub fn mock_pipeline(backend: Arc<RecordingBackend>, search: Arc<ScriptedSearch>) -> ReportPipeline {
    let registry = StageRegistry::standard(AgentToolSearch::new(search, SearchDepth::Deep));
    let factory = ModelClientFactory::new(&test_llm_config()).unwrap();
    ReportPipeline::new(registry, factory, backend)
}
