use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::error::ResearchError;
use crate::llm::client::ModelHandle;
use crate::pipeline::stage::StageId;

/// 研究主题，去除首尾空白后不能为空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic(String);

impl Topic {
    pub fn new(raw: &str) -> Result<Self, ResearchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ResearchError::Validation(
                "topic must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 单个阶段的输出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: StageId,
    pub role: String,
    pub model: ModelHandle,
    pub output: String,
    pub elapsed: Duration,
}

/// 拼接进下游上下文的单个阶段输出块
pub fn format_context_block(role: &str, output: &str) -> String {
    format!("### Output of {}\n{}\n", role, output)
}

/// 一次研究流程的运行记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub id: Uuid,
    pub topic: Topic,
    pub started_at: DateTime<Utc>,
    results: Vec<StageResult>,
}

impl PipelineRun {
    pub fn new(topic: Topic) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic,
            started_at: Utc::now(),
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, result: StageResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[StageResult] {
        &self.results
    }

    pub fn result_of(&self, stage: StageId) -> Option<&StageResult> {
        self.results.iter().find(|r| r.stage == stage)
    }

    /// 按声明顺序拼接依赖阶段的输出
    ///
    /// 依赖必须已经执行完毕，否则返回配置错误。
    pub fn resolve_context(&self, dependencies: &[StageId]) -> Result<String, ResearchError> {
        let mut blocks = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            let result = self.result_of(*dependency).ok_or_else(|| {
                ResearchError::Configuration(format!(
                    "required stage result {} is not available",
                    dependency
                ))
            })?;
            blocks.push(format_context_block(&result.role, &result.output));
        }
        Ok(blocks.join("\n"))
    }

    /// 最后一个阶段的输出即最终报告
    pub fn final_report(&self) -> Option<&str> {
        self.results.last().map(|r| r.output.as_str())
    }

    pub fn into_report(self) -> Option<String> {
        self.results.into_iter().last().map(|r| r.output)
    }

    pub fn total_elapsed(&self) -> Duration {
        self.results.iter().map(|r| r.elapsed).sum()
    }

    /// 获取格式化的执行时间报告
    pub fn timing_report(&self) -> String {
        let mut report = String::from("⏱️ 各阶段耗时:\n");
        for result in &self.results {
            report.push_str(&format!(
                "   {} ({}): {:.2}s\n",
                result.stage,
                result.model.model,
                result.elapsed.as_secs_f64()
            ));
        }
        report.push_str(&format!(
            "   总计: {:.2}s",
            self.total_elapsed().as_secs_f64()
        ));
        report
    }
}
