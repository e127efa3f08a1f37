use anyhow::Result;
use std::time::Duration;
use tracing::warn;

use crate::config::Config;
use crate::error::ResearchError;
use crate::outlet::{DiskOutlet, Outlet};
use crate::pipeline::context::PipelineRun;
use crate::pipeline::runner::ReportPipeline;

/// 调用方的重试与超时策略
#[derive(Debug, Clone, PartialEq)]
pub struct RunPolicy {
    /// 0表示不限制
    pub timeout_seconds: u64,
    pub rate_limit_retries: u32,
    pub rate_limit_wait: Duration,
}

impl RunPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout_seconds: config.timeout_seconds,
            rate_limit_retries: config.rate_limit_retries,
            rate_limit_wait: Duration::from_secs(config.rate_limit_wait_secs),
        }
    }
}

/// 执行一次完整研究：组装流水线、运行、输出报告
pub async fn launch(config: &Config, topic: &str) -> Result<PipelineRun> {
    let pipeline = ReportPipeline::from_config(config)?;

    println!("🚀 开始研究: {}", topic.trim());
    let run = run_with_policy(&pipeline, topic, &RunPolicy::from_config(config)).await?;

    println!("✓ 研究流程执行完毕");
    if let Some(report) = run.final_report() {
        println!("\n{}\n", report);
    }
    println!("{}", run.timing_report());

    if config.save_report {
        let outlet = DiskOutlet::new(config.output_path.clone());
        outlet.save(&run).await?;
    }

    Ok(run)
}

/// 在整体超时内运行流水线，遇到限流时按策略重新执行整个流程
///
/// 只有限流错误会触发重试，其余错误直接返回。
pub async fn run_with_policy(
    pipeline: &ReportPipeline,
    topic: &str,
    policy: &RunPolicy,
) -> Result<PipelineRun, ResearchError> {
    let mut retries = 0;

    loop {
        match run_with_timeout(pipeline, topic, policy.timeout_seconds).await {
            Err(err) if err.is_rate_limited() && retries < policy.rate_limit_retries => {
                retries += 1;
                eprintln!(
                    "⚠️ 触发限流，{}秒后重新执行 (第 {} / {}次重试): {}",
                    policy.rate_limit_wait.as_secs(),
                    retries,
                    policy.rate_limit_retries,
                    err
                );
                warn!(retries, error = %err, "rate limited, retrying whole pipeline");
                tokio::time::sleep(policy.rate_limit_wait).await;
            }
            other => return other,
        }
    }
}

async fn run_with_timeout(
    pipeline: &ReportPipeline,
    topic: &str,
    timeout_seconds: u64,
) -> Result<PipelineRun, ResearchError> {
    if timeout_seconds == 0 {
        return pipeline.run(topic).await;
    }

    match tokio::time::timeout(Duration::from_secs(timeout_seconds), pipeline.run(topic)).await {
        Ok(result) => result,
        Err(_) => Err(ResearchError::Timeout(timeout_seconds)),
    }
}
