//! 研究流水线错误类型

use thiserror::Error;

use crate::pipeline::stage::StageId;

/// 研究流水线对调用方暴露的错误
#[derive(Debug, Error)]
pub enum ResearchError {
    /// 缺少凭据或配置不可用，在任何阶段执行前抛出
    #[error("configuration error: {0}")]
    Configuration(String),

    /// 研究主题为空或无效，在任何远程调用前抛出
    #[error("invalid topic: {0}")]
    Validation(String),

    /// 远程服务限流，调用方可以稍后重试整个流程
    #[error("rate limited during stage {stage}: {message}")]
    RateLimited { stage: StageId, message: String },

    /// 其他远程调用失败
    #[error("remote call failed during stage {stage}: {message}")]
    RemoteFailure { stage: StageId, message: String },

    /// 调用方设置的整体超时
    #[error("research timed out after {0} seconds")]
    Timeout(u64),
}

impl ResearchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ResearchError::RateLimited { .. })
    }
}

/// 远程失败的分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RateLimited,
    Other,
}

/// 可替换的远程错误分类函数
pub type FailureClassifier = fn(&str) -> FailureKind;

const RATE_LIMIT_MARKERS: [&str; 4] = ["rate_limit", "ratelimit", "rate limit", "too many requests"];

/// 默认分类器：对错误信息做大小写无关的子串匹配
///
/// 上游没有结构化的错误码，只能依赖错误文案。如果服务端以后提供错误码，
/// 替换这个函数即可。
pub fn classify_by_message(message: &str) -> FailureKind {
    let lowered = message.to_lowercase();
    if RATE_LIMIT_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        FailureKind::RateLimited
    } else {
        FailureKind::Other
    }
}

/// 按分类结果把远程错误映射成 ResearchError
pub fn to_research_error(
    classifier: FailureClassifier,
    stage: StageId,
    message: String,
) -> ResearchError {
    match classifier(&message) {
        FailureKind::RateLimited => ResearchError::RateLimited { stage, message },
        FailureKind::Other => ResearchError::RemoteFailure { stage, message },
    }
}
