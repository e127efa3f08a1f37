use serde::{Deserialize, Serialize};

use crate::llm::tools::search::AgentToolSearch;
use crate::pipeline::stage::StageId;

/// 模型档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// 较大的versatile模型
    Standard,
    /// 较小的instant模型，用于降低限流概率
    Fast,
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelTier::Standard => write!(f, "standard"),
            ModelTier::Fast => write!(f, "fast"),
        }
    }
}

/// 绑定到具体模型的句柄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelHandle {
    pub tier: ModelTier,
    pub model: String,
}

/// 单个阶段交给执行引擎的一次调用
///
/// rig后端只使用模型、两段提示词和搜索工具。`topic` 与 `context` 提供给
/// 不自己解析提示词的执行引擎，例如直接驱动搜索工具的引擎。
#[derive(Clone)]
pub struct StageRequest {
    pub stage: StageId,
    /// 已去除首尾空白的研究主题
    pub topic: String,
    pub model: ModelHandle,
    /// 角色、目标与背景
    pub system_prompt: String,
    /// 任务描述与上下文
    pub user_prompt: String,
    /// 依赖阶段输出拼接成的上下文，与user_prompt中的上下文段落完全一致
    pub context: String,
    /// 仅具备搜索能力的阶段携带
    pub search_tool: Option<AgentToolSearch>,
}
