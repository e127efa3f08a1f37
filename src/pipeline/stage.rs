use serde::{Deserialize, Serialize};

use crate::llm::client::ModelTier;
use crate::llm::tools::search::AgentToolSearch;

/// 阶段标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageId {
    Miner,
    Analyst,
    Writer,
    Publisher,
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageId::Miner => write!(f, "Miner"),
            StageId::Analyst => write!(f, "Analyst"),
            StageId::Writer => write!(f, "Writer"),
            StageId::Publisher => write!(f, "Publisher"),
        }
    }
}

/// 角色设定，进入system prompt
#[derive(Debug, Clone)]
pub struct StagePersona {
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
}

/// 任务模板，`{topic}` 会被替换为研究主题
#[derive(Debug, Clone)]
pub struct TaskTemplate {
    pub description: &'static str,
    pub expected_output: &'static str,
}

/// 阶段数据配置 - 声明可以读取哪些前序阶段的输出
#[derive(Debug, Clone, Default)]
pub struct StageDataConfig {
    /// 按声明顺序拼接进上下文
    pub depends_on: Vec<StageId>,
}

/// 具备搜索能力的阶段
pub trait SearchCapable: Send + Sync {
    fn search_tool(&self) -> &AgentToolSearch;
}

/// 流水线中的一个阶段，只包含静态配置
pub trait Stage: Send + Sync {
    fn id(&self) -> StageId;

    fn persona(&self) -> StagePersona;

    fn task(&self) -> TaskTemplate;

    fn data_config(&self) -> StageDataConfig {
        StageDataConfig::default()
    }

    fn model_tier(&self) -> ModelTier {
        ModelTier::Standard
    }

    /// 只有具备搜索能力的阶段返回Some
    fn as_search_capable(&self) -> Option<&dyn SearchCapable> {
        None
    }
}
