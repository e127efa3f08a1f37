use crate::error::ResearchError;
use crate::llm::tools::search::AgentToolSearch;
use crate::pipeline::stage::Stage;
use crate::pipeline::stages::{Analyst, Miner, Publisher, Writer};

/// 阶段注册表
///
/// 只读，可在并发的多次运行之间共享。
pub struct StageRegistry {
    stages: Vec<Box<dyn Stage>>,
}

impl StageRegistry {
    /// 标准的四阶段流水线：检索 → 分析 → 撰写 → 发布
    ///
    /// 搜索工具在这里绑定给Miner，其余阶段不具备搜索能力。
    pub fn standard(search_tool: AgentToolSearch) -> Self {
        Self {
            stages: vec![
                Box::new(Miner::new(search_tool)),
                Box::new(Analyst),
                Box::new(Writer),
                Box::new(Publisher),
            ],
        }
    }

    /// 用自定义阶段构建注册表，顺序即执行顺序
    pub fn from_stages(stages: Vec<Box<dyn Stage>>) -> Result<Self, ResearchError> {
        let registry = Self { stages };
        registry.validate()?;
        Ok(registry)
    }

    /// 检查每个阶段只依赖排在它之前的阶段
    pub fn validate(&self) -> Result<(), ResearchError> {
        if self.stages.is_empty() {
            return Err(ResearchError::Configuration(
                "stage registry is empty".to_string(),
            ));
        }

        for (position, stage) in self.stages.iter().enumerate() {
            let preceding: Vec<_> = self.stages[..position].iter().map(|s| s.id()).collect();
            if preceding.contains(&stage.id()) {
                return Err(ResearchError::Configuration(format!(
                    "stage {} is registered more than once",
                    stage.id()
                )));
            }
            for dependency in stage.data_config().depends_on {
                if !preceding.contains(&dependency) {
                    return Err(ResearchError::Configuration(format!(
                        "stage {} depends on {} which does not run before it",
                        stage.id(),
                        dependency
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn stages(&self) -> impl Iterator<Item = &dyn Stage> {
        self.stages.iter().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
