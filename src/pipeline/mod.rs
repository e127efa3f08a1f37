//! 研究流水线
//!
//! 四个阶段按固定顺序执行：Miner检索资料，Analyst寻找研究空白，
//! Writer撰写草稿，Publisher整理成最终报告。每个阶段只能看到自己声明依赖的上游输出。

pub mod context;
pub mod prompt;
pub mod registry;
pub mod runner;
pub mod stage;
pub mod stages;
pub mod workflow;

#[cfg(test)]
pub(crate) mod mock;

pub use context::{PipelineRun, StageResult, Topic};
pub use registry::StageRegistry;
pub use runner::ReportPipeline;
pub use stage::{Stage, StageId};

// Include tests
#[cfg(test)]
mod tests;
