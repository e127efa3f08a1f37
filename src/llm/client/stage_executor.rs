//! 阶段执行器 - 每个阶段只产生一个结果，不做重新规划

use anyhow::{Result, anyhow};
use rig::completion::PromptError;

use super::providers::ProviderAgent;

/// 阶段执行器
pub struct StageExecutor;

impl StageExecutor {
    /// 不带工具的单轮调用
    pub async fn execute_plain(agent: &ProviderAgent, user_prompt: &str) -> Result<String> {
        agent.prompt(user_prompt).await
    }

    /// 带工具的调用，工具轮次用尽仍未给出最终答案时视为失败
    pub async fn execute_with_tools(
        agent: &ProviderAgent,
        user_prompt: &str,
        max_tool_turns: usize,
        verbose: bool,
    ) -> Result<String> {
        if verbose {
            println!("   ♻️ 启用搜索工具，最大工具轮次: {}", max_tool_turns);
        }

        match agent.multi_turn(user_prompt, max_tool_turns).await {
            Ok(response) => Ok(response),
            Err(PromptError::MaxDepthError { max_depth, .. }) => {
                if verbose {
                    println!("   ⚠️ 达到最大工具轮次 ({})，未得到最终答案", max_depth);
                }
                Err(anyhow!(
                    "stage reached the maximum of {} tool turns without a final answer",
                    max_depth
                ))
            }
            Err(e) => Err(anyhow!("{}", e)),
        }
    }
}
