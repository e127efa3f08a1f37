use crate::pipeline::context::Topic;
use crate::pipeline::stage::Stage;

const FINAL_ANSWER_INSTRUCTION: &str =
    "You MUST return the actual complete content as the final answer, not a summary.";

/// 阶段Prompt构建器
pub struct StagePromptBuilder;

impl StagePromptBuilder {
    /// 构建系统提示词和用户提示词
    pub fn build(stage: &dyn Stage, topic: &Topic, context: &str) -> (String, String) {
        (
            Self::build_system_prompt(stage),
            Self::build_user_prompt(stage, topic, context),
        )
    }

    fn build_system_prompt(stage: &dyn Stage) -> String {
        let persona = stage.persona();
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            persona.role, persona.backstory, persona.goal
        )
    }

    fn build_user_prompt(stage: &dyn Stage, topic: &Topic, context: &str) -> String {
        let task = stage.task();
        let mut prompt = String::new();

        prompt.push_str("Current Task: ");
        prompt.push_str(&task.description.replace("{topic}", topic.as_str()));
        prompt.push_str("\n\n");

        prompt.push_str("This is the expected criteria for your final answer: ");
        prompt.push_str(task.expected_output);
        prompt.push('\n');
        prompt.push_str(FINAL_ANSWER_INSTRUCTION);
        prompt.push_str("\n\n");

        if !context.is_empty() {
            prompt.push_str("This is the context you're working with:\n");
            prompt.push_str(context);
            prompt.push('\n');
        }

        if stage.as_search_capable().is_some() {
            prompt.push_str("Use the linkup_search tool to gather evidence before answering.\n");
        }

        prompt.push_str("Begin! This is VERY important to you, give your best Final Answer.");
        prompt
    }
}
