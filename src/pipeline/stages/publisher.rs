use crate::llm::client::ModelTier;
use crate::pipeline::stage::{Stage, StageDataConfig, StageId, StagePersona, TaskTemplate};

/// 最终发布：扩写草稿，输出完整文档
///
/// 作为最后一次调用使用fast档位模型，减少触发限流的机会。
#[derive(Default)]
pub struct Publisher;

impl Stage for Publisher {
    fn id(&self) -> StageId {
        StageId::Publisher
    }

    fn persona(&self) -> StagePersona {
        StagePersona {
            role: "Final Publisher",
            goal: "Output the FINAL, EXTENDED Report. Do not summarize.",
            backstory: "You are a Publisher. Your job is to take the draft and the raw data and PRINT THE FULL FINAL DOCUMENT. You do not give feedback. You output the final 1000+ word article.",
        }
    }

    fn task(&self) -> TaskTemplate {
        TaskTemplate {
            description: r#"**FINAL OUTPUT INSTRUCTION:**

Your job is to generate the **Final Complete Report** on "{topic}".

1. Take the draft from the Writer.
2. If it is too short, EXPAND it using the raw search data.
3. Ensure specific names (Models/Algorithms) are used, not generic terms.
4. **OUTPUT THE FULL DOCUMENT.** Do not just say "Here is the report". Write the actual report starting with the Title."#,
            expected_output: "The complete, fully written Technical Survey in Markdown format.",
        }
    }

    fn data_config(&self) -> StageDataConfig {
        StageDataConfig {
            depends_on: vec![StageId::Writer, StageId::Miner],
        }
    }

    fn model_tier(&self) -> ModelTier {
        ModelTier::Fast
    }
}
