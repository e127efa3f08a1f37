use crate::pipeline::stage::{Stage, StageDataConfig, StageId, StagePersona, TaskTemplate};

#[derive(Default)]
pub struct Writer;

impl Stage for Writer {
    fn id(&self) -> StageId {
        StageId::Writer
    }

    fn persona(&self) -> StagePersona {
        StagePersona {
            role: "Principal Investigator",
            goal: "Write a detailed Technical Survey with clear sections.",
            backstory: "You write comprehensive reports. You MUST include sections for 'State-of-the-Art', 'Limitations', and 'Future Work'. You use the specific names found by the Miner.",
        }
    }

    fn task(&self) -> TaskTemplate {
        TaskTemplate {
            description: r#"Write the Technical Literature Survey on "{topic}".

**REQUIRED SECTIONS:**
1. **State-of-the-Art (SOTA)**: Discuss the specific methods found.
2. **Discordance & Conflicts**: What do different papers disagree on?
3. **Future Work & Research Gaps**: A dedicated section proposing specific new research directions.

Use specific citations and bold key terms."#,
            expected_output: "A full draft of the report.",
        }
    }

    fn data_config(&self) -> StageDataConfig {
        StageDataConfig {
            depends_on: vec![StageId::Analyst],
        }
    }
}
