use crate::pipeline::stage::{Stage, StageDataConfig, StageId, StagePersona, TaskTemplate};

/// 研究空白分析：找出尚未被尝试的方法组合
#[derive(Default)]
pub struct Analyst;

impl Stage for Analyst {
    fn id(&self) -> StageId {
        StageId::Analyst
    }

    fn persona(&self) -> StagePersona {
        StagePersona {
            role: "Research Gap Analyst",
            goal: "Analyze the findings to identify the 'Novelty Gap'. What combination has NOT been tried?",
            backstory: "You are a PhD Advisor. You look at the entities found. If you see Method A and Method B exist but haven't been combined, you identify that as the Research Gap. You look for contradictions between papers.",
        }
    }

    fn task(&self) -> TaskTemplate {
        TaskTemplate {
            description: r#"Analyze the search results for: "{topic}".

1. **Matrix Comparison**: Compare the identified methods (e.g., Efficiency vs Accuracy).
2. **Identify the Gap**: Based on the "Future Work" quotes, what is the biggest unsolved problem?
3. **Proposed Innovation**: Suggest a novel combination of the identified methods."#,
            expected_output: "Technical analysis defining the State of the Art and the Research Gap.",
        }
    }

    fn data_config(&self) -> StageDataConfig {
        StageDataConfig {
            depends_on: vec![StageId::Miner],
        }
    }
}
