use crate::llm::tools::search::AgentToolSearch;
use crate::pipeline::stage::{SearchCapable, Stage, StageId, StagePersona, TaskTemplate};

/// 技术实体挖掘：检索并提取专有名词与 Future Work 引文
pub struct Miner {
    search_tool: AgentToolSearch,
}

impl Miner {
    pub fn new(search_tool: AgentToolSearch) -> Self {
        Self { search_tool }
    }
}

impl Stage for Miner {
    fn id(&self) -> StageId {
        StageId::Miner
    }

    fn persona(&self) -> StagePersona {
        StagePersona {
            role: "Technical Entity Miner",
            goal: "Extract specific PROPER NOUNS (Models, Algorithms, Datasets) and 'Future Work' quotes related to the topic.",
            backstory: "You are a deep-dive researcher. You do not care about general summaries. You hunt for capitalized names (e.g., 'ResNet', 'CRISPR', 'Black-Scholes'). You extract specific metrics and quotes from the Conclusion sections of papers.",
        }
    }

    fn task(&self) -> TaskTemplate {
        TaskTemplate {
            description: r#"Search for: "{topic}".

**MANDATORY EXTRACTION TARGETS:**
1. **Specific Methodologies**: Find the specific names of the leading techniques used in this field.
2. **Benchmarks & Metrics**: What datasets or standards are used to measure success?
3. **Future Work Scraper**: Find quotes where authors admit limitations (e.g., "Our method fails at X").
4. **Contradictions**: Find papers that disagree with each other."#,
            expected_output: "A detailed list of specific Models, Methods, and Quotes found.",
        }
    }

    fn as_search_capable(&self) -> Option<&dyn SearchCapable> {
        Some(self)
    }
}

impl SearchCapable for Miner {
    fn search_tool(&self) -> &AgentToolSearch {
        &self.search_tool
    }
}
