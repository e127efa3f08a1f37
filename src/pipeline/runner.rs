use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{FailureClassifier, ResearchError, classify_by_message, to_research_error};
use crate::llm::client::{CompletionBackend, LLMClient, ModelClientFactory, StageRequest};
use crate::llm::tools::search::AgentToolSearch;
use crate::pipeline::context::{PipelineRun, StageResult, Topic};
use crate::pipeline::prompt::StagePromptBuilder;
use crate::pipeline::registry::StageRegistry;
use crate::search::LinkupClient;

/// 研究报告流水线
///
/// 按注册顺序串行执行各阶段，任一阶段失败即终止整个运行，不做内部重试。
pub struct ReportPipeline {
    registry: StageRegistry,
    factory: ModelClientFactory,
    backend: Arc<dyn CompletionBackend>,
    classifier: FailureClassifier,
}

impl ReportPipeline {
    pub fn new(
        registry: StageRegistry,
        factory: ModelClientFactory,
        backend: Arc<dyn CompletionBackend>,
    ) -> Self {
        Self {
            registry,
            factory,
            backend,
            classifier: classify_by_message,
        }
    }

    /// 根据配置组装流水线，凭据缺失时在任何阶段执行前失败
    pub fn from_config(config: &Config) -> Result<Self, ResearchError> {
        config.validate()?;

        let factory = ModelClientFactory::new(&config.llm)?;
        let search_client = LinkupClient::new(&config.search)?;
        let search_tool = AgentToolSearch::new(Arc::new(search_client), config.search.default_depth);
        let registry = StageRegistry::standard(search_tool);
        registry.validate()?;
        let backend = LLMClient::new(&config.llm, config.verbose)?;

        Ok(Self::new(registry, factory, Arc::new(backend)))
    }

    /// 替换远程错误分类器
    pub fn with_classifier(mut self, classifier: FailureClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// 执行研究流程，返回最终报告文本
    pub async fn run_research(&self, topic: &str) -> Result<String, ResearchError> {
        let run = self.run(topic).await?;
        run.into_report().ok_or_else(|| {
            ResearchError::Configuration("pipeline produced no stage results".to_string())
        })
    }

    /// 执行研究流程，返回包含全部阶段结果的运行记录
    pub async fn run(&self, topic: &str) -> Result<PipelineRun, ResearchError> {
        let topic = Topic::new(topic)?;
        let mut run = PipelineRun::new(topic);
        info!(run_id = %run.id, topic = %run.topic, "research pipeline started");

        for stage in self.registry.stages() {
            let persona = stage.persona();
            let context = run.resolve_context(&stage.data_config().depends_on)?;
            let model = self.factory.handle_for(stage.model_tier());
            let (system_prompt, user_prompt) =
                StagePromptBuilder::build(stage, &run.topic, &context);

            println!("🤖 执行 {} ({}) 阶段，模型: {}", stage.id(), persona.role, model.model);
            info!(stage = %stage.id(), model = %model.model, tier = %model.tier, context_chars = context.len(), "stage started");

            let request = StageRequest {
                stage: stage.id(),
                topic: run.topic.to_string(),
                model: model.clone(),
                system_prompt,
                user_prompt,
                context,
                search_tool: stage
                    .as_search_capable()
                    .map(|capable| capable.search_tool().clone()),
            };

            let started = Instant::now();
            let output = match self.backend.complete(request).await {
                Ok(output) => output,
                Err(e) => {
                    let error = to_research_error(self.classifier, stage.id(), format!("{:#}", e));
                    warn!(stage = %stage.id(), error = %error, "stage failed, aborting run");
                    return Err(error);
                }
            };
            let elapsed = started.elapsed();

            println!("✓ {} 阶段完成", stage.id());
            info!(stage = %stage.id(), elapsed_secs = elapsed.as_secs_f64(), output_chars = output.len(), "stage finished");

            run.push(StageResult {
                stage: stage.id(),
                role: persona.role.to_string(),
                model,
                output,
                elapsed,
            });
        }

        info!(run_id = %run.id, "research pipeline finished");
        Ok(run)
    }
}
