#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::error::{FailureKind, ResearchError};
    use crate::llm::client::ModelTier;
    use crate::pipeline::context::format_context_block;
    use crate::pipeline::mock::{RecordingBackend, ScriptedSearch, mock_pipeline};
    use crate::pipeline::runner::ReportPipeline;
    use crate::pipeline::stage::StageId;
    use crate::search::SearchDepth;
    use std::sync::Arc;

    const TOPIC: &str = "graph neural networks for drug discovery";
    const SEARCH_BLOB: &str = "1. Title: MPNN\n   URL: https://example.org\n   Content: message passing";

    fn scripted_backend() -> RecordingBackend {
        RecordingBackend::new()
            .with_output(StageId::Miner, "MINER: MPNN, SchNet, 'fails on long-range effects'")
            .with_output(StageId::Analyst, "ANALYST: combine SchNet with equivariant attention")
            .with_output(StageId::Writer, "WRITER: draft with SOTA, Discordance, Future Work")
            .with_output(StageId::Publisher, "PUBLISHER: # Final Survey\nfull document")
    }

    #[tokio::test]
    async fn test_stages_run_in_fixed_order() {
        let backend = Arc::new(scripted_backend());
        let search = Arc::new(ScriptedSearch::ok(SEARCH_BLOB));
        let pipeline = mock_pipeline(backend.clone(), search);

        let run = pipeline.run(TOPIC).await.unwrap();

        let called: Vec<_> = backend.calls().iter().map(|c| c.stage).collect();
        let recorded: Vec<_> = run.results().iter().map(|r| r.stage).collect();
        let expected = vec![
            StageId::Miner,
            StageId::Analyst,
            StageId::Writer,
            StageId::Publisher,
        ];
        assert_eq!(called, expected);
        assert_eq!(recorded, expected);
    }

    #[tokio::test]
    async fn test_each_stage_sees_only_declared_dependencies() {
        let backend = Arc::new(scripted_backend());
        let search = Arc::new(ScriptedSearch::ok(SEARCH_BLOB));
        let pipeline = mock_pipeline(backend.clone(), search);

        pipeline.run(TOPIC).await.unwrap();
        let calls = backend.calls();

        let miner = "MINER: MPNN";
        let analyst = "ANALYST: combine";
        let writer = "WRITER: draft";
        let publisher = "PUBLISHER:";

        assert!(calls[0].context.is_empty());

        assert!(calls[1].context.contains(miner));
        assert!(!calls[1].context.contains(analyst));
        assert!(!calls[1].user_prompt.contains(writer));

        assert!(calls[2].context.contains(analyst));
        assert!(!calls[2].context.contains(miner));
        assert!(!calls[2].user_prompt.contains(publisher));

        assert!(calls[3].context.contains(writer));
        assert!(calls[3].context.contains(miner));
        assert!(!calls[3].context.contains(analyst));

        for call in &calls {
            assert!(call.user_prompt.contains(&call.context));
        }
    }

    #[tokio::test]
    async fn test_requests_carry_trimmed_topic_and_prompt_context() {
        let backend = Arc::new(scripted_backend());
        let search = Arc::new(ScriptedSearch::ok(SEARCH_BLOB));
        let pipeline = mock_pipeline(backend.clone(), search);

        pipeline.run(&format!("  {}\n", TOPIC)).await.unwrap();

        for call in backend.calls() {
            assert_eq!(call.topic, TOPIC);
            assert!(call.user_prompt.contains(TOPIC));
            if !call.context.is_empty() {
                assert!(call.user_prompt.contains(&format!(
                    "This is the context you're working with:\n{}",
                    call.context
                )));
            }
        }
    }

    #[tokio::test]
    async fn test_model_tiers_per_stage() {
        let backend = Arc::new(scripted_backend());
        let search = Arc::new(ScriptedSearch::ok(SEARCH_BLOB));
        let pipeline = mock_pipeline(backend.clone(), search);

        pipeline.run(TOPIC).await.unwrap();
        let calls = backend.calls();

        for call in &calls[..3] {
            assert_eq!(call.model.tier, ModelTier::Standard);
            assert_eq!(call.model.model, "llama-3.3-70b-versatile");
        }
        assert_eq!(calls[3].model.tier, ModelTier::Fast);
        assert_eq!(calls[3].model.model, "llama-3.1-8b-instant");
    }

    #[tokio::test]
    async fn test_only_miner_receives_search_tool() {
        let backend = Arc::new(scripted_backend());
        let search = Arc::new(ScriptedSearch::ok(SEARCH_BLOB));
        let pipeline = mock_pipeline(backend.clone(), search.clone());

        pipeline.run(TOPIC).await.unwrap();

        let with_tool: Vec<_> = backend
            .calls()
            .iter()
            .filter(|c| c.had_search_tool)
            .map(|c| c.stage)
            .collect();
        assert_eq!(with_tool, vec![StageId::Miner]);
        assert_eq!(search.calls(), vec![(TOPIC.to_string(), SearchDepth::Deep)]);
    }

    #[tokio::test]
    async fn test_blank_topic_fails_before_remote_calls() {
        for topic in ["", "   ", "\n\t"] {
            let backend = Arc::new(scripted_backend());
            let search = Arc::new(ScriptedSearch::ok(SEARCH_BLOB));
            let pipeline = mock_pipeline(backend.clone(), search.clone());

            let result = pipeline.run_research(topic).await;

            assert!(matches!(result, Err(ResearchError::Validation(_))));
            assert_eq!(backend.call_count(), 0);
            assert!(search.calls().is_empty());
        }
    }

    #[test]
    fn test_missing_credentials_fail_before_any_stage() {
        let mut config = Config::default();
        config.search.api_key = "linkup-key".to_string();
        assert!(matches!(
            ReportPipeline::from_config(&config),
            Err(ResearchError::Configuration(_))
        ));

        let mut config = Config::default();
        config.llm.api_key = "groq-key".to_string();
        assert!(matches!(
            ReportPipeline::from_config(&config),
            Err(ResearchError::Configuration(_))
        ));
    }

    #[test]
    fn test_pipeline_from_complete_config() {
        let mut config = Config::default();
        config.llm.api_key = "groq-key".to_string();
        config.search.api_key = "linkup-key".to_string();

        assert!(ReportPipeline::from_config(&config).is_ok());
    }

    #[tokio::test]
    async fn test_search_failure_flows_into_miner_result() {
        // Miner没有固定输出，直接返回工具结果
        let backend = Arc::new(
            RecordingBackend::new()
                .with_output(StageId::Analyst, "analysis")
                .with_output(StageId::Writer, "draft")
                .with_output(StageId::Publisher, "report"),
        );
        let search = Arc::new(ScriptedSearch::failing("quota exceeded"));
        let pipeline = mock_pipeline(backend.clone(), search);

        let run = pipeline.run(TOPIC).await.unwrap();

        let miner = run.result_of(StageId::Miner).unwrap();
        assert!(miner.output.starts_with("Error: "));
        assert!(miner.output.contains("quota exceeded"));
        assert_eq!(backend.call_count(), 4);
        assert!(backend.calls()[1].context.contains("Error: "));
        assert_eq!(run.final_report(), Some("report"));
    }

    #[tokio::test]
    async fn test_rate_limit_error_is_classified() {
        let backend = Arc::new(scripted_backend().fail_on(
            StageId::Analyst,
            "CompletionError: ProviderError: {\"error\":{\"code\":\"rate_limit_exceeded\"}}",
        ));
        let search = Arc::new(ScriptedSearch::ok(SEARCH_BLOB));
        let pipeline = mock_pipeline(backend.clone(), search);

        let result = pipeline.run_research(TOPIC).await;

        match result {
            Err(ResearchError::RateLimited { stage, message }) => {
                assert_eq!(stage, StageId::Analyst);
                assert!(message.contains("rate_limit_exceeded"));
            }
            other => panic!("expected rate limit, got {:?}", other),
        }
        // 失败后不再执行后续阶段
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_generic_error_is_remote_failure() {
        let backend =
            Arc::new(scripted_backend().fail_on(StageId::Publisher, "connection reset by peer"));
        let search = Arc::new(ScriptedSearch::ok(SEARCH_BLOB));
        let pipeline = mock_pipeline(backend.clone(), search);

        let result = pipeline.run_research(TOPIC).await;

        assert!(matches!(
            result,
            Err(ResearchError::RemoteFailure {
                stage: StageId::Publisher,
                ..
            })
        ));
        assert_eq!(backend.call_count(), 4);
    }

    #[tokio::test]
    async fn test_custom_classifier_is_used() {
        fn everything_is_rate_limited(_: &str) -> FailureKind {
            FailureKind::RateLimited
        }

        let backend = Arc::new(scripted_backend().fail_on(StageId::Miner, "upstream 503"));
        let search = Arc::new(ScriptedSearch::ok(SEARCH_BLOB));
        let pipeline =
            mock_pipeline(backend, search).with_classifier(everything_is_rate_limited);

        let result = pipeline.run_research(TOPIC).await;
        assert!(matches!(result, Err(ResearchError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn test_end_to_end_with_mocks() {
        let backend = Arc::new(scripted_backend());
        let search = Arc::new(ScriptedSearch::ok(SEARCH_BLOB));
        let pipeline = mock_pipeline(backend.clone(), search);

        let report = pipeline.run_research(TOPIC).await.unwrap();

        assert_eq!(report, "PUBLISHER: # Final Survey\nfull document");

        let publisher_call = &backend.calls()[3];
        let expected_context = [
            format_context_block(
                "Principal Investigator",
                "WRITER: draft with SOTA, Discordance, Future Work",
            ),
            format_context_block(
                "Technical Entity Miner",
                "MINER: MPNN, SchNet, 'fails on long-range effects'",
            ),
        ]
        .join("\n");
        assert_eq!(publisher_call.context, expected_context);
        assert!(publisher_call.user_prompt.contains(TOPIC));
    }

    #[tokio::test]
    async fn test_concurrent_runs_are_independent() {
        let backend = Arc::new(scripted_backend());
        let search = Arc::new(ScriptedSearch::ok(SEARCH_BLOB));
        let pipeline = Arc::new(mock_pipeline(backend.clone(), search));

        let first = tokio::spawn({
            let pipeline = pipeline.clone();
            async move { pipeline.run("topic one").await }
        });
        let second = tokio::spawn({
            let pipeline = pipeline.clone();
            async move { pipeline.run("topic two").await }
        });

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.topic.as_str(), "topic one");
        assert_eq!(second.topic.as_str(), "topic two");
        assert_eq!(first.results().len(), 4);
        assert_eq!(second.results().len(), 4);
        assert_eq!(backend.call_count(), 8);
    }
}
