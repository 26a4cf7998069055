//! Pipeline engine - runs a flavor's steps in order against the LLM provider

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::domain::{
    CompletionError, FlavorId, InterpolationContext, LlmProvider, LlmRequest, Model, ModelId,
    ModelCandidateResolver, ModelRepository, PipelineError, PipelineExecutor, PipelineRequest,
    PipelineRun, Session, SessionAuthorizer, Step, StepRepository, StepResult,
};
use crate::infrastructure::observability::{
    record_llm_attempt, record_pipeline_run, record_step, AttemptOutcome,
};

/// Model used by steps whose model reference is unset or unknown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultModel {
    pub provider_model_id: String,
    pub label: String,
}

impl Default for DefaultModel {
    fn default() -> Self {
        Self {
            provider_model_id: "gemini-2.0-flash".to_string(),
            label: "Unknown".to_string(),
        }
    }
}

/// Model settings resolved for one step
#[derive(Debug, Clone)]
struct ResolvedModel {
    label: String,
    provider_model_id: String,
    temperature: Option<f32>,
}

/// A completion served by one of the candidates
#[derive(Debug)]
struct Served {
    output: String,
    model: String,
}

/// Executor backed by the step store, the model catalog and one LLM provider
#[derive(Debug)]
pub struct PipelineEngine {
    authorizer: Arc<dyn SessionAuthorizer>,
    steps: Arc<dyn StepRepository>,
    models: Arc<dyn ModelRepository>,
    provider: Arc<dyn LlmProvider>,
    resolver: ModelCandidateResolver,
    default_model: DefaultModel,
}

impl PipelineEngine {
    pub fn new(
        authorizer: Arc<dyn SessionAuthorizer>,
        steps: Arc<dyn StepRepository>,
        models: Arc<dyn ModelRepository>,
        provider: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            authorizer,
            steps,
            models,
            provider,
            resolver: ModelCandidateResolver::default(),
            default_model: DefaultModel::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: ModelCandidateResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_default_model(mut self, default_model: DefaultModel) -> Self {
        self.default_model = default_model;
        self
    }

    async fn authorize(&self, session: &Session) -> Result<(), PipelineError> {
        let access = self.authorizer.check(session).await?;

        if !access.authenticated {
            return Err(PipelineError::unauthorized());
        }

        if !access.admin {
            return Err(PipelineError::forbidden());
        }

        Ok(())
    }

    async fn load_steps(&self, flavor_id: Option<FlavorId>) -> Result<Vec<Step>, PipelineError> {
        let flavor_id = flavor_id
            .filter(|id| id.value() > 0)
            .ok_or_else(PipelineError::missing_flavor)?;

        match self.steps.list_for_flavor(flavor_id).await {
            Ok(steps) if !steps.is_empty() => Ok(steps),
            Ok(_) => Err(PipelineError::no_steps()),
            Err(e) => {
                warn!(flavor_id = %flavor_id, error = %e, "Failed to load pipeline steps");
                Err(PipelineError::no_steps())
            }
        }
    }

    /// An unreadable catalog behaves like an empty one; every step then uses the default model
    async fn load_models(&self) -> HashMap<ModelId, Model> {
        match self.models.list().await {
            Ok(models) => models.into_iter().map(|m| (m.id(), m)).collect(),
            Err(e) => {
                warn!(error = %e, "Failed to load model catalog, using default model");
                HashMap::new()
            }
        }
    }

    fn resolve_model(&self, step: &Step, catalog: &HashMap<ModelId, Model>) -> ResolvedModel {
        match step.model_ref.and_then(|id| catalog.get(&id)) {
            Some(model) => {
                let provider_model_id = match model.provider_model_id().trim() {
                    "" => self.default_model.provider_model_id.clone(),
                    id => id.to_string(),
                };

                ResolvedModel {
                    label: model.display_name().to_string(),
                    provider_model_id,
                    temperature: model.effective_temperature(step.temperature),
                }
            }
            None => ResolvedModel {
                label: self.default_model.label.clone(),
                provider_model_id: self.default_model.provider_model_id.clone(),
                temperature: None,
            },
        }
    }

    fn build_request(
        &self,
        step: &Step,
        context: &InterpolationContext,
        request: &PipelineRequest,
        temperature: Option<f32>,
    ) -> LlmRequest {
        let system_prompt = context.interpolate(step.system_prompt());
        let user_prompt = context.interpolate(step.user_prompt());

        let image = if step.needs_image() {
            request.image.clone()
        } else {
            None
        };

        LlmRequest::builder()
            .system(system_prompt)
            .user_with_optional_image(user_prompt, image)
            .temperature(temperature)
            .build()
    }

    /// Try each candidate in order until one serves the request
    async fn complete_with_fallback(
        &self,
        candidates: &[String],
        request: &LlmRequest,
    ) -> Result<Served, String> {
        let provider_name = self.provider.provider_name();
        let mut last_error: Option<CompletionError> = None;

        for candidate in candidates {
            debug!(model = %candidate, "Attempting candidate");

            match self.provider.chat(candidate, request).await {
                Ok(response) => {
                    record_llm_attempt(provider_name, candidate, AttemptOutcome::Success);

                    return Ok(Served {
                        output: response.content,
                        model: candidate.clone(),
                    });
                }
                Err(e) if e.is_recoverable() => {
                    record_llm_attempt(provider_name, candidate, AttemptOutcome::Fallback);
                    info!(model = %candidate, error = %e, "Candidate unavailable, trying next");
                    last_error = Some(e);
                }
                Err(e) => {
                    record_llm_attempt(provider_name, candidate, AttemptOutcome::Failed);
                    warn!(model = %candidate, error = %e, "Candidate failed");
                    return Err(e.to_string());
                }
            }
        }

        let last = last_error.map(|e| e.detail()).unwrap_or_default();
        Err(format!("All candidate models unavailable. Last error: {}", last))
    }

    async fn run_step(
        &self,
        step: &Step,
        catalog: &HashMap<ModelId, Model>,
        context: &InterpolationContext,
        request: &PipelineRequest,
    ) -> StepResult {
        let started = Instant::now();
        let model = self.resolve_model(step, catalog);
        let llm_request = self.build_request(step, context, request, model.temperature);
        let candidates = self
            .resolver
            .resolve(step.needs_image(), &model.provider_model_id);

        let outcome = self.complete_with_fallback(&candidates, &llm_request).await;
        let elapsed = started.elapsed();
        let duration_ms = elapsed.as_millis() as u64;

        let result = match outcome {
            Ok(served) => {
                let label = format!("{} ({})", model.label, served.model);
                StepResult::success(step, served.output, label, duration_ms)
            }
            Err(message) => StepResult::failure(step, message, model.label, duration_ms),
        };

        record_step(result.status, elapsed);
        result
    }
}

#[async_trait]
impl PipelineExecutor for PipelineEngine {
    async fn execute(
        &self,
        session: &Session,
        request: PipelineRequest,
    ) -> Result<PipelineRun, PipelineError> {
        self.authorize(session).await?;

        let steps = self.load_steps(request.flavor_id).await?;
        let catalog = self.load_models().await;

        let flavor_id = steps[0].flavor_id;
        let context = InterpolationContext::new(request.image_additional_context.as_deref());
        let mut run = PipelineRun::new(flavor_id, context);

        let span = info_span!("pipeline_run", run_id = %run.run_id, flavor_id = %flavor_id);

        async {
            info!(steps = steps.len(), "Pipeline run started");

            for step in &steps {
                let result = self
                    .run_step(step, &catalog, &run.context, &request)
                    .instrument(info_span!(
                        "pipeline_step",
                        step_id = %step.id,
                        order_index = step.order_index
                    ))
                    .await;

                info!(
                    step_id = %step.id,
                    order_index = step.order_index,
                    status = result.status.as_str(),
                    model = %result.model_label,
                    duration_ms = result.duration_ms,
                    "Step finished"
                );

                let succeeded = result.is_success();
                if succeeded && !run.context.record_step_output(step.order_index, &result.output)
                {
                    warn!(
                        step_id = %step.id,
                        order_index = step.order_index,
                        "Duplicate order index; step output not published to later prompts"
                    );
                }
                run.results.push(result);

                if !succeeded {
                    break;
                }
            }

            let outcome = run.outcome();
            record_pipeline_run(outcome);
            info!(
                outcome = outcome.as_str(),
                completed = run.results.len(),
                "Pipeline run finished"
            );
        }
        .instrument(span)
        .await;

        Ok(run)
    }

    async fn describe(
        &self,
        session: &Session,
        flavor_id: Option<FlavorId>,
    ) -> Result<Vec<Step>, PipelineError> {
        self.authorize(session).await?;
        self.load_steps(flavor_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::MockSessionAuthorizer;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::pipeline::{InMemoryStepRepository, MockStepRepository};
    use crate::domain::{
        AccessCheck, CandidateTable, DomainError, ImageInput, InMemoryModelRepository,
        InputModality, RunOutcome, StepStatus,
    };

    fn authorizer(access: AccessCheck) -> Arc<dyn SessionAuthorizer> {
        let mut mock = MockSessionAuthorizer::new();
        mock.expect_check().returning(move |_| Ok(access));
        Arc::new(mock)
    }

    fn table(vision: &[&str], text: &[&str]) -> ModelCandidateResolver {
        let to_vec = |ids: &[&str]| ids.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        ModelCandidateResolver::table(CandidateTable::new(to_vec(vision), to_vec(text)).unwrap())
    }

    fn engine(
        steps: Vec<Step>,
        models: Vec<Model>,
        provider: Arc<MockLlmProvider>,
    ) -> PipelineEngine {
        PipelineEngine::new(
            authorizer(AccessCheck::admin()),
            Arc::new(InMemoryStepRepository::new().with_steps(steps)),
            Arc::new(InMemoryModelRepository::new().with_models(models)),
            provider,
        )
        .with_resolver(table(&["vision-a", "vision-b"], &["text-a", "text-b", "text-c"]))
    }

    fn admin() -> Session {
        Session::bearer("token")
    }

    fn rate_limited(model: &str) -> CompletionError {
        CompletionError::from_status("openrouter", model, 429, format!("{} is busy", model))
    }

    fn fatal() -> CompletionError {
        CompletionError::from_status("openrouter", "x", 500, "boom".to_string())
    }

    #[tokio::test]
    async fn test_full_success_populates_context() {
        let provider = Arc::new(MockLlmProvider::new("openrouter").with_default_output("ok"));
        let engine = engine(
            vec![
                Step::new(1, 7, 1).with_user_prompt("first"),
                Step::new(2, 7, 2).with_user_prompt("second ${step1Output}"),
            ],
            vec![],
            provider.clone(),
        );

        let run = engine
            .execute(
                &admin(),
                PipelineRequest::new(FlavorId::new(7)).with_image_context("beach"),
            )
            .await
            .unwrap();

        assert_eq!(run.results.len(), 2);
        assert!(run.results.iter().all(|r| r.status == StepStatus::Success));
        assert_eq!(run.outcome(), RunOutcome::Succeeded);
        assert_eq!(run.context.get("imageAdditionalContext"), Some("beach"));
        assert_eq!(run.context.get("step1Output"), Some("ok"));
        assert_eq!(run.context.get("step2Output"), Some("ok"));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_fatal_step_halts_run() {
        let provider = Arc::new(
            MockLlmProvider::new("openrouter")
                .with_output("text-a", "fine")
                .with_error("text-b", fatal()),
        );
        let engine = PipelineEngine::new(
            authorizer(AccessCheck::admin()),
            Arc::new(InMemoryStepRepository::new().with_steps(vec![
                Step::new(1, 7, 1).with_model(1),
                Step::new(2, 7, 2).with_model(2),
                Step::new(3, 7, 3).with_model(1),
            ])),
            Arc::new(InMemoryModelRepository::new().with_models(vec![
                Model::new(1, "Fine", "text-a"),
                Model::new(2, "Broken", "text-b"),
            ])),
            provider.clone(),
        )
        .with_resolver(ModelCandidateResolver::direct());

        let run = engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap();

        assert_eq!(run.results.len(), 2);
        assert_eq!(run.results[0].status, StepStatus::Success);
        assert_eq!(run.results[0].model_label, "Fine (text-a)");
        assert_eq!(run.results[1].status, StepStatus::Error);
        assert_eq!(run.results[1].output, "openrouter API error (500): boom");
        assert_eq!(run.results[1].model_label, "Broken");
        assert_eq!(run.outcome(), RunOutcome::Halted);
        assert!(!run.context.contains("step2Output"));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_fatal_error_does_not_try_next_candidate() {
        let provider = Arc::new(
            MockLlmProvider::new("openrouter")
                .with_error("text-a", fatal())
                .with_output("text-b", "never"),
        );
        let engine = engine(vec![Step::new(1, 7, 1)], vec![], provider.clone());

        let run = engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap();

        assert_eq!(run.results[0].status, StepStatus::Error);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fallback_stops_at_first_success() {
        let provider = Arc::new(
            MockLlmProvider::new("openrouter")
                .with_error("text-a", rate_limited("text-a"))
                .with_error(
                    "text-b",
                    CompletionError::from_status("openrouter", "text-b", 404, "gone".into()),
                )
                .with_output("text-c", "served"),
        );
        let engine = engine(
            vec![Step::new(1, 7, 1).with_model(3)],
            vec![Model::new(3, "Llama", "meta-llama/llama-3.3-70b-instruct")],
            provider.clone(),
        );

        let run = engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap();

        let result = &run.results[0];
        assert_eq!(result.status, StepStatus::Success);
        assert_eq!(result.output, "served");
        assert_eq!(result.model_label, "Llama (text-c)");

        let attempted: Vec<String> = provider.calls().into_iter().map(|(m, _)| m).collect();
        assert_eq!(attempted, vec!["text-a", "text-b", "text-c"]);
    }

    #[tokio::test]
    async fn test_blank_provider_model_id_uses_default() {
        let provider = Arc::new(MockLlmProvider::new("openrouter").with_default_output("ok"));
        let engine = engine(
            vec![Step::new(1, 7, 1).with_model(5).with_temperature(0.4)],
            vec![Model::new(5, "Blank", "")],
            provider.clone(),
        )
        .with_resolver(ModelCandidateResolver::direct());

        let run = engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap();

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "gemini-2.0-flash");
        assert_eq!(calls[0].1.temperature, Some(0.4));
        assert_eq!(run.results[0].model_label, "Blank (gemini-2.0-flash)");
    }

    #[tokio::test]
    async fn test_duplicate_order_index_keeps_first_output() {
        let provider = Arc::new(
            MockLlmProvider::new("openrouter")
                .with_output("text-a", "first")
                .with_output("text-b", "second"),
        );
        let engine = PipelineEngine::new(
            authorizer(AccessCheck::admin()),
            Arc::new(InMemoryStepRepository::new().with_steps(vec![
                Step::new(1, 7, 1).with_model(1),
                Step::new(2, 7, 1).with_model(2),
                Step::new(3, 7, 2).with_model(1).with_user_prompt("${step1Output}"),
            ])),
            Arc::new(InMemoryModelRepository::new().with_models(vec![
                Model::new(1, "A", "text-a"),
                Model::new(2, "B", "text-b"),
            ])),
            provider.clone(),
        )
        .with_resolver(ModelCandidateResolver::direct());

        let run = engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap();

        assert_eq!(run.results.len(), 3);
        assert_eq!(run.context.get("step1Output"), Some("first"));

        let last_prompt = format!("{:?}", provider.calls()[2].1);
        assert!(last_prompt.contains("first"));
        assert!(!last_prompt.contains("second"));
    }

    #[tokio::test]
    async fn test_all_candidates_exhausted() {
        let provider = Arc::new(
            MockLlmProvider::new("openrouter")
                .with_error("text-a", rate_limited("text-a"))
                .with_error("text-b", rate_limited("text-b"))
                .with_error("text-c", rate_limited("text-c")),
        );
        let engine = engine(
            vec![Step::new(1, 7, 1), Step::new(2, 7, 2)],
            vec![],
            provider.clone(),
        );

        let run = engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap();

        assert_eq!(run.results.len(), 1);
        assert_eq!(
            run.results[0].output,
            "All candidate models unavailable. Last error: text-c is busy"
        );
        assert_eq!(run.results[0].model_label, "Unknown");
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_missing_credential_fails_step_without_fallback() {
        let provider = Arc::new(
            MockLlmProvider::new("openrouter")
                .with_error("text-a", CompletionError::missing_credential("OPENROUTER_API_KEY")),
        );
        let engine = engine(vec![Step::new(1, 7, 1)], vec![], provider.clone());

        let run = engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap();

        assert_eq!(run.results[0].output, "OPENROUTER_API_KEY not configured");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_temperature_dropped_for_unsupported_model() {
        let provider = Arc::new(MockLlmProvider::new("openrouter").with_default_output("ok"));
        let engine = engine(
            vec![
                Step::new(1, 7, 1).with_model(1).with_temperature(0.9),
                Step::new(2, 7, 2).with_model(2).with_temperature(0.4),
            ],
            vec![
                Model::new(1, "Reasoner", "r1").with_supports_temperature(false),
                Model::new(2, "Chat", "c1"),
            ],
            provider.clone(),
        );

        engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap();

        let calls = provider.calls();
        assert_eq!(calls[0].1.temperature, None);
        assert_eq!(calls[1].1.temperature, Some(0.4));
    }

    #[tokio::test]
    async fn test_unknown_model_uses_default_without_temperature() {
        let provider = Arc::new(MockLlmProvider::new("gemini").with_default_output("ok"));
        let engine = PipelineEngine::new(
            authorizer(AccessCheck::admin()),
            Arc::new(
                InMemoryStepRepository::new()
                    .with_step(Step::new(1, 7, 1).with_model(99).with_temperature(0.5)),
            ),
            Arc::new(InMemoryModelRepository::new()),
            provider.clone(),
        )
        .with_resolver(ModelCandidateResolver::direct());

        let run = engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap();

        let calls = provider.calls();
        assert_eq!(calls[0].0, "gemini-2.0-flash");
        assert_eq!(calls[0].1.temperature, None);
        assert_eq!(run.results[0].model_label, "Unknown (gemini-2.0-flash)");
    }

    #[tokio::test]
    async fn test_context_flows_into_later_step() {
        let provider = Arc::new(
            MockLlmProvider::new("openrouter")
                .with_output("text-a", "a cat on a skateboard"),
        );
        let engine = engine(
            vec![
                Step::new(30, 7, 3).with_user_prompt("Describe. ${imageAdditionalContext}"),
                Step::new(40, 7, 4)
                    .with_system_prompt("You are funny")
                    .with_user_prompt("Caption this: ${step3Output} / ${step3Output}"),
            ],
            vec![],
            provider.clone(),
        );

        let run = engine
            .execute(
                &admin(),
                PipelineRequest::new(FlavorId::new(7)).with_image_context("indoors"),
            )
            .await
            .unwrap();

        assert_eq!(run.context.get("step3Output"), Some("a cat on a skateboard"));

        let calls = provider.calls();
        assert_eq!(calls[0].1.messages.len(), 1);
        assert_eq!(calls[0].1.messages[0].content_text(), Some("Describe. indoors"));
        assert_eq!(calls[1].1.system_text(), Some("You are funny"));
        assert_eq!(
            calls[1].1.messages[1].content_text(),
            Some("Caption this: a cat on a skateboard / a cat on a skateboard")
        );
    }

    #[tokio::test]
    async fn test_image_attached_only_to_image_steps() {
        let provider = Arc::new(MockLlmProvider::new("openrouter").with_default_output("ok"));
        let engine = engine(
            vec![
                Step::new(1, 7, 1)
                    .with_modality(InputModality::ImageAndText)
                    .with_user_prompt("look"),
                Step::new(2, 7, 2).with_user_prompt("think"),
            ],
            vec![],
            provider.clone(),
        );

        engine
            .execute(
                &admin(),
                PipelineRequest::new(FlavorId::new(7))
                    .with_image(ImageInput::new("AAAA", "image/png")),
            )
            .await
            .unwrap();

        let calls = provider.calls();
        assert_eq!(calls[0].0, "vision-a");
        assert!(calls[0].1.messages[0].is_multimodal());
        assert_eq!(calls[1].0, "text-a");
        assert!(!calls[1].1.messages[0].is_multimodal());
    }

    #[tokio::test]
    async fn test_image_step_without_image_sends_text() {
        let provider = Arc::new(MockLlmProvider::new("openrouter").with_default_output("ok"));
        let engine = engine(
            vec![Step::new(1, 7, 1).with_modality(InputModality::ImageAndText)],
            vec![],
            provider.clone(),
        );

        engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap();

        let calls = provider.calls();
        assert_eq!(calls[0].0, "vision-a");
        assert!(!calls[0].1.messages[0].is_multimodal());
    }

    #[tokio::test]
    async fn test_caption_output_is_parsed() {
        let provider = Arc::new(
            MockLlmProvider::new("openrouter")
                .with_default_output("```json\n[\"one\", \"two\"]\n```"),
        );
        let engine = engine(vec![Step::new(1, 7, 1)], vec![], provider);

        let run = engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap();

        assert_eq!(
            run.results[0].captions,
            Some(vec!["one".to_string(), "two".to_string()])
        );
    }

    #[tokio::test]
    async fn test_unauthenticated_never_loads_or_calls() {
        let mut steps = MockStepRepository::new();
        steps.expect_list_for_flavor().never();
        let provider = Arc::new(MockLlmProvider::new("openrouter").with_default_output("ok"));

        let engine = PipelineEngine::new(
            authorizer(AccessCheck::anonymous()),
            Arc::new(steps),
            Arc::new(InMemoryModelRepository::new()),
            provider.clone(),
        );

        let err = engine
            .execute(&Session::anonymous(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap_err();

        assert_eq!(err, PipelineError::unauthorized());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let mut steps = MockStepRepository::new();
        steps.expect_list_for_flavor().never();

        let engine = PipelineEngine::new(
            authorizer(AccessCheck::user()),
            Arc::new(steps),
            Arc::new(InMemoryModelRepository::new()),
            Arc::new(MockLlmProvider::new("openrouter")),
        );

        let err = engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap_err();

        assert_eq!(err, PipelineError::forbidden());
    }

    #[tokio::test]
    async fn test_authorizer_failure_is_storage_error() {
        let mut mock = MockSessionAuthorizer::new();
        mock.expect_check()
            .returning(|_| Err(DomainError::storage("profiles unreachable")));

        let engine = PipelineEngine::new(
            Arc::new(mock),
            Arc::new(InMemoryStepRepository::new()),
            Arc::new(InMemoryModelRepository::new()),
            Arc::new(MockLlmProvider::new("openrouter")),
        );

        let err = engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Storage(_)));
    }

    #[tokio::test]
    async fn test_missing_flavor_is_bad_request() {
        let engine = engine(vec![], vec![], Arc::new(MockLlmProvider::new("openrouter")));

        let err = engine
            .execute(&admin(), PipelineRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err, PipelineError::missing_flavor());

        let err = engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(0)))
            .await
            .unwrap_err();
        assert_eq!(err, PipelineError::missing_flavor());
    }

    #[tokio::test]
    async fn test_no_steps_is_not_found() {
        let engine = engine(
            vec![Step::new(1, 8, 1)],
            vec![],
            Arc::new(MockLlmProvider::new("openrouter")),
        );

        let err = engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap_err();

        assert_eq!(err, PipelineError::no_steps());
    }

    #[tokio::test]
    async fn test_step_store_failure_is_not_found() {
        let mut steps = MockStepRepository::new();
        steps
            .expect_list_for_flavor()
            .times(1)
            .returning(|_| Err(DomainError::storage("connection refused")));

        let engine = PipelineEngine::new(
            authorizer(AccessCheck::admin()),
            Arc::new(steps),
            Arc::new(InMemoryModelRepository::new()),
            Arc::new(MockLlmProvider::new("openrouter")),
        );

        let err = engine
            .execute(&admin(), PipelineRequest::new(FlavorId::new(7)))
            .await
            .unwrap_err();

        assert_eq!(err, PipelineError::no_steps());
    }

    #[tokio::test]
    async fn test_describe_returns_ordered_steps() {
        let engine = engine(
            vec![Step::new(2, 7, 2), Step::new(1, 7, 1)],
            vec![],
            Arc::new(MockLlmProvider::new("openrouter")),
        );

        let steps = engine.describe(&admin(), Some(FlavorId::new(7))).await.unwrap();
        let order: Vec<i32> = steps.iter().map(|s| s.order_index).collect();

        assert_eq!(order, vec![1, 2]);
    }
}
