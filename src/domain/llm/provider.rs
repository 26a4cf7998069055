use async_trait::async_trait;
use std::fmt::Debug;

use super::{CompletionError, LlmRequest, LlmResponse};

/// Trait for LLM completion providers (OpenRouter, OpenAI, Gemini, ...)
///
/// One call is one attempt against one candidate model. Fallback across
/// candidates is the caller's concern.
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request to `model`
    async fn chat(&self, model: &str, request: &LlmRequest)
    -> Result<LlmResponse, CompletionError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted provider: each model answers with a fixed outcome, calls are recorded
    #[derive(Debug)]
    pub struct MockLlmProvider {
        name: &'static str,
        outcomes: Mutex<HashMap<String, Result<String, CompletionError>>>,
        default_output: Option<String>,
        calls: Mutex<Vec<(String, LlmRequest)>>,
    }

    impl MockLlmProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                outcomes: Mutex::new(HashMap::new()),
                default_output: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Answer every unscripted model with `output`
        pub fn with_default_output(mut self, output: impl Into<String>) -> Self {
            self.default_output = Some(output.into());
            self
        }

        pub fn with_output(self, model: impl Into<String>, output: impl Into<String>) -> Self {
            self.outcomes
                .lock()
                .unwrap()
                .insert(model.into(), Ok(output.into()));
            self
        }

        pub fn with_error(self, model: impl Into<String>, error: CompletionError) -> Self {
            self.outcomes.lock().unwrap().insert(model.into(), Err(error));
            self
        }

        pub fn calls(&self) -> Vec<(String, LlmRequest)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn chat(
            &self,
            model: &str,
            request: &LlmRequest,
        ) -> Result<LlmResponse, CompletionError> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), request.clone()));

            let scripted = self.outcomes.lock().unwrap().get(model).cloned();

            match scripted {
                Some(Ok(output)) => Ok(LlmResponse::new(output, model)),
                Some(Err(error)) => Err(error),
                None => match &self.default_output {
                    Some(output) => Ok(LlmResponse::new(output.clone(), model)),
                    None => Err(CompletionError::from_status(
                        self.name,
                        model,
                        404,
                        format!("No mock outcome for {}", model),
                    )),
                },
            }
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}
