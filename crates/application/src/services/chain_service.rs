//! Chain service - Runs stages sequentially over a shared history
//!
//! Each stage sees the whole history accumulated so far. Stage `i + 1` is
//! composed only after stage `i` answered; the first failure aborts the run.

use std::{fmt, sync::Arc, time::Instant};

use domain::{Endpoint, History, Stage, UserPrompt};
use tracing::{debug, info, instrument, warn};

use super::{directive_policy::DirectivePolicy, prompt_composer::compose_stage_prompt};
use crate::{
    error::ApplicationError,
    ports::{ChainObserver, GenerationPort},
};

/// Lifecycle of a chain run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainState {
    /// Prompt and stages not yet validated
    AwaitingPrompt,
    /// Dispatching the stage at this 1-based position
    Running(usize),
    /// Every stage answered
    Completed,
    /// A stage failed; remaining stages were skipped
    Failed,
}

impl fmt::Display for ChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingPrompt => write!(f, "awaiting-prompt"),
            Self::Running(position) => write!(f, "running({position})"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A validated prompt plus its ordered, non-empty stage list
///
/// Every stage endpoint is normalized up front, so a plan that exists can be
/// dispatched without further validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainPlan {
    prompt: UserPrompt,
    stages: Vec<Stage>,
    endpoints: Vec<Endpoint>,
}

impl ChainPlan {
    /// Create a plan from already parsed parts
    pub fn new(
        prompt: UserPrompt,
        stages: Vec<Stage>,
        default_endpoint: &str,
    ) -> Result<Self, ApplicationError> {
        if stages.is_empty() {
            return Err(ApplicationError::Configuration(
                "at least one step is required".to_string(),
            ));
        }
        let endpoints = stages
            .iter()
            .map(|stage| Endpoint::normalize(stage.endpoint(), default_endpoint))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            prompt,
            stages,
            endpoints,
        })
    }

    /// Parse the prompt and every descriptor; nothing is dispatched on failure
    pub fn parse<S: AsRef<str>>(
        prompt: &str,
        descriptors: &[S],
        default_endpoint: &str,
    ) -> Result<Self, ApplicationError> {
        let prompt = UserPrompt::new(prompt)?;
        let stages = descriptors
            .iter()
            .map(|raw| Stage::parse(raw.as_ref(), default_endpoint))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(prompt, stages, default_endpoint)
    }

    /// The initial prompt
    pub fn prompt(&self) -> &UserPrompt {
        &self.prompt
    }

    /// Stages in execution order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Stages paired with their normalized endpoints
    pub fn stage_endpoints(&self) -> impl Iterator<Item = (&Stage, &Endpoint)> {
        self.stages.iter().zip(&self.endpoints)
    }
}

/// Service driving a chain of models
pub struct ChainService {
    generation: Arc<dyn GenerationPort>,
    default_endpoint: String,
    directives: DirectivePolicy,
    observer: Option<Arc<dyn ChainObserver>>,
}

impl fmt::Debug for ChainService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainService")
            .field("default_endpoint", &self.default_endpoint)
            .field("directives", &self.directives)
            .finish_non_exhaustive()
    }
}

impl ChainService {
    /// Create a new chain service
    pub fn new(
        generation: Arc<dyn GenerationPort>,
        default_endpoint: impl Into<String>,
        directives: DirectivePolicy,
    ) -> Self {
        Self {
            generation,
            default_endpoint: default_endpoint.into(),
            directives,
            observer: None,
        }
    }

    /// Attach a progress observer
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ChainObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Endpoint used for stages that name none
    pub fn default_endpoint(&self) -> &str {
        &self.default_endpoint
    }

    /// Parse a plan using this service's default endpoint
    pub fn plan<S: AsRef<str>>(
        &self,
        prompt: &str,
        descriptors: &[S],
    ) -> Result<ChainPlan, ApplicationError> {
        ChainPlan::parse(prompt, descriptors, &self.default_endpoint)
    }

    /// Run every stage in order and return the full history
    #[instrument(skip(self, plan), fields(stages = plan.stages().len()))]
    pub async fn run(&self, plan: &ChainPlan) -> Result<History, ApplicationError> {
        let mut history = History::new(plan.prompt());
        let mut state = ChainState::AwaitingPrompt;

        for (offset, (stage, endpoint)) in plan.stage_endpoints().enumerate() {
            let position = offset + 1;
            state = transition(state, ChainState::Running(position));

            if let Err(err) = self.run_stage(position, stage, endpoint, &mut history).await {
                state = transition(state, ChainState::Failed);
                warn!(
                    state = %state,
                    position,
                    model = stage.model(),
                    kind = %err.kind(),
                    error = %err,
                    "Chain aborted"
                );
                return Err(err);
            }
        }

        state = transition(state, ChainState::Completed);
        info!(state = %state, entries = history.len(), "Chain completed");
        Ok(history)
    }

    async fn run_stage(
        &self,
        position: usize,
        stage: &Stage,
        endpoint: &Endpoint,
        history: &mut History,
    ) -> Result<(), ApplicationError> {
        let directive = self.directives.resolve(position, stage.directive());
        let prompt = compose_stage_prompt(history, stage.model(), directive);

        if let Some(observer) = &self.observer {
            observer.stage_started(position, stage, endpoint);
        }

        let start = Instant::now();
        let response = self
            .generation
            .generate(endpoint, stage.model(), &prompt)
            .await?;

        #[allow(clippy::cast_possible_truncation)]
        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(
            position,
            model = stage.model(),
            endpoint = %endpoint,
            has_directive = directive.is_some(),
            prompt_len = prompt.len(),
            response_len = response.len(),
            latency_ms,
            "Stage completed"
        );

        if let Some(observer) = &self.observer {
            observer.stage_completed(position, stage, &response);
        }
        history.append(stage.model(), response);
        Ok(())
    }
}

fn transition(from: ChainState, to: ChainState) -> ChainState {
    debug!(from = %from, to = %to, "Chain state transition");
    to
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use domain::USER_PROMPT_LABEL;

    use super::*;
    use crate::ports::MockGenerationPort;

    const DEFAULT: &str = "http://localhost:11434";

    /// Mock that answers `<model> says <n>` and records every call
    fn recording_mock(calls: Arc<Mutex<Vec<(String, String, String)>>>) -> MockGenerationPort {
        let mut mock = MockGenerationPort::new();
        mock.expect_generate().returning(move |endpoint, model, prompt| {
            let mut calls = calls.lock().unwrap();
            calls.push((endpoint.to_string(), model.to_string(), prompt.to_string()));
            Ok(format!("{model} says {}", calls.len()))
        });
        mock
    }

    fn service(mock: MockGenerationPort, default_directive: &str) -> ChainService {
        ChainService::new(
            Arc::new(mock),
            DEFAULT,
            DirectivePolicy::new(default_directive),
        )
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl ChainObserver for RecordingObserver {
        fn stage_started(&self, position: usize, stage: &Stage, endpoint: &Endpoint) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {position} {} {endpoint}", stage.model()));
        }

        fn stage_completed(&self, position: usize, _stage: &Stage, response: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done {position} {response}"));
        }
    }

    #[test]
    fn plan_requires_at_least_one_stage() {
        let empty: [&str; 0] = [];
        let err = ChainPlan::parse("Hi", &empty, DEFAULT).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Config);
    }

    #[test]
    fn plan_rejects_blank_prompt() {
        let err = ChainPlan::parse("  ", &["modelA"], DEFAULT).unwrap_err();
        assert!(matches!(err, ApplicationError::Domain(_)));
    }

    #[test]
    fn plan_rejects_malformed_descriptor() {
        let err = ChainPlan::parse("Hi", &["modelA", "@host#task"], DEFAULT).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Config);
        assert!(err.to_string().contains("@host#task"));
    }

    #[test]
    fn plan_rejects_endpoint_without_host() {
        let err = ChainPlan::parse("Hi", &["a", "b@http://"], DEFAULT).unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(domain::DomainError::InvalidEndpoint(_))
        ));
        assert_eq!(err.kind(), crate::ErrorKind::Config);
    }

    #[tokio::test]
    async fn bad_endpoint_dispatches_nothing() {
        let mut mock = MockGenerationPort::new();
        mock.expect_generate().times(0);
        let service = service(mock, "");

        assert!(service.plan("Hi", &["a", "b@http://"]).is_err());
    }

    #[test]
    fn plan_pairs_stages_with_normalized_endpoints() {
        let plan = ChainPlan::parse("Hi", &["a@gpu:1//", "b"], DEFAULT).unwrap();
        let endpoints: Vec<&str> = plan.stage_endpoints().map(|(_, e)| e.as_str()).collect();
        assert_eq!(endpoints, vec!["http://gpu:1", DEFAULT]);
    }

    #[test]
    fn service_plan_uses_default_endpoint() {
        let service = service(MockGenerationPort::new(), "");
        let plan = service.plan("Hi", &["modelA"]).unwrap();
        assert_eq!(plan.stages()[0].endpoint(), DEFAULT);
        assert_eq!(plan.prompt().as_str(), "Hi");
    }

    #[tokio::test]
    async fn rest_api_scenario_composes_expected_prompts() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let service = service(recording_mock(Arc::clone(&calls)), "Review and continue");
        let plan = service
            .plan("Design a REST API", &["modelA#Implement it", "modelB"])
            .unwrap();

        let history = service.run(&plan).await.unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, "modelA");
        assert_eq!(
            calls[0].2,
            "### User Prompt\nDesign a REST API\n\n### Task for modelA\nImplement it"
        );
        assert_eq!(calls[1].1, "modelB");
        assert_eq!(
            calls[1].2,
            "### User Prompt\nDesign a REST API\n\n### modelA\nmodelA says 1\n\n### Task for modelB\nReview and continue"
        );

        let labels: Vec<&str> = history.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec![USER_PROMPT_LABEL, "modelA", "modelB"]);
        assert_eq!(history.last().text, "modelB says 2");
    }

    #[tokio::test]
    async fn first_stage_gets_no_default_directive() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let service = service(recording_mock(Arc::clone(&calls)), "Review and continue");
        let plan = service.plan("Hi", &["modelA", "modelB"]).unwrap();

        service.run(&plan).await.unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].2, "### User Prompt\nHi");
        assert!(calls[1].2.ends_with("### Task for modelB\nReview and continue"));
    }

    #[tokio::test]
    async fn empty_default_directive_disables_fallback() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let service = service(recording_mock(Arc::clone(&calls)), "");
        let plan = service.plan("Hi", &["modelA", "modelB", "modelC#Summarize"]).unwrap();

        service.run(&plan).await.unwrap();

        let calls = calls.lock().unwrap();
        assert!(!calls[1].2.contains("Task for"));
        assert!(calls[2].2.ends_with("### Task for modelC\nSummarize"));
    }

    #[tokio::test]
    async fn endpoints_are_normalized_before_dispatch() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let service = service(recording_mock(Arc::clone(&calls)), "");
        let plan = service
            .plan("Hi", &["llama3@localhost:9000/", "qwen"])
            .unwrap();

        service.run(&plan).await.unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].0, "http://localhost:9000");
        assert_eq!(calls[1].0, DEFAULT);
    }

    #[tokio::test]
    async fn failure_aborts_remaining_stages() {
        let mut mock = MockGenerationPort::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok("first".to_string()));
        mock.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, model, _| {
                Err(ApplicationError::Protocol {
                    status: 500,
                    message: format!("{model} on http://x returned HTTP 500: overloaded"),
                })
            });

        let service = service(mock, "");
        let plan = service.plan("Hi", &["a", "b", "c"]).unwrap();

        let err = service.run(&plan).await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Protocol);
        assert!(err.to_string().contains("b on http://x"));
    }

    #[tokio::test]
    async fn empty_response_is_recorded_but_not_forwarded() {
        let mut mock = MockGenerationPort::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(String::new()));
        mock.expect_generate()
            .withf(|_, _, prompt| !prompt.contains("### modelA"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok("ok".to_string()));

        let service = service(mock, "");
        let plan = service.plan("Hi", &["modelA", "modelB"]).unwrap();

        let history = service.run(&plan).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history.entries()[1].text, "");
    }

    #[tokio::test]
    async fn observer_sees_stages_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let observer = Arc::new(RecordingObserver::default());
        let service = service(recording_mock(calls), "")
            .with_observer(Arc::clone(&observer) as Arc<dyn ChainObserver>);
        let plan = service.plan("Hi", &["modelA@gpu:1", "modelB"]).unwrap();

        service.run(&plan).await.unwrap();

        let events = observer.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "start 1 modelA http://gpu:1".to_string(),
                "done 1 modelA says 1".to_string(),
                format!("start 2 modelB {DEFAULT}"),
                "done 2 modelB says 2".to_string(),
            ]
        );
    }

    #[test]
    fn state_display() {
        assert_eq!(ChainState::Running(2).to_string(), "running(2)");
        assert_eq!(ChainState::Completed.to_string(), "completed");
    }

    #[test]
    fn service_debug_hides_port() {
        let service = service(MockGenerationPort::new(), "");
        let debug = format!("{service:?}");
        assert!(debug.contains("ChainService"));
        assert!(debug.contains("default_endpoint"));
    }
}
