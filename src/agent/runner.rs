//! Runner
//!
//! Drives one agent turn: records the user message in the session, sends the
//! instruction plus session history to the model and records the reply.

use std::pin::Pin;
use std::sync::Arc;

use futures::stream::{self, Stream};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::agent::llm_agent::LlmAgent;
use crate::core::{Content, Event, MathSolverError, Result};
use crate::llm::{LlmModel, LlmRequest};
use crate::services::{ArtifactService, MemoryService, SessionService, Services};

/// Type alias for a boxed stream of runner events
pub type EventStream = Pin<Box<dyn Stream<Item = Result<Event>> + Send>>;

/// Anything that can run an agent turn against a session
pub trait AgentRunner: Send + Sync {
    /// Application name sessions are stored under
    fn app_name(&self) -> &str;

    /// Session service the runner reads and writes
    fn session_service(&self) -> Arc<dyn SessionService>;

    /// Run one turn; the session must already exist
    ///
    /// A failed turn leaves the session history untouched.
    fn run(&self, user_id: &str, session_id: &str, new_message: Content) -> EventStream;
}

/// Runner bound to one agent, one model and a set of services
pub struct Runner {
    app_name: String,
    agent: Arc<LlmAgent>,
    model: Arc<dyn LlmModel>,
    services: Services,
}

impl Runner {
    pub fn new(
        app_name: impl Into<String>,
        agent: LlmAgent,
        model: Arc<dyn LlmModel>,
        services: Services,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            agent: Arc::new(agent),
            model,
            services,
        }
    }

    pub fn agent(&self) -> &LlmAgent {
        &self.agent
    }

    pub fn memory_service(&self) -> Arc<dyn MemoryService> {
        self.services.memory.clone()
    }

    pub fn artifact_service(&self) -> Arc<dyn ArtifactService> {
        self.services.artifacts.clone()
    }

    /// Archive a session into the memory service
    pub async fn add_session_to_memory(&self, user_id: &str, session_id: &str) -> Result<()> {
        let session = self
            .services
            .sessions
            .get_session(&self.app_name, user_id, session_id)
            .await?
            .ok_or_else(|| MathSolverError::session_not_found(&self.app_name, user_id, session_id))?;

        self.services.memory.add_session_to_memory(&session).await
    }
}

impl AgentRunner for Runner {
    fn app_name(&self) -> &str {
        &self.app_name
    }

    fn session_service(&self) -> Arc<dyn SessionService> {
        self.services.sessions.clone()
    }

    fn run(&self, user_id: &str, session_id: &str, new_message: Content) -> EventStream {
        let app_name = self.app_name.clone();
        let user_id = user_id.to_string();
        let session_id = session_id.to_string();
        let agent = self.agent.clone();
        let model = self.model.clone();
        let sessions = self.services.sessions.clone();

        Box::pin(stream::once(async move {
            let session = sessions
                .get_session(&app_name, &user_id, &session_id)
                .await?
                .ok_or_else(|| {
                    MathSolverError::session_not_found(&app_name, &user_id, &session_id)
                })?;

            let invocation_id = format!("e-{}", Uuid::new_v4());
            debug!(
                "Running {} for session {} (invocation {})",
                agent.name(),
                session.id,
                invocation_id
            );

            let user_event = Event::new(&invocation_id, "user", Some(new_message.clone()));

            let mut contents: Vec<Content> = session
                .events
                .iter()
                .filter_map(|e| e.content.clone())
                .collect();
            contents.push(new_message);

            let instruction = agent.instruction();
            let request = LlmRequest {
                model: agent.model().to_string(),
                system_instruction: (!instruction.is_empty()).then(|| instruction.to_string()),
                contents,
            };

            let response = model.generate(request).await?;
            if response
                .content
                .as_ref()
                .map_or(true, |c| c.joined_text().is_empty())
            {
                warn!("Model {} returned no text", response.model);
            }

            // The turn is recorded only once the model has answered
            sessions
                .append_event(&app_name, &user_id, &session_id, user_event)
                .await?;

            let event = Event::new(invocation_id, agent.name(), response.content);
            sessions
                .append_event(&app_name, &user_id, &session_id, event)
                .await
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Role;
    use crate::llm::LlmResponse;
    use crate::services::SessionState;
    use async_trait::async_trait;
    use futures::TryStreamExt;
    use std::sync::Mutex;

    /// Records requests and answers with the number of contents seen
    #[derive(Default)]
    struct CountingModel {
        requests: Mutex<Vec<LlmRequest>>,
    }

    #[async_trait]
    impl LlmModel for CountingModel {
        async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
            let seen = request.contents.len();
            self.requests.lock().unwrap().push(request);
            Ok(LlmResponse::text("test-model", seen.to_string()))
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    struct FailingModel;

    #[async_trait]
    impl LlmModel for FailingModel {
        async fn generate(&self, _request: LlmRequest) -> Result<LlmResponse> {
            Err(MathSolverError::model("unavailable"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn runner(model: Arc<CountingModel>) -> Runner {
        let agent = LlmAgent::new("m", "maths_solver_agent", "d", "Reply with the calculated output.");
        Runner::new("maths_solver_agent", agent, model, Services::in_memory())
    }

    #[tokio::test]
    async fn test_run_missing_session_fails() {
        let runner = runner(Arc::new(CountingModel::default()));
        let result: Result<Vec<Event>> = runner
            .run("user", "nope", Content::user_text("2+2"))
            .try_collect()
            .await;
        assert!(matches!(result, Err(MathSolverError::SessionNotFound { .. })));
    }

    #[tokio::test]
    async fn test_run_threads_history_and_instruction() {
        let model = Arc::new(CountingModel::default());
        let runner = runner(model.clone());
        runner
            .session_service()
            .create_session("maths_solver_agent", "user", SessionState::new(), Some("s1"))
            .await
            .unwrap();

        let first: Vec<Event> = runner
            .run("user", "s1", Content::user_text("2+2"))
            .try_collect()
            .await
            .unwrap();
        let second: Vec<Event> = runner
            .run("user", "s1", Content::user_text("times 3"))
            .try_collect()
            .await
            .unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].author, "maths_solver_agent");
        assert_eq!(first[0].text(), "1");
        // user, model, user
        assert_eq!(second[0].text(), "3");

        let requests = model.requests.lock().unwrap();
        assert_eq!(
            requests[1].system_instruction.as_deref(),
            Some("Reply with the calculated output.")
        );
        assert_eq!(requests[1].contents[1].role, Role::Model);
        assert_eq!(
            requests[1].last_user_content().unwrap().joined_text(),
            "times 3"
        );

        let session = runner
            .session_service()
            .get_session("maths_solver_agent", "user", "s1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.events.len(), 4);
        assert_eq!(session.events[0].invocation_id, session.events[1].invocation_id);
    }

    #[tokio::test]
    async fn test_failed_turn_leaves_history_untouched() {
        let agent = LlmAgent::new("m", "maths_solver_agent", "d", "i");
        let runner = Runner::new(
            "maths_solver_agent",
            agent,
            Arc::new(FailingModel),
            Services::in_memory(),
        );
        runner
            .session_service()
            .create_session("maths_solver_agent", "user", SessionState::new(), Some("s1"))
            .await
            .unwrap();

        let result: Result<Vec<Event>> = runner
            .run("user", "s1", Content::user_text("2+2"))
            .try_collect()
            .await;
        assert!(matches!(result, Err(MathSolverError::Model(_))));

        let session = runner
            .session_service()
            .get_session("maths_solver_agent", "user", "s1")
            .await
            .unwrap()
            .unwrap();
        assert!(session.events.is_empty());
    }

    #[tokio::test]
    async fn test_add_session_to_memory() {
        let runner = runner(Arc::new(CountingModel::default()));
        runner
            .session_service()
            .create_session("maths_solver_agent", "user", SessionState::new(), Some("s1"))
            .await
            .unwrap();
        let _: Vec<Event> = runner
            .run("user", "s1", Content::user_text("square of nine"))
            .try_collect()
            .await
            .unwrap();

        runner.add_session_to_memory("user", "s1").await.unwrap();
        let hits = runner
            .memory_service()
            .search_memory("maths_solver_agent", "user", "nine")
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        let err = runner.add_session_to_memory("user", "s2").await.unwrap_err();
        assert!(matches!(err, MathSolverError::SessionNotFound { .. }));
    }
}
