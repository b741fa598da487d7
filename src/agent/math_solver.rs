//! Math solver agent
//!
//! Forwards a query and a session id into a runner and relays the text of
//! the last produced event.

use std::sync::Arc;

use futures::stream::{self, Stream, TryStreamExt};
use tracing::info;

use crate::agent::llm_agent::LlmAgent;
use crate::agent::runner::{AgentRunner, Runner};
use crate::core::{Config, Content, Event, Result, TaskUpdate};
use crate::llm::LlmModel;
use crate::services::{SessionState, Services};

/// Prefix of the streamed completion message
pub const RESULT_PREFIX: &str = "The result is: ";

/// Newline-joined text of the last event, or empty if there is none
pub fn final_text(events: &[Event]) -> String {
    events.last().map(Event::text).unwrap_or_default()
}

/// The single completion update streamed for an invoke result
pub fn completion_update(result: &str) -> TaskUpdate {
    TaskUpdate {
        is_task_complete: true,
        content: format!("{}{}", RESULT_PREFIX, result),
    }
}

/// Agent that solves mathematical expressions
pub struct MathSolverAgent {
    user_id: String,
    runner: Arc<dyn AgentRunner>,
}

impl MathSolverAgent {
    /// Create an agent with loaded configuration and in-memory services
    pub fn new(model: Arc<dyn LlmModel>) -> Self {
        Self::with_config(Config::load(), model, Services::in_memory())
    }

    /// Create an agent with explicit configuration and services
    pub fn with_config(config: Config, model: Arc<dyn LlmModel>, services: Services) -> Self {
        let agent = LlmAgent::from_config(&config.agent);
        let runner = Runner::new(agent.name().to_string(), agent, model, services);
        Self::with_runner(config.session.user_id, Arc::new(runner))
    }

    /// Create an agent driven by any runner
    pub fn with_runner(user_id: impl Into<String>, runner: Arc<dyn AgentRunner>) -> Self {
        Self {
            user_id: user_id.into(),
            runner,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn app_name(&self) -> &str {
        self.runner.app_name()
    }

    /// Run the query in the given session and return the reply text
    ///
    /// The session is created with empty state on first use. Errors from the
    /// session service, the runner or the model are returned unchanged.
    pub async fn invoke(&self, query: &str, session_id: &str) -> Result<String> {
        let app_name = self.runner.app_name();
        let sessions = self.runner.session_service();

        let session = match sessions
            .get_session(app_name, &self.user_id, session_id)
            .await?
        {
            Some(session) => session,
            None => {
                info!("Creating session {} for {}", session_id, self.user_id);
                sessions
                    .create_session(app_name, &self.user_id, SessionState::new(), Some(session_id))
                    .await?
            }
        };

        let events: Vec<Event> = self
            .runner
            .run(&self.user_id, &session.id, Content::user_text(query))
            .try_collect()
            .await?;

        Ok(final_text(&events))
    }

    /// Stream the result as exactly one completed update
    ///
    /// No partial output is produced; an invoke error becomes the only item.
    pub fn stream<'a>(
        &'a self,
        query: &'a str,
        session_id: &'a str,
    ) -> impl Stream<Item = Result<TaskUpdate>> + Send + 'a {
        stream::once(async move {
            let result = self.invoke(query, session_id).await?;
            Ok(completion_update(&result))
        })
    }
}
