use std::sync::Arc;
use tracing::{error, info};

use crate::client::{TextGenerator, UpstreamClient};
use crate::config::BridgeConfig;
use crate::errors::BridgeResult;

/// Reply given for an empty or whitespace-only query; no request is made.
pub const EMPTY_QUERY_MESSAGE: &str = "Please type a question and try again.";

/// Turns a user query into a display-ready answer.
///
/// Stateless: every call issues at most one upstream request and keeps nothing afterwards.
#[derive(Clone)]
pub struct Bridge {
    generator: Arc<dyn TextGenerator>,
}

impl Bridge {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Builds a bridge backed by the HTTP upstream described by `config`
    pub fn from_config(config: BridgeConfig) -> BridgeResult<Self> {
        let client = UpstreamClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Answers `query`, converting every failure into a user-safe message.
    pub async fn answer(&self, query: &str) -> String {
        if query.trim().is_empty() {
            return EMPTY_QUERY_MESSAGE.to_string();
        }

        match self.try_answer(query).await {
            Ok(answer) => answer,
            Err(e) => e.user_message(),
        }
    }

    /// Answers `query`, returning the typed error on failure.
    ///
    /// Empty queries are not short-circuited here.
    pub async fn try_answer(&self, query: &str) -> BridgeResult<String> {
        info!(
            model = self.generator.model_name(),
            query_len = query.len(),
            "Answering query"
        );
        match self.generator.generate(query).await {
            Ok(answer) => {
                info!(answer_len = answer.len(), "Answer received");
                Ok(answer)
            }
            Err(e) => {
                error!(error = %e, "Failed to answer query");
                Err(e)
            }
        }
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }
}
