//! Integration-run log sink.
//!
//! Events at or above the configured level are posted to
//! `{base}/api/v3/integrations/runs/{process_id}/logs`. Every event is also
//! emitted through `tracing`, whether or not it passes the threshold.

use std::fmt;

use serde_json::json;
use ureq::Agent;

use ovupload_core::{log, AccessParameters, LogError, LogLevel, ModuleLog};

use crate::http::{self, Failure};

#[derive(Clone)]
pub struct IntegrationLog {
    agent: Agent,
    base_url: String,
    token: String,
    process_id: i64,
    log_level: LogLevel,
}

impl IntegrationLog {
    pub fn new(access: &AccessParameters, process_id: i64, log_level: LogLevel) -> Self {
        Self {
            agent: http::agent(),
            base_url: http::base_url(&access.host),
            token: access.bearer_token(),
            process_id,
            log_level,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    fn logs_url(&self) -> String {
        format!(
            "{}/api/v3/integrations/runs/{}/logs",
            self.base_url, self.process_id
        )
    }
}

impl fmt::Debug for IntegrationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationLog")
            .field("base_url", &self.base_url)
            .field("process_id", &self.process_id)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

impl ModuleLog for IntegrationLog {
    fn add(&self, level: LogLevel, message: &str, description: &str) -> Result<(), LogError> {
        log::emit(level, message, description);
        if !self.log_level.allows(level) {
            return Ok(());
        }

        let body = json!({
            "message": message,
            "description": description,
            "log_level_name": level.to_string(),
        });
        self.agent
            .post(&self.logs_url())
            .set("Authorization", &self.token)
            .set("Accept", "application/json")
            .send_json(body)
            .map_err(|e| {
                let failure = Failure::from(e);
                match failure.status {
                    Some(status) => LogError::Status {
                        status,
                        body: failure.detail,
                    },
                    None => LogError::Transport(failure.detail),
                }
            })?;
        Ok(())
    }
}
