//! Trackor read/update client.
//!
//! ```text
//! GET  {base}/api/v3/trackor_types/{type}/trackors?fields=F1,F2&FILTER=VALUE
//! PUT  {base}/api/v3/trackors/{id}            body: {"FIELD": "VALUE", ...}
//! ```
//!
//! Every failure of a call (transport, non-2xx status, undecodable body) is
//! reported as one [`ModuleError`] carrying the call parameters and the
//! collected error list.

use std::fmt;

use serde_json::Value;
use tracing::debug;
use ureq::Agent;

use ovupload_core::{
    AccessParameters, FieldMap, Filters, ModuleError, Trackor, TrackorConnector, TrackorId,
    TrackorStore, TrackorType,
};

use crate::http::{self, Failure};

/// Builds [`TrackorClient`] handles for one OneVizion instance.
#[derive(Clone)]
pub struct OneVizionConnector {
    agent: Agent,
    base_url: String,
    token: String,
}

impl OneVizionConnector {
    pub fn new(access: &AccessParameters) -> Self {
        Self {
            agent: http::agent(),
            base_url: http::base_url(&access.host),
            token: access.bearer_token(),
        }
    }

    /// Override the `https://{host}` base URL (local instances, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }
}

impl TrackorConnector for OneVizionConnector {
    type Store = TrackorClient;

    fn configure(&self, trackor_type: &TrackorType) -> TrackorClient {
        TrackorClient {
            agent: self.agent.clone(),
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            trackor_type: trackor_type.clone(),
        }
    }
}

/// Immutable client bound to one trackor type.
#[derive(Clone)]
pub struct TrackorClient {
    agent: Agent,
    base_url: String,
    token: String,
    trackor_type: TrackorType,
}

impl TrackorClient {
    pub fn trackor_type(&self) -> &TrackorType {
        &self.trackor_type
    }

    fn read_url(&self) -> String {
        format!(
            "{}/api/v3/trackor_types/{}/trackors",
            self.base_url, self.trackor_type
        )
    }

    fn update_url(&self, id: TrackorId) -> String {
        format!("{}/api/v3/trackors/{id}", self.base_url)
    }

    fn fetch(&self, fields: &[String], filters: &Filters) -> Result<Vec<Trackor>, String> {
        let mut request = self
            .agent
            .get(&self.read_url())
            .set("Authorization", &self.token)
            .set("Accept", "application/json")
            .query("fields", &fields.join(","));
        for (field, value) in filters {
            request = request.query(field, value);
        }

        let response = request.call().map_err(|e| Failure::from(e).describe())?;
        response
            .into_json::<Vec<Trackor>>()
            .map_err(|e| format!("invalid response body: {e}"))
    }

    fn put(&self, id: TrackorId, fields: &FieldMap) -> Result<Value, String> {
        let response = self
            .agent
            .put(&self.update_url(id))
            .set("Authorization", &self.token)
            .set("Accept", "application/json")
            .send_json(fields)
            .map_err(|e| Failure::from(e).describe())?;

        let body = response
            .into_string()
            .map_err(|e| format!("failed to read response body: {e}"))?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| format!("invalid response body: {e}"))
    }
}

impl fmt::Debug for OneVizionConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneVizionConnector")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for TrackorClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackorClient")
            .field("base_url", &self.base_url)
            .field("trackor_type", &self.trackor_type)
            .finish_non_exhaustive()
    }
}

impl TrackorStore for TrackorClient {
    fn read_by_filters(
        &self,
        fields: &[String],
        filters: &Filters,
    ) -> Result<Vec<Trackor>, ModuleError> {
        debug!(trackor_type = %self.trackor_type, ?fields, ?filters, "reading trackors");
        self.fetch(fields, filters).map_err(|error| {
            let errors = vec![error];
            ModuleError::new(
                "Failed to get trackors",
                format!("fields={fields:?}, filters={filters:?}, errors={errors:?}"),
            )
        })
    }

    fn update_by_id(&self, id: TrackorId, fields: &FieldMap) -> Result<Value, ModuleError> {
        debug!(trackor_id = %id, "updating trackor fields");
        self.put(id, fields).map_err(|error| {
            let errors = vec![error];
            ModuleError::new(
                "Failed to update trackor fields",
                format!(
                    "trackor_id={id}, fields={}, errors={errors:?}",
                    Value::Object(fields.clone())
                ),
            )
        })
    }
}
