//! HTTP plumbing shared by the trackor client and the integration log.

use std::time::Duration;

use ureq::{Agent, AgentBuilder};

/// Per-request timeout applied to every OneVizion call.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Longest response body excerpt kept in an error message.
const MAX_BODY_EXCERPT: usize = 512;

pub(crate) fn agent() -> Agent {
    AgentBuilder::new().timeout(REQUEST_TIMEOUT).build()
}

/// `https://{host}` for a protocol-stripped host.
pub(crate) fn base_url(host: &str) -> String {
    format!("https://{host}")
}

/// A failed call, split into status and readable detail.
pub(crate) struct Failure {
    pub status: Option<u16>,
    pub detail: String,
}

impl From<ureq::Error> for Failure {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, response) => {
                let body = response.into_string().unwrap_or_default();
                Failure {
                    status: Some(code),
                    detail: excerpt(body.trim()).to_owned(),
                }
            }
            ureq::Error::Transport(transport) => Failure {
                status: None,
                detail: transport.to_string(),
            },
        }
    }
}

impl Failure {
    /// One entry of a service error list.
    pub fn describe(&self) -> String {
        match self.status {
            Some(code) => format!("HTTP {code}: {}", self.detail),
            None => self.detail.clone(),
        }
    }
}

fn excerpt(body: &str) -> &str {
    if body.len() <= MAX_BODY_EXCERPT {
        return body;
    }
    let mut end = MAX_BODY_EXCERPT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
