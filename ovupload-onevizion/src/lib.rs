//! # ovupload-onevizion
//!
//! OneVizion REST v3 adapters: the trackor read/update client and the
//! integration-run log sink. Both authenticate with an access/secret key
//! token built from [`ovupload_core::AccessParameters`].

mod http;
pub mod integration_log;
pub mod trackor;

pub use integration_log::IntegrationLog;
pub use trackor::{OneVizionConnector, TrackorClient};
