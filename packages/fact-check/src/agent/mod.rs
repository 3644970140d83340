//! Local agent service client.

mod http;

pub use http::AgentClient;
