//! Brokerage client: the collaborator port and its REST adapter.

mod api;
mod config;
mod http;

pub use api::BrokerageApi;
#[cfg(test)]
pub use api::MockBrokerageApi;
pub use config::ClientConfig;
pub use http::RestClient;
