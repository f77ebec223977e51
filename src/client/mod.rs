mod blocking_client;
mod config;

pub use blocking_client::{Client, ClientBuilder};
pub use config::{API_VERSION, BASE_HOST, ClientConfig, DEFAULT_ACTION, SERVICE};
