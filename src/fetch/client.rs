use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a prepared HTTP request. Wrappers can adjust the request
/// (headers, query parameters) before delegating to an inner client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
