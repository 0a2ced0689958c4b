use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;

/// Upper bound for a single HTTP exchange. The aggregator applies its own,
/// usually shorter, per-provider deadline on top of this.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(CLIENT_TIMEOUT)
        .user_agent(concat!("route-quotes/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Send `request` and decode a JSON body. Any non-2xx status is an error.
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ProviderError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ProviderError::Malformed(e.to_string()))
}

/// Serve `router` on an ephemeral local port and return its base URL.
#[cfg(test)]
pub(crate) async fn serve_locally(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
