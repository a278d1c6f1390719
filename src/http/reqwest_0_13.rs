//! [`HttpClient`] for `reqwest` 0.13.
//!
//! The HAL client follows 302, 303 and 307 itself, so the `reqwest::Client`
//! must not. Use [`client_builder`] or build one with
//! `redirect::Policy::none()`; a client with reqwest's default policy hides
//! those responses from the interpreter and re-sends POST bodies on 307.

use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};

use super::{HttpClient, HttpResponse};

/// Returns a `reqwest::ClientBuilder` that leaves redirects to the HAL client.
///
/// Further settings (timeouts, TLS, proxies) can be applied before `build()`.
#[must_use]
pub fn client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder().redirect(reqwest::redirect::Policy::none())
}

impl HttpClient for reqwest::Client {
    type Response = reqwest::Response;
    type Error = reqwest::Error;

    async fn execute(&self, request: Request<Bytes>) -> Result<Self::Response, Self::Error> {
        let (parts, body) = request.into_parts();
        let reqwest_request = self
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .body(body)
            .build()?;

        reqwest::Client::execute(self, reqwest_request).await
    }
}

impl HttpResponse for reqwest::Response {
    type Error = reqwest::Error;

    fn status(&self) -> StatusCode {
        self.status()
    }

    /// reqwest drops the status line text, so this is always the canonical
    /// reason for the status code. Custom phrases sent by the server are lost.
    fn reason_phrase(&self) -> Option<String> {
        self.status().canonical_reason().map(str::to_owned)
    }

    fn headers(&self) -> &HeaderMap {
        self.headers()
    }

    async fn body(self) -> Result<Bytes, Self::Error> {
        self.bytes().await
    }
}

impl crate::Error for reqwest::Error {
    fn is_retryable(&self) -> bool {
        self.is_connect() || self.is_timeout()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;
    use crate::{HalClient, HalClientConfig, HalClientError};

    /// Serves `response` to the first connection and returns the base URL.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            // Drain the rest of the request so closing does not reset the connection.
            while matches!(socket.read(&mut buf).await, Ok(n) if n > 0) {}
        });
        format!("http://{addr}/")
    }

    fn hal_client(base: &str, max_redirects: usize) -> HalClient<reqwest::Client> {
        let config = HalClientConfig::builder()
            .base_address(base)
            .unwrap()
            .max_redirects(max_redirects)
            .build();
        HalClient::with_config(client_builder().build().unwrap(), config)
    }

    #[tokio::test]
    async fn test_redirect_reaches_the_interpreter() {
        let base = serve_once(
            "HTTP/1.1 307 Temporary Redirect\r\n\
             Location: /next\r\n\
             Content-Length: 0\r\n\
             Connection: close\r\n\r\n",
        )
        .await;

        let err = hal_client(&base, 0)
            .post("orders", &json!({"item": 1}))
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            HalClientError::TooManyRedirects { max_redirects: 0, location } if location == "/next"
        ));
    }

    #[tokio::test]
    async fn test_reason_phrase_is_canonical() {
        let base = serve_once(
            "HTTP/1.1 503 Down For Maintenance\r\n\
             Content-Type: text/plain\r\n\
             Content-Length: 4\r\n\
             Connection: close\r\n\r\n\
             down",
        )
        .await;

        let err = hal_client(&base, 10).get("status").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(err.reason(), Some("Service Unavailable"));
        assert!(err.resource().is_none());
    }
}
