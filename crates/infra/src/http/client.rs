use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as ReqwestClient, RequestBuilder};
use tracing::debug;
use wecom_core::Transport;
use wecom_domain::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use wecom_domain::{NotifyConfig, NotifyError, TransportResponse};

use crate::errors::InfraError;

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed [`Transport`].
///
/// Every call is a single attempt. Retrying is decided above the transport,
/// where the application error codes are known.
#[derive(Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
}

impl HttpTransport {
    /// Start building a new HTTP transport.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, NotifyError> {
        Self::builder().build()
    }

    /// Transport honouring the request timeout from `config`.
    pub fn from_config(config: &NotifyConfig) -> Result<Self, NotifyError> {
        Self::builder().with_config(config).build()
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<TransportResponse, NotifyError> {
        let request = builder.build().map_err(InfraError::from)?;

        // The query string holds the secret or the token, so only the path is logged.
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "sending HTTP request");

        let response = self.client.execute(request).await.map_err(|err| {
            let mapped = NotifyError::from(InfraError::from(err));
            debug!(%method, %path, error = %mapped, "HTTP request failed");
            mapped
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(InfraError::from)?;
        debug!(%method, %path, %status, bytes = body.len(), "received HTTP response");

        Ok(TransportResponse::new(status.as_u16(), body.to_vec()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<TransportResponse, NotifyError> {
        self.execute(self.client.get(url).query(query)).await
    }

    async fn post(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<TransportResponse, NotifyError> {
        let builder =
            self.client.post(url).query(query).header(CONTENT_TYPE, content_type).body(body);
        self.execute(builder).await
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    no_proxy: bool,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: None,
            no_proxy: false,
        }
    }
}

impl HttpTransportBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Apply the transport settings carried by `config`.
    pub fn with_config(self, config: &NotifyConfig) -> Self {
        self.timeout(Duration::from_secs(config.request_timeout_secs))
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Ignore proxy settings from the environment.
    pub fn no_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    pub fn build(self) -> Result<HttpTransport, NotifyError> {
        let agent = self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let mut builder = ReqwestClient::builder().timeout(self.timeout).user_agent(agent);

        if self.no_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build().map_err(InfraError::from)?;

        Ok(HttpTransport { client })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn transport() -> HttpTransport {
        HttpTransport::builder()
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .expect("http transport")
    }

    #[tokio::test]
    async fn get_sends_query_and_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/gettoken"))
            .and(query_param("corpid", "ww1"))
            .and(query_param("corpsecret", "a b&c"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"errcode":0}"#))
            .expect(1)
            .mount(&server)
            .await;

        let response = transport()
            .get(
                &format!("{}/cgi-bin/gettoken", server.uri()),
                &[("corpid", "ww1"), ("corpsecret", "a b&c")],
            )
            .await
            .expect("response");

        assert_eq!(response.status, 200);
        assert_eq!(response.body, br#"{"errcode":0}"#);
    }

    #[tokio::test]
    async fn post_sends_body_with_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cgi-bin/message/send"))
            .and(query_param("access_token", "tok"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({ "touser": "@all" })))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"errcode":0}"#))
            .expect(1)
            .mount(&server)
            .await;

        let response = transport()
            .post(
                &format!("{}/cgi-bin/message/send", server.uri()),
                &[("access_token", "tok")],
                br#"{"touser":"@all"}"#.to_vec(),
                "application/json",
            )
            .await
            .expect("response");

        assert!(response.is_success());
    }

    #[tokio::test]
    async fn non_success_status_is_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&server)
            .await;

        let response = transport().get(&server.uri(), &[]).await.expect("response");

        assert_eq!(response.status, 503);
        assert!(!response.is_success());
        assert_eq!(response.body_excerpt(), "maintenance");
    }

    #[tokio::test]
    async fn does_not_retry_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        transport().post(&server.uri(), &[], Vec::new(), "application/json").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn request_timeout_comes_from_config() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let config = NotifyConfig::new(wecom_domain::ClientIdentity::new("ww1", "s", 1))
            .with_request_timeout_secs(1);
        let transport = HttpTransport::builder().with_config(&config).no_proxy().build().unwrap();

        let err = transport.get(&server.uri(), &[]).await.unwrap_err();

        assert!(matches!(err, NotifyError::Transport(ref msg) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn sets_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "notify-test/1.0"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let transport =
            HttpTransport::builder().user_agent("notify-test/1.0").no_proxy().build().unwrap();
        let response = transport.get(&server.uri(), &[]).await.unwrap();

        assert_eq!(response.status, 200);
    }
}
