use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use wecom_core::Transport;
use wecom_domain::{NotifyError, Result as DomainResult, TransportResponse};

type Scripted = DomainResult<TransportResponse>;

/// A request as the transport saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub content_type: Option<String>,
}

impl RecordedRequest {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_slice(self.body.as_deref().unwrap_or_default()).unwrap()
    }
}

/// Transport answering from per-method FIFO scripts.
///
/// GETs go to the token endpoint and POSTs to the send endpoint, so one queue
/// per method is enough. Running out of script is a test bug and fails the
/// request with a transport error.
#[derive(Default)]
pub struct MockTransport {
    gets: Mutex<VecDeque<Scripted>>,
    posts: Mutex<VecDeque<Scripted>>,
    get_log: Mutex<Vec<RecordedRequest>>,
    post_log: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(self, response: TransportResponse) -> Self {
        self.gets.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn on_get_error(self, error: NotifyError) -> Self {
        self.gets.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn on_post(self, response: TransportResponse) -> Self {
        self.posts.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn on_post_error(self, error: NotifyError) -> Self {
        self.posts.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn get_count(&self) -> usize {
        self.get_log.lock().unwrap().len()
    }

    pub fn post_count(&self) -> usize {
        self.post_log.lock().unwrap().len()
    }

    pub fn gets(&self) -> Vec<RecordedRequest> {
        self.get_log.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<RecordedRequest> {
        self.post_log.lock().unwrap().clone()
    }
}

fn owned_query(query: &[(&str, &str)]) -> Vec<(String, String)> {
    query.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
}

fn next(queue: &Mutex<VecDeque<Scripted>>, method: &str, url: &str) -> Scripted {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(NotifyError::Transport(format!("unscripted {method} {url}"))))
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> DomainResult<TransportResponse> {
        self.get_log.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            query: owned_query(query),
            body: None,
            content_type: None,
        });
        next(&self.gets, "GET", url)
    }

    async fn post(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: Vec<u8>,
        content_type: &str,
    ) -> DomainResult<TransportResponse> {
        self.post_log.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            query: owned_query(query),
            body: Some(body),
            content_type: Some(content_type.to_string()),
        });
        next(&self.posts, "POST", url)
    }
}
