//! Scripted in-memory transport.
//!
//! Routes are matched in registration order by method and URL. A pattern
//! ending in `*` matches by prefix, anything else must match exactly. Each
//! route replays its scripted replies in order and keeps repeating the last
//! one. Every request is recorded so tests can count calls.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{FetchError, HttpTransport, Method, OutboundRequest, Response};

type Reply = Result<Response, FetchError>;
type Responder = Box<dyn Fn(&OutboundRequest) -> Reply + Send + Sync>;

enum Script {
    Replies(VecDeque<Reply>),
    Responder(Responder),
}

struct MockRoute {
    method: Method,
    pattern: String,
    script: Script,
}

impl MockRoute {
    fn matches(&self, request: &OutboundRequest) -> bool {
        if self.method != request.method {
            return false;
        }
        match self.pattern.strip_suffix('*') {
            Some(prefix) => request.url.starts_with(prefix),
            None => request.url == self.pattern,
        }
    }

    fn reply(&mut self, request: &OutboundRequest) -> Reply {
        match &mut self.script {
            Script::Replies(replies) => {
                if replies.len() > 1 {
                    replies
                        .pop_front()
                        .unwrap_or_else(|| Err(FetchError::Connection("empty script".to_string())))
                } else {
                    replies
                        .front()
                        .cloned()
                        .unwrap_or_else(|| Err(FetchError::Connection("empty script".to_string())))
                }
            }
            Script::Responder(responder) => responder(request),
        }
    }
}

#[derive(Default)]
struct MockState {
    routes: Vec<MockRoute>,
    requests: Vec<OutboundRequest>,
}

/// In-memory [`HttpTransport`] for tests and offline runs.
///
/// Cloning shares routes and the request log.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route with a single reply.
    pub fn on(&self, method: Method, pattern: &str, reply: Reply) -> &Self {
        self.on_sequence(method, pattern, vec![reply])
    }

    /// Register a route replaying `replies` in order.
    pub fn on_sequence(&self, method: Method, pattern: &str, replies: Vec<Reply>) -> &Self {
        self.push(method, pattern, Script::Replies(replies.into()))
    }

    /// Register a route computed from the request.
    pub fn respond_with<F>(&self, method: Method, pattern: &str, responder: F) -> &Self
    where
        F: Fn(&OutboundRequest) -> Reply + Send + Sync + 'static,
    {
        self.push(method, pattern, Script::Responder(Box::new(responder)))
    }

    fn push(&self, method: Method, pattern: &str, script: Script) -> &Self {
        if let Ok(mut state) = self.state.lock() {
            state.routes.push(MockRoute {
                method,
                pattern: pattern.to_string(),
                script,
            });
        }
        self
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.state
            .lock()
            .map(|s| s.requests.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().map(|s| s.requests.len()).unwrap_or(0)
    }

    /// Requests whose URL starts with `prefix`.
    pub fn count_matching(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.url.starts_with(prefix))
            .count()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: OutboundRequest) -> Result<Response, FetchError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| FetchError::Connection("mock transport poisoned".to_string()))?;
        state.requests.push(request.clone());

        match state.routes.iter_mut().find(|r| r.matches(&request)) {
            Some(route) => route.reply(&request),
            None => Err(FetchError::Connection(format!(
                "no mock route for {} {}",
                request.method.as_str(),
                request.url
            ))),
        }
    }
}
