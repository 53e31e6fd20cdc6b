//! Scripted transport for unit tests

use super::request::{ApiRequest, ApiResponse};
use super::session::{ClientCredentials, EpicSession};
use super::transport::EpicTransport;
use crate::errors::EpicResult;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

type Matcher = Box<dyn Fn(&ApiRequest) -> bool + Send + Sync>;
type Responder = Box<dyn Fn(&ApiRequest) -> EpicResult<ApiResponse> + Send + Sync>;

/// Records every request and answers from the first matching route.
/// Unmatched requests get a 404.
pub struct MockTransport {
    routes: Mutex<Vec<(Matcher, Responder)>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            routes: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn route<M, R>(&self, matcher: M, responder: R)
    where
        M: Fn(&ApiRequest) -> bool + Send + Sync + 'static,
        R: Fn(&ApiRequest) -> EpicResult<ApiResponse> + Send + Sync + 'static,
    {
        self.routes
            .lock()
            .push((Box::new(matcher), Box::new(responder)));
    }

    pub fn on_url<R>(&self, fragment: &'static str, responder: R)
    where
        R: Fn(&ApiRequest) -> ApiResponse + Send + Sync + 'static,
    {
        self.route(
            move |req| req.url.contains(fragment),
            move |req| Ok(responder(req)),
        );
    }

    pub fn on_form<R>(&self, key: &'static str, value: &'static str, responder: R)
    where
        R: Fn(&ApiRequest) -> ApiResponse + Send + Sync + 'static,
    {
        self.route(
            move |req| req.form_value(key) == Some(value),
            move |req| Ok(responder(req)),
        );
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().clone()
    }

    pub fn count_url(&self, fragment: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|req| req.url.contains(fragment))
            .count()
    }

    pub fn count_form(&self, key: &str, value: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|req| req.form_value(key) == Some(value))
            .count()
    }

    /// Session over this transport with dummy credentials
    pub fn session(self: &Arc<Self>) -> EpicSession {
        EpicSession::open(
            "test",
            self.clone(),
            ClientCredentials::from_client_secret("switch", "secret"),
            ClientCredentials::from_client_secret("ios", "secret"),
        )
    }
}

#[async_trait]
impl EpicTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> EpicResult<ApiResponse> {
        self.calls.lock().push(request.clone());

        let routes = self.routes.lock();
        for (matcher, responder) in routes.iter() {
            if matcher(&request) {
                return responder(&request);
            }
        }
        Ok(ApiResponse::new(404, r#"{"errorCode":"mock.no_route"}"#))
    }
}
