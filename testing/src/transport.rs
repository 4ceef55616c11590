//! Scripted [`Transport`] and a fake token issuer.

use eventhub_core::{HttpRequest, HttpResponse, Method, StatusCode, Transport, TransportError, endpoints};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Computes the response for one recorded request.
pub type Handler = Arc<dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync>;

struct Route {
    method: Option<Method>,
    path: String,
    handler: Handler,
}

#[derive(Default)]
struct Script {
    routes: Vec<Route>,
    delays: HashMap<String, Duration>,
    calls: Vec<HttpRequest>,
}

impl Script {
    // Later registrations override earlier ones.
    fn handler_for(&self, request: &HttpRequest) -> Option<Handler> {
        self.routes
            .iter()
            .rev()
            .find(|route| {
                route.path == request.path
                    && route.method.as_ref().is_none_or(|m| *m == request.method)
            })
            .map(|route| Arc::clone(&route.handler))
    }
}

/// In-memory transport answering from per-path handlers.
///
/// Every request is logged before it is answered, so the log reflects send
/// order even when responses are delayed. Paths without a handler answer 404.
///
/// # Example
///
/// ```
/// use eventhub_testing::MockTransport;
/// use eventhub_core::{HttpRequest, StatusCode, Transport};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let transport = MockTransport::new();
/// transport.respond("/v1/eventos/", StatusCode::OK, json!({ "count": 0 }));
///
/// let response = transport.send(HttpRequest::get("/v1/eventos/")).await.unwrap();
/// assert_eq!(response.status, StatusCode::OK);
/// assert_eq!(transport.call_count("/v1/eventos/"), 1);
/// # });
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<Script>>,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let script = self.lock();
        f.debug_struct("MockTransport")
            .field("routes", &script.routes.len())
            .field("calls", &script.calls.len())
            .finish()
    }
}

impl MockTransport {
    /// Transport with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn route(&self, method: Option<Method>, path: &str, handler: Handler) -> &Self {
        self.lock().routes.push(Route {
            method,
            path: path.to_string(),
            handler,
        });
        self
    }

    /// Answer every request to `path` with `handler`.
    pub fn on<F>(&self, path: &str, handler: F) -> &Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        self.route(None, path, Arc::new(handler))
    }

    /// Answer `method path` with `handler`.
    pub fn on_method<F>(&self, method: Method, path: &str, handler: F) -> &Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        self.route(Some(method), path, Arc::new(handler))
    }

    /// Answer every request to `path` with a fixed JSON response.
    pub fn respond(&self, path: &str, status: StatusCode, body: Value) -> &Self {
        let response = HttpResponse::json_body(status, &body);
        self.on(path, move |_| Ok(response.clone()))
    }

    /// Answer requests to `path` with `responses` in order; the last one
    /// repeats once the rest are used up.
    pub fn respond_sequence(&self, path: &str, responses: Vec<HttpResponse>) -> &Self {
        let queue = Mutex::new(VecDeque::from(responses));
        self.on(path, move |_| {
            let mut queue = queue.lock().unwrap_or_else(PoisonError::into_inner);
            let response = if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            };
            Ok(response.unwrap_or_else(|| HttpResponse::new(StatusCode::NOT_FOUND, "")))
        })
    }

    /// Fail every request to `path` below HTTP.
    pub fn fail(&self, path: &str, error: TransportError) -> &Self {
        self.on(path, move |_| Err(error.clone()))
    }

    /// Hold every response to `path` for `by` before answering.
    pub fn delay(&self, path: &str, by: Duration) -> &Self {
        self.lock().delays.insert(path.to_string(), by);
        self
    }

    /// All requests received, in send order.
    #[must_use]
    pub fn calls(&self) -> Vec<HttpRequest> {
        self.lock().calls.clone()
    }

    /// Requests received for `path`, in send order.
    #[must_use]
    pub fn calls_to(&self, path: &str) -> Vec<HttpRequest> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.path == path)
            .cloned()
            .collect()
    }

    /// Number of requests received for `path`.
    #[must_use]
    pub fn call_count(&self, path: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.path == path)
            .count()
    }

    /// Number of calls to the refresh endpoint.
    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.call_count(endpoints::REFRESH)
    }

    /// Bearer token carried by each request to `path`.
    #[must_use]
    pub fn bearers_for(&self, path: &str) -> Vec<Option<String>> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.path == path)
            .map(|call| call.bearer().map(str::to_string))
            .collect()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let (handler, delay) = {
            let mut script = self.lock();
            script.calls.push(request.clone());
            (
                script.handler_for(&request),
                script.delays.get(&request.path).copied(),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match handler {
            Some(handler) => handler(&request),
            None => Ok(HttpResponse::json_body(
                StatusCode::NOT_FOUND,
                &json!({ "detail": format!("no route for {} {}", request.method, request.path) }),
            )),
        }
    }
}

#[derive(Debug)]
struct Issued {
    current: String,
    issued: u32,
    revoked: bool,
}

/// Fake backend token issuer.
///
/// Protected handlers accept only the most recently issued access token; the
/// refresh handler mints a new one (`access-1`, `access-2`, ...) unless the
/// refresh token was revoked.
#[derive(Debug, Clone)]
pub struct TokenAuthority {
    state: Arc<Mutex<Issued>>,
}

impl TokenAuthority {
    /// Issuer whose currently valid access token is `valid`.
    #[must_use]
    pub fn new(valid: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(Issued {
                current: valid.into(),
                issued: 0,
                revoked: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Issued> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The access token protected handlers accept right now.
    #[must_use]
    pub fn current(&self) -> String {
        self.lock().current.clone()
    }

    /// How many access tokens the refresh handler has minted.
    #[must_use]
    pub fn issued(&self) -> u32 {
        self.lock().issued
    }

    /// Make every future refresh answer 401.
    pub fn revoke(&self) {
        self.lock().revoked = true;
    }

    /// Handler answering `body` to the current bearer and 401 to anyone else.
    #[must_use]
    pub fn protected(
        &self,
        body: Value,
    ) -> impl Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync + 'static
    {
        let authority = self.clone();
        move |request| {
            if request.bearer() == Some(authority.current().as_str()) {
                Ok(HttpResponse::json_body(StatusCode::OK, &body))
            } else {
                Ok(HttpResponse::json_body(
                    StatusCode::UNAUTHORIZED,
                    &json!({ "detail": "Given token not valid for any token type" }),
                ))
            }
        }
    }

    /// Handler for the refresh endpoint.
    #[must_use]
    pub fn refresh(
        &self,
    ) -> impl Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync + 'static
    {
        let authority = self.clone();
        move |request| {
            let presented = request
                .body
                .as_ref()
                .and_then(|body| body.get("refresh"))
                .and_then(Value::as_str)
                .is_some_and(|token| !token.is_empty());

            let mut state = authority.lock();
            if state.revoked || !presented {
                return Ok(HttpResponse::json_body(
                    StatusCode::UNAUTHORIZED,
                    &json!({ "detail": "Token is invalid or expired" }),
                ));
            }
            state.issued += 1;
            state.current = format!("access-{}", state.issued);
            Ok(HttpResponse::json_body(
                StatusCode::OK,
                &json!({ "access": state.current }),
            ))
        }
    }
}
