use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use axum::{Extension, Router};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;

/// Local stand-in for a Google JSON endpoint, recording every query it receives.
pub struct GoogleStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

struct StubResponse {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl GoogleStub {
    pub fn spawn(status: StatusCode, body: impl Into<String>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let response = Arc::new(StubResponse {
            status,
            body: body.into(),
            requests: requests.clone(),
        });

        let app = Router::new()
            .route("/json", get(respond))
            .layer(Extension(response));

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let server = axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service());
        tokio::spawn(server);

        Self {
            base_url: format!("http://{}/json", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().unwrap().clone()
    }
}

async fn respond(
    Extension(response): Extension<Arc<StubResponse>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    response.requests.lock().unwrap().push(params);
    (response.status, response.body.clone())
}
