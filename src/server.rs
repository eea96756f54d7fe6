use axum::{routing::post, Router, Json};
use crate::data::{AnalysisInput, ConflictReport};
use crate::analyzer;

async fn conflicts_handler(Json(input): Json<AnalysisInput>) -> Json<ConflictReport> {
    Json(analyzer::analyze(&input))
}

pub fn app() -> Router {
    Router::new().route("/v1/schedule/conflicts", post(conflicts_handler))
}

pub async fn run_server() {
    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap();

    println!("Server running at http://{}", listener.local_addr().unwrap());

    axum::serve(listener, app()).await.unwrap();
}
