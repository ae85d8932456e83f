use std::sync::Arc;

use axum::{
    body::Bytes, extract::State, response::Response as HttpResponse, routing::get, routing::post,
    Json, Router,
};

use crate::server_types::{plain_text, GameSummary};
use crate::{opponent::Opponent, Device, Game, Response};

/// Routes for any [`Device`]: `POST /` writes one command line and answers
/// with whatever is pending afterwards, `GET /` only reads.
pub async fn serve_device<D: Device + 'static>(device: D) -> Router {
    device_routes::<D>().with_state(Arc::new(device))
}

/// [`serve_device`] plus the routes that need a concrete [`Game`]:
/// `POST /submit` answers with the outcome of that very request, and
/// `GET /status` reports a [`GameSummary`].
pub async fn serve_game<O: Opponent + 'static>(game: Game<O>) -> Router {
    Router::new()
        .route("/submit", post(submit::<O>))
        .route("/status", get(status::<O>))
        .merge(device_routes::<Game<O>>())
        .with_state(Arc::new(game))
}

fn device_routes<D: Device + 'static>() -> Router<Arc<D>> {
    Router::new().route("/", get(read_pending::<D>).post(write_command::<D>))
}

async fn read_pending<D: Device>(State(d): State<Arc<D>>) -> HttpResponse {
    plain_text(d.read().await)
}

async fn write_command<D: Device>(State(d): State<Arc<D>>, line: Bytes) -> HttpResponse {
    // Another client may overwrite the slot in between; the protocol only
    // promises the latest outcome.
    d.write(&line).await;
    plain_text(d.read().await)
}

async fn submit<O: Opponent>(State(g): State<Arc<Game<O>>>, line: Bytes) -> Response {
    g.submit(&line).await
}

async fn status<O: Opponent>(State(g): State<Arc<Game<O>>>) -> Json<GameSummary> {
    Json(g.summary().await)
}
