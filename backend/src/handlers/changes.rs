//! Live change stream: server-sent events fed by the store changefeed.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use futures::Stream;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::AppState;

/// Each store write becomes one SSE message with a JSON
/// `{collection, kind, id}` body. A lagged subscriber silently skips the
/// missed changes; clients re-fetch on every message anyway.
pub async fn change_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let stream = BroadcastStream::new(state.store.subscribe()).filter_map(|change| {
        match change {
            Ok(change) => match SseEvent::default().json_data(&change) {
                Ok(event) => Some(Ok(event)),
                Err(e) => {
                    tracing::warn!("could not encode change event: {}", e);
                    None
                }
            },
            Err(_) => None, // lagged
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
