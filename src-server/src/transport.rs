//! Line-delimited JSON transport
//!
//! Each input line is one request:
//!
//! ```text
//! {"id": 7, "method": "app.segment", "args": [1, [10, 10, 10], {"scale": 1.0}]}
//! ```
//!
//! and produces one output line carrying the same `id`. Requests run
//! concurrently on the blocking pool, so responses may arrive out of order.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tubeseg_core::Engine;

use crate::commands::{self, CommandError, CommandResult, INTERNAL_ERROR, INVALID_REQUEST};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    args: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct Response {
    id: Value,
    #[serde(flatten)]
    result: CommandResult<Value>,
}

/// Decode one request line, run it, and encode the response line.
pub fn handle_line<E: Engine>(state: &AppState<E>, line: &str) -> String {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => encode(&Response {
            result: commands::dispatch(state, &request.method, &request.args),
            id: request.id,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Malformed request");
            invalid_request(e.to_string())
        }
    }
}

fn invalid_request(message: String) -> String {
    encode(&Response {
        id: Value::Null,
        result: CommandResult::err(CommandError::new(INVALID_REQUEST, message)),
    })
}

fn encode(response: &Response) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        json!({
            "id": null,
            "success": false,
            "data": null,
            "error": { "code": INTERNAL_ERROR, "message": e.to_string() },
        })
        .to_string()
    })
}

/// Serve requests from `reader` until it reaches end of input, writing
/// responses to `writer`. Returns the writer once every response is flushed.
pub async fn serve<E, R, W>(state: AppState<E>, reader: R, writer: W) -> std::io::Result<W>
where
    E: Engine,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let writer_task = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(line) = rx.recv().await {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok::<W, std::io::Error>(writer)
    });

    let mut reader = reader;
    let mut in_flight = JoinSet::new();
    loop {
        let mut buf = Vec::new();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let line = match String::from_utf8(buf) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Request line is not valid UTF-8");
                if tx.send(invalid_request(e.to_string())).is_err() {
                    tracing::error!("Response writer closed");
                }
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let state = state.clone();
        let tx = tx.clone();
        in_flight.spawn_blocking(move || {
            let response = handle_line(&state, &line);
            if tx.send(response).is_err() {
                tracing::error!("Response writer closed");
            }
        });
    }

    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "Request task failed");
        }
    }
    drop(tx);

    writer_task.await.map_err(std::io::Error::other)?
}
