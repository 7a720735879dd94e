// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel-backed token streams with cancellation on drop.
//!
//! A backend spawns its producer with [`spawn_token_stream`] and pushes
//! tokens through a [`TokenSink`]. The consumer gets a [`TokenStream`]; when
//! it is dropped the producer's [`CancellationToken`] fires and the producer
//! task is stopped at its next await point, releasing whatever connection
//! or device handle it holds.

use std::future::Future;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::TierRouteError;
use crate::traits::TokenStream;

/// The consumer side of a token stream is gone.
#[derive(Debug, Error)]
#[error("token stream closed by consumer")]
pub struct StreamClosed;

/// Producer handle for a token stream.
pub struct TokenSink {
    tx: mpsc::Sender<Result<String, TierRouteError>>,
    cancel: CancellationToken,
}

impl TokenSink {
    /// Sends the next token. Fails once the consumer has dropped the stream.
    pub async fn send(&self, token: impl Into<String>) -> Result<(), StreamClosed> {
        if self.cancel.is_cancelled() {
            return Err(StreamClosed);
        }
        self.tx
            .send(Ok(token.into()))
            .await
            .map_err(|_| StreamClosed)
    }

    /// Delivers a terminal error to the consumer.
    pub async fn fail(&self, err: TierRouteError) -> Result<(), StreamClosed> {
        self.tx.send(Err(err)).await.map_err(|_| StreamClosed)
    }

    /// Whether the consumer has gone away.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Completes when the consumer drops the stream.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}

/// Spawns `producer` on the current runtime and returns the consuming stream.
///
/// The stream ends when the producer returns. Dropping the stream cancels the
/// producer even if it is parked on something other than the channel.
pub fn spawn_token_stream<F, Fut>(buffer: usize, producer: F) -> TokenStream
where
    F: FnOnce(TokenSink) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let cancel = CancellationToken::new();
    let sink = TokenSink {
        tx,
        cancel: cancel.clone(),
    };
    let task = producer(sink);
    let task_cancel = cancel.clone();

    tokio::spawn(async move {
        tokio::select! {
            _ = task_cancel.cancelled() => {
                debug!("token producer cancelled by consumer");
            }
            _ = task => {}
        }
    });

    let guard = cancel.drop_guard();
    Box::pin(futures::stream::unfold(
        (rx, guard),
        |(mut rx, guard)| async move { rx.recv().await.map(|item| (item, (rx, guard))) },
    ))
}
