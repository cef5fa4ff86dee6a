//! Background polling of a shard

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{GetRecordsRequest, Record, Stream};
use crate::error::Error;
use crate::observability::ConsumerContext;

/// Options for [`Stream::consume`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerOptions {
    /// Maximum records per `GetRecords` call. `None` uses the service default.
    pub limit: Option<u32>,
    /// Pause after a batch with no records.
    pub idle_delay: Duration,
}

impl Default for ConsumerOptions {
    fn default() -> Self {
        Self {
            limit: None,
            idle_delay: Duration::from_secs(1),
        }
    }
}

impl ConsumerOptions {
    /// Set the per-call record limit.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the pause after an empty batch.
    pub fn idle_delay(mut self, idle_delay: Duration) -> Self {
        self.idle_delay = idle_delay;
        self
    }
}

/// Records read by a background polling task.
///
/// Drain [`recv`](Self::recv) until it returns `None`, then call
/// [`error`](Self::error) to learn why the task stopped. Dropping the
/// consumer cancels the task.
///
/// # Example
///
/// ```rust,no_run
/// # async fn run(stream: gaws::resources::kinesis::Stream, iterator: String) -> gaws::Result<()> {
/// use gaws::resources::kinesis::ConsumerOptions;
///
/// let mut consumer = stream.consume(iterator, ConsumerOptions::default());
/// while let Some(record) = consumer.recv().await {
///     println!("{}", String::from_utf8_lossy(&record.bytes()?));
/// }
/// if let Some(err) = consumer.error().await {
///     return Err(err);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RecordConsumer {
    records: mpsc::Receiver<Record>,
    errors: Option<oneshot::Receiver<Error>>,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl RecordConsumer {
    /// Next record, or `None` once the task has stopped and every record
    /// it read has been received.
    pub async fn recv(&mut self) -> Option<Record> {
        self.records.recv().await
    }

    /// The error that stopped the task, if any.
    ///
    /// Waits for the task to stop. Returns `None` when the shard was closed
    /// or the task was cancelled, and on every call after the first. Call
    /// it after `recv` returned `None`: while a record is waiting to be
    /// received the task cannot make progress.
    pub async fn error(&mut self) -> Option<Error> {
        let errors = self.errors.take()?;
        errors.await.ok()
    }

    /// Stop the task. Records already buffered can still be received.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Token bound to the background task.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for RecordConsumer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl Stream {
    /// Poll records from `shard_iterator` on a background task.
    ///
    /// Must be called within a tokio runtime.
    pub fn consume(&self, shard_iterator: impl Into<String>, options: ConsumerOptions) -> RecordConsumer {
        self.spawn_consumer(shard_iterator.into(), options, CancellationToken::new())
    }

    /// Like [`consume`](Self::consume), also stopping when `token` is cancelled.
    ///
    /// The task runs on a child of `token`, so cancelling or dropping the
    /// consumer leaves `token` itself untouched.
    pub fn consume_with_token(
        &self,
        shard_iterator: impl Into<String>,
        options: ConsumerOptions,
        token: &CancellationToken,
    ) -> RecordConsumer {
        self.spawn_consumer(shard_iterator.into(), options, token.child_token())
    }

    fn spawn_consumer(
        &self,
        shard_iterator: String,
        options: ConsumerOptions,
        token: CancellationToken,
    ) -> RecordConsumer {
        let (records_tx, records) = mpsc::channel(1);
        let (errors_tx, errors) = oneshot::channel();

        let handle = tokio::spawn(poll(
            self.clone(),
            shard_iterator,
            options,
            records_tx,
            errors_tx,
            token.clone(),
        ));

        RecordConsumer {
            records,
            errors: Some(errors),
            token,
            handle,
        }
    }
}

async fn poll(
    stream: Stream,
    shard_iterator: String,
    options: ConsumerOptions,
    records: mpsc::Sender<Record>,
    errors: oneshot::Sender<Error>,
    token: CancellationToken,
) {
    let mut context = ConsumerContext::new(stream.name());
    context.log_started();

    let mut request = GetRecordsRequest {
        shard_iterator,
        limit: options.limit,
    };

    loop {
        if token.is_cancelled() {
            context.log_cancelled();
            return;
        }

        let fetched = tokio::select! {
            biased;
            _ = token.cancelled() => {
                context.log_cancelled();
                return;
            }
            fetched = stream.get_records(&request) => fetched,
        };

        let response = match fetched {
            Ok(response) => response,
            Err(e) => {
                context.log_error(&e.to_string());
                // The receiver may be gone already
                let _ = errors.send(e);
                return;
            }
        };

        context.log_batch(response.records.len());
        let idle = response.records.is_empty();

        for record in response.records {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    context.log_cancelled();
                    return;
                }
                sent = records.send(record) => {
                    if sent.is_err() {
                        context.log_cancelled();
                        return;
                    }
                }
            }
        }

        match response.next_shard_iterator {
            Some(next) => request.shard_iterator = next,
            None => {
                context.log_complete();
                return;
            }
        }

        if idle {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    context.log_cancelled();
                    return;
                }
                _ = tokio::time::sleep(options.idle_delay) => {}
            }
        }
    }
}
