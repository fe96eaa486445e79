use callmux::error::ServiceError;
use futures::{
    Stream, StreamExt,
    channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded},
    stream::FusedStream,
    task::{Context, Poll},
};
use std::pin::Pin;

type ResultItem<T> = Result<T, ServiceError>;

/// Creates the single-writer hand-off between a call's handler and the code
/// awaiting its results.
///
/// The producer side never blocks, so it can be driven from the connection's
/// event loop while the consumer is polled from any other task or thread.
pub fn result_channel<T>() -> (ResultProducer<T>, ResultConsumer<T>) {
    let (tx, rx) = unbounded();

    (
        ResultProducer {
            tx: Some(tx),
            state: ProducerState::Open,
        },
        ResultConsumer {
            rx,
            terminal: None,
            finished: false,
        },
    )
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProducerState {
    Open,
    /// Ended normally; the consumer sees the end of the sequence.
    Closed,
    /// Ended with an error; the consumer sees that error last.
    Failed,
}

/// Writing half of a result channel.
///
/// Once closed or failed, every further `write`, `error` or `close` is
/// ignored, regardless of what the transport delivers afterwards. Dropping
/// a producer that is still open fails the channel with a transport error.
pub struct ResultProducer<T> {
    tx: Option<UnboundedSender<ResultItem<T>>>,
    state: ProducerState,
}

impl<T> ResultProducer<T> {
    /// Appends one value. Returns whether it was queued for the consumer.
    pub fn write(&mut self, value: T) -> bool {
        let Some(tx) = self.tx.as_ref() else {
            tracing::trace!(state = ?self.state, "ignoring write after terminal state");
            return false;
        };

        if tx.unbounded_send(Ok(value)).is_err() {
            tracing::trace!("result consumer dropped; discarding value");
            return false;
        }

        true
    }

    /// Fails the channel. Only the first terminal signal takes effect.
    pub fn error(&mut self, error: ServiceError) -> bool {
        let Some(tx) = self.tx.take() else {
            tracing::trace!(state = ?self.state, %error, "ignoring error after terminal state");
            return false;
        };

        self.state = ProducerState::Failed;

        if tx.unbounded_send(Err(error)).is_err() {
            tracing::trace!("result consumer dropped; discarding error");
        }

        true
    }

    /// Ends the sequence successfully.
    pub fn close(&mut self) -> bool {
        if self.tx.take().is_none() {
            return false;
        }

        self.state = ProducerState::Closed;
        true
    }

    pub fn state(&self) -> ProducerState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.state != ProducerState::Open
    }
}

impl<T> Drop for ResultProducer<T> {
    fn drop(&mut self) {
        if self.state == ProducerState::Open {
            tracing::debug!("result producer dropped before completion");
            self.error(ServiceError::Transport("call dropped before completion".into()));
        }
    }
}

/// Reading half of a result channel.
///
/// As a `Stream` it yields values in the order they were written, then at
/// most one error, then ends. `recv` additionally re-raises the terminal
/// error on every call after it was first observed.
pub struct ResultConsumer<T> {
    rx: UnboundedReceiver<ResultItem<T>>,
    terminal: Option<ServiceError>,
    finished: bool,
}

impl<T> ResultConsumer<T> {
    /// Waits for the next value.
    ///
    /// `Ok(None)` means the call completed without error and no further
    /// values will arrive.
    pub async fn recv(&mut self) -> Result<Option<T>, ServiceError> {
        if let Some(error) = &self.terminal {
            return Err(error.clone());
        }

        match self.next().await {
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(error)) => Err(error),
            None => Ok(None),
        }
    }

    /// Drains the sequence, failing on the first error.
    pub async fn collect_values(mut self) -> Result<Vec<T>, ServiceError> {
        let mut values = Vec::new();

        while let Some(value) = self.recv().await? {
            values.push(value);
        }

        Ok(values)
    }

    /// The error that terminated the sequence, once it has been observed.
    pub fn terminal_error(&self) -> Option<&ServiceError> {
        self.terminal.as_ref()
    }
}

impl<T> Stream for ResultConsumer<T> {
    type Item = ResultItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.finished {
            return Poll::Ready(None);
        }

        match this.rx.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(value))) => Poll::Ready(Some(Ok(value))),
            Poll::Ready(Some(Err(error))) => {
                this.terminal = Some(error.clone());
                this.finished = true;
                Poll::Ready(Some(Err(error)))
            }
            Poll::Ready(None) => {
                this.finished = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> FusedStream for ResultConsumer<T> {
    fn is_terminated(&self) -> bool {
        self.finished
    }
}
