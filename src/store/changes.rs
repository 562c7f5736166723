use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;

type Projection<P, T> = Arc<dyn Fn(&P) -> T + Send + Sync>;
type Changed<P> =
    Pin<Box<dyn Future<Output = (watch::Receiver<P>, Result<(), watch::error::RecvError>)> + Send>>;

/// Stream of projected store states.
///
/// Every store update is projected, and the projection is yielded only when
/// it differs (by `PartialEq`) from the last yielded value. Unrelated parent
/// updates are therefore invisible to a scoped observer. The stream ends
/// when the store is dropped.
pub struct StateChanges<P, T> {
    receiver: Option<watch::Receiver<P>>,
    changed: Option<Changed<P>>,
    project: Projection<P, T>,
    last: T,
}

impl<P, T> StateChanges<P, T>
where
    P: Send + Sync + 'static,
{
    pub(crate) fn new(mut receiver: watch::Receiver<P>, project: Projection<P, T>) -> Self {
        let last = project(&receiver.borrow_and_update());
        Self {
            receiver: Some(receiver),
            changed: None,
            project,
            last,
        }
    }
}

impl<P, T> Stream for StateChanges<P, T>
where
    P: Send + Sync + 'static,
    T: Clone + PartialEq + Unpin,
{
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();
        loop {
            if this.changed.is_none() {
                let Some(mut receiver) = this.receiver.take() else {
                    return Poll::Ready(None);
                };
                this.changed = Some(Box::pin(async move {
                    let result = receiver.changed().await;
                    (receiver, result)
                }));
            }
            let Some(changed) = this.changed.as_mut() else {
                return Poll::Ready(None);
            };
            let (mut receiver, result) = match changed.as_mut().poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(output) => output,
            };
            this.changed = None;
            if result.is_err() {
                return Poll::Ready(None);
            }

            let value = (this.project)(&receiver.borrow_and_update());
            this.receiver = Some(receiver);
            if value != this.last {
                this.last = value.clone();
                return Poll::Ready(Some(value));
            }
        }
    }
}
