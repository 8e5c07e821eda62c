use crate::Deduplicator;
use futures_core::stream::Stream;
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Extension trait with the stream adapters used by the state pipelines.
pub trait SkyStreamExt: Stream {
    /// Suppresses `Ok` values that `equals` considers unchanged from the last
    /// emitted `Ok` value. Errors pass through untouched and do not reset the
    /// comparison.
    ///
    /// ## Examples
    ///
    /// ```
    /// use futures::{executor::block_on, stream, StreamExt};
    /// use skyrx::SkyStreamExt;
    ///
    /// let values = stream::iter(vec![Ok::<_, ()>(vec![1]), Ok(vec![2]), Ok(vec![2, 3])])
    ///     .distinct_until_changed_by(|a: &Vec<i32>, b: &Vec<i32>| a.len() == b.len());
    /// let collected: Vec<_> = block_on(values.collect());
    /// assert_eq!(collected, vec![Ok(vec![1]), Ok(vec![2, 3])]);
    /// ```
    fn distinct_until_changed_by<T, E, F>(self, equals: F) -> DistinctUntilChangedBy<Self, T, F>
    where
        Self: Stream<Item = Result<T, E>> + Sized,
        T: Clone,
        F: Fn(&T, &T) -> bool,
    {
        DistinctUntilChangedBy {
            stream: self,
            dedup: Deduplicator::new(equals),
        }
    }
}

impl<S: ?Sized> SkyStreamExt for S where S: Stream {}

/// Stream created by [`SkyStreamExt::distinct_until_changed_by`].
#[pin_project(project = DistinctProj)]
#[must_use = "Streams do nothing unless polled"]
pub struct DistinctUntilChangedBy<S, T, F> {
    #[pin]
    stream: S,
    dedup: Deduplicator<T, F>,
}

impl<S, T, E, F> Stream for DistinctUntilChangedBy<S, T, F>
where
    S: Stream<Item = Result<T, E>>,
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let DistinctProj { mut stream, dedup } = self.project();

        loop {
            match stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(value))) => {
                    if dedup.should_emit(&value) {
                        return Poll::Ready(Some(Ok(value)));
                    }
                }
                Poll::Ready(Some(Err(error))) => return Poll::Ready(Some(Err(error))),
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
