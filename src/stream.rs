//! Lazy, chainable streams over single-shot asynchronous sources.
//!
//! This module provides [`FlowStream`], a capability-extending wrapper around
//! an asynchronous run of values. It carries the usual functional-sequence
//! operations (`map`, `filter`, `take`, `chain`) plus three additions
//! (`catch_error`, `retry`, `merge_map`), and every operation that produces a
//! sequence produces another `FlowStream`, so the full capability set
//! survives arbitrary chaining.
//!
//! A `FlowStream` holds a *source factory* rather than a live stream. Nothing
//! runs until a terminal pull ([`FlowStream::head`] or [`FlowStream::to_vec`])
//! instantiates the underlying stream and drives it. The factory is also what
//! makes [`FlowStream::retry`] possible: each attempt instantiates a fresh
//! stream from the original source instead of re-reading a drained one.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures_core::Stream;
use futures_util::{future, stream, StreamExt};

use crate::error::{HttpflowError, HttpflowResult};

/// Type alias for a boxed stream of fallible items.
///
/// An `Err` item is a raised failure. Streams produced by this crate always
/// end immediately after raising one.
pub type ItemStream<T> = Pin<Box<dyn Stream<Item = HttpflowResult<T>> + Send>>;

/// Replayable source of item streams. Invoked once per terminal pull, and
/// once per attempt under `retry`.
type SourceFn<T> = Arc<dyn Fn() -> ItemStream<T> + Send + Sync>;

/// A lazy, chainable stream of fallible values.
///
/// Every combinator consumes `self` and returns a new `FlowStream`, so a
/// chain step never leaves two wrappers sharing a live iteration cursor.
/// User-supplied functions carry a `Clone` bound because each instantiation
/// of the underlying stream (one per retry attempt) gets its own copy.
///
/// # Example
///
/// ```rust
/// use httpflow::FlowStream;
/// use futures_util::stream;
///
/// # async fn example() {
/// let items = FlowStream::new(|| {
///     stream::iter(vec![Ok::<_, httpflow::HttpflowError>(1), Ok(2), Ok(3)])
/// });
///
/// let doubled = items.map(|v| v * 2).to_vec().await.unwrap();
/// assert_eq!(doubled, vec![2, 4, 6]);
/// # }
/// ```
pub struct FlowStream<T> {
    source: SourceFn<T>,
}

impl<T: Send + 'static> FlowStream<T> {
    /// Wrap a stream factory into a `FlowStream`.
    ///
    /// The factory is not invoked here; construction and chaining stay free
    /// of side effects until a terminal pull runs.
    pub fn new<S, F>(factory: F) -> Self
    where
        S: Stream<Item = HttpflowResult<T>> + Send + 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        Self {
            source: Arc::new(move || {
                let instantiated: ItemStream<T> = Box::pin(factory());
                instantiated
            }),
        }
    }

    /// Wrap a future factory as a single-element `FlowStream`.
    ///
    /// Each instantiation runs the future once and yields its result (value
    /// or raised failure), then ends. This is the source-adapter primitive:
    /// one external call per instantiation, deferred until pulled.
    pub fn once<Fut, F>(factory: F) -> Self
    where
        Fut: Future<Output = HttpflowResult<T>> + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
    {
        Self::new(move || stream::once(factory()))
    }

    /// Transform every value with `f`. Failures re-raise untouched.
    pub fn map<U, F>(self, f: F) -> FlowStream<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Clone + Send + Sync + 'static,
    {
        let source = self.source;
        FlowStream::new(move || {
            let mut f = f.clone();
            (source)().map(move |item| item.map(&mut f))
        })
    }

    /// Keep only the values matching `predicate`. Failures re-raise untouched.
    pub fn filter<F>(self, predicate: F) -> FlowStream<T>
    where
        F: FnMut(&T) -> bool + Clone + Send + Sync + 'static,
    {
        let source = self.source;
        FlowStream::new(move || {
            let mut predicate = predicate.clone();
            (source)().filter(move |item| {
                let keep = match item {
                    Ok(value) => predicate(value),
                    Err(_) => true,
                };
                future::ready(keep)
            })
        })
    }

    /// End the stream after `n` items.
    ///
    /// A failure that would arrive after the cut-off is never pulled, so
    /// `take` can turn a failing run into a successful one if enough values
    /// precede the failure.
    pub fn take(self, n: usize) -> FlowStream<T> {
        let source = self.source;
        FlowStream::new(move || (source)().take(n))
    }

    /// Pipe the whole stream through a caller-supplied pipeline function.
    ///
    /// `f` receives a fresh wrapper over the same source on every
    /// instantiation, so a chained pipeline replays correctly under `retry`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use httpflow::FlowStream;
    /// use futures_util::stream;
    ///
    /// # async fn example() {
    /// let first = FlowStream::new(|| {
    ///     stream::iter(vec![Ok::<_, httpflow::HttpflowError>(1), Ok(2)])
    /// })
    /// .chain(|s| s.map(|v| v + 10).filter(|v| *v > 11))
    /// .head()
    /// .await
    /// .unwrap();
    /// assert_eq!(first, 12);
    /// # }
    /// ```
    pub fn chain<U, F>(self, f: F) -> FlowStream<U>
    where
        U: Send + 'static,
        F: Fn(FlowStream<T>) -> FlowStream<U> + Send + Sync + 'static,
    {
        let source = self.source;
        FlowStream::new(move || {
            let upstream = FlowStream {
                source: Arc::clone(&source),
            };
            (f(upstream).source)()
        })
    }

    /// Absorb the first failure by substituting `handler`'s return value.
    ///
    /// Values are relayed unchanged. If the stream raises a failure, the
    /// handler's result is yielded as one final value and the stream ends
    /// normally; the failure never propagates past this point. On a
    /// failure-free run the handler is never invoked.
    pub fn catch_error<F>(self, handler: F) -> FlowStream<T>
    where
        F: FnMut(HttpflowError) -> T + Clone + Send + Sync + 'static,
    {
        let source = self.source;
        FlowStream::new(move || {
            let state = Some(((source)(), handler.clone()));
            stream::unfold(state, |state| async move {
                let (mut inner, mut handler) = state?;
                match inner.next().await {
                    Some(Ok(value)) => Some((Ok(value), Some((inner, handler)))),
                    Some(Err(error)) => Some((Ok(handler(error)), None)),
                    None => None,
                }
            })
        })
    }

    /// Replay the source on failure, up to `retries` additional attempts.
    ///
    /// Each attempt instantiates a brand-new stream from the original source
    /// and relays its values. An attempt that completes without failure ends
    /// the stream; once attempts are exhausted the last failure re-raises.
    /// `retry(0)` performs exactly one attempt.
    ///
    /// Replay is full re-execution of the upstream chain, including the
    /// external call it started from. Values a failed attempt yielded before
    /// failing are relayed again by the next attempt (at-least-once replay),
    /// and side effects of non-idempotent calls repeat per attempt.
    pub fn retry(self, retries: u32) -> FlowStream<T> {
        let source = self.source;
        FlowStream::new(move || {
            let state = Some(RetryState {
                source: Arc::clone(&source),
                current: None,
                remaining: retries,
            });
            stream::unfold(state, |state| async move {
                let mut state = state?;
                loop {
                    let mut attempt = match state.current.take() {
                        Some(live) => live,
                        None => (state.source)(),
                    };
                    match attempt.next().await {
                        Some(Ok(value)) => {
                            state.current = Some(attempt);
                            return Some((Ok(value), Some(state)));
                        }
                        Some(Err(error)) => {
                            if state.remaining == 0 {
                                return Some((Err(error), None));
                            }
                            state.remaining -= 1;
                            tracing::debug!(
                                remaining = state.remaining,
                                error = %error,
                                "attempt failed, replaying source"
                            );
                        }
                        None => return None,
                    }
                }
            })
        })
    }

    /// Map every value to a finite synchronous group and flatten one level.
    ///
    /// Groups are yielded in arrival order, each group fully emitted before
    /// the next value is pulled; no interleaving. The mapper itself is
    /// synchronous; only the outer stream suspends.
    pub fn merge_map<U, I, F>(self, mapper: F) -> FlowStream<U>
    where
        U: Send + 'static,
        I: IntoIterator<Item = U> + 'static,
        F: FnMut(T) -> I + Clone + Send + Sync + 'static,
    {
        let source = self.source;
        FlowStream::new(move || {
            let state = Some(((source)(), mapper.clone(), VecDeque::new()));
            stream::unfold(state, |state| async move {
                let (mut inner, mut mapper, mut pending) = state?;
                loop {
                    if let Some(value) = pending.pop_front() {
                        return Some((Ok(value), Some((inner, mapper, pending))));
                    }
                    match inner.next().await {
                        Some(Ok(value)) => pending.extend(mapper(value)),
                        Some(Err(error)) => return Some((Err(error), None)),
                        None => return None,
                    }
                }
            })
        })
    }

    /// Pull the first value, driving the stream.
    ///
    /// Returns the raised failure if the stream fails before yielding, or
    /// [`HttpflowError::Empty`] if it ends without a value.
    pub async fn head(self) -> HttpflowResult<T> {
        let mut stream = (self.source)();
        match stream.next().await {
            Some(item) => item,
            None => Err(HttpflowError::Empty),
        }
    }

    /// Drain the stream into a `Vec`, driving it to completion.
    ///
    /// A raised failure rejects the whole call; there is no partial result.
    pub async fn to_vec(self) -> HttpflowResult<Vec<T>> {
        let mut stream = (self.source)();
        let mut values = Vec::new();
        while let Some(item) = stream.next().await {
            values.push(item?);
        }
        Ok(values)
    }

    /// Instantiate and return the underlying stream.
    pub fn into_stream(self) -> ItemStream<T> {
        (self.source)()
    }
}

struct RetryState<T> {
    source: SourceFn<T>,
    current: Option<ItemStream<T>>,
    remaining: u32,
}

impl<T> fmt::Debug for FlowStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowStream").finish_non_exhaustive()
    }
}
