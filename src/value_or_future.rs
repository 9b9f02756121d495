//! The outcome container: one write-once state, classified at construction,
//! with chaining and resolution layered on top.

use std::fmt;
use std::future::{Future, IntoFuture};

use futures::future::{self, BoxFuture};
use futures::FutureExt;

use crate::step::{settle, Step};

/// A computation outcome that is either already settled or still in flight.
///
/// The state is fixed when the container is built and never mutated; every
/// derived container is freshly constructed. Operations that consume the
/// stored outcome take `self` by value, so an outcome can be extracted at
/// most once, while the borrowing accessors ([`value`](Self::value),
/// [`error`](Self::error), the `is_*` predicates) can observe it any number
/// of times.
///
/// # Examples
///
/// ```
/// use value_or_future::{Step, ValueOrFuture};
///
/// let parsed: ValueOrFuture<i32, String> =
///     ValueOrFuture::new(|| "21".parse::<i32>().map(Step::ready).map_err(|e| e.to_string()));
/// let doubled = parsed.then(|n| Ok(Step::ready(n * 2)));
/// assert_eq!(doubled.resolve().now(), Some(Ok(42)));
/// ```
pub struct ValueOrFuture<T, E> {
    pub(crate) state: State<T, E>,
}

pub(crate) enum State<T, E> {
    Fulfilled(T),
    Rejected(E),
    Pending(BoxFuture<'static, Result<T, E>>),
}

impl<T, E> ValueOrFuture<T, E> {
    /// Runs `executor` immediately, exactly once, and captures what it
    /// produced: `Err` becomes a rejected container, a ready step a
    /// fulfilled one, and a deferred step a pending one. The deferred
    /// future is stored untouched, never awaited here.
    ///
    /// # Examples
    ///
    /// ```
    /// use value_or_future::{Step, ValueOrFuture};
    ///
    /// let fulfilled: ValueOrFuture<i32, String> = ValueOrFuture::new(|| Ok(Step::ready(5)));
    /// assert!(fulfilled.is_fulfilled());
    ///
    /// let rejected: ValueOrFuture<i32, String> = ValueOrFuture::new(|| Err("nope".into()));
    /// assert!(rejected.is_rejected());
    ///
    /// let pending: ValueOrFuture<i32, String> =
    ///     ValueOrFuture::new(|| Ok(Step::deferred(async { Ok(5) })));
    /// assert!(pending.is_pending());
    /// ```
    pub fn new<F>(executor: F) -> Self
    where
        F: FnOnce() -> Result<Step<T, E>, E>,
    {
        let state = match executor() {
            Ok(Step::Ready(value)) => State::Fulfilled(value),
            Ok(Step::Deferred(handle)) => State::Pending(handle),
            Err(reason) => State::Rejected(reason),
        };
        ValueOrFuture { state }
    }

    /// A container fulfilled with `value`.
    pub fn from_value(value: T) -> Self {
        ValueOrFuture {
            state: State::Fulfilled(value),
        }
    }

    /// A container rejected with `reason`.
    pub fn from_error(reason: E) -> Self {
        ValueOrFuture {
            state: State::Rejected(reason),
        }
    }

    /// A container pending on `handle`.
    pub fn from_future<F>(handle: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        ValueOrFuture {
            state: State::Pending(handle.boxed()),
        }
    }

    /// The fulfilled value, if there is one.
    pub fn value(&self) -> Option<&T> {
        match &self.state {
            State::Fulfilled(value) => Some(value),
            _ => None,
        }
    }

    /// The rejection reason, if there is one.
    pub fn error(&self) -> Option<&E> {
        match &self.state {
            State::Rejected(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self.state, State::Fulfilled(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.state, State::Rejected(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending(_))
    }

    /// Extracts the outcome: [`Resolution::Now`] with the value or reason
    /// when the container is settled, [`Resolution::Later`] with the stored
    /// handle when it is not. A settled outcome costs no wrapping; async
    /// callers can skip the distinction entirely and `.await` the container.
    ///
    /// # Examples
    ///
    /// ```
    /// use value_or_future::ValueOrFuture;
    ///
    /// let settled = ValueOrFuture::<i32, String>::from_value(5);
    /// assert_eq!(settled.resolve().now(), Some(Ok(5)));
    ///
    /// let waiting = ValueOrFuture::<i32, String>::from_future(async { Ok(5) });
    /// assert!(waiting.resolve().now().is_none());
    /// ```
    pub fn resolve(self) -> Resolution<T, E> {
        match self.state {
            State::Fulfilled(value) => Resolution::Now(Ok(value)),
            State::Rejected(reason) => Resolution::Now(Err(reason)),
            State::Pending(handle) => Resolution::Later(handle),
        }
    }
}

impl<T, E> ValueOrFuture<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Derives a new container by applying `on_fulfilled` to the value and
    /// `on_rejected` to the reason, whichever the outcome turns out to be.
    ///
    /// A settled container invokes the matching continuation right away and
    /// captures its result under the same rules as [`new`](Self::new): an
    /// `Err` rejects the derived container, a deferred step demotes it to
    /// pending. An unresolved container registers both continuations on the
    /// stored handle, so the derived container is pending even when the
    /// continuations themselves are synchronous.
    pub fn then_catch<U, FS, FR>(self, on_fulfilled: FS, on_rejected: FR) -> ValueOrFuture<U, E>
    where
        U: Send + 'static,
        FS: FnOnce(T) -> Result<Step<U, E>, E> + Send + 'static,
        FR: FnOnce(E) -> Result<Step<U, E>, E> + Send + 'static,
    {
        match self.state {
            State::Fulfilled(value) => ValueOrFuture::new(move || on_fulfilled(value)),
            State::Rejected(reason) => ValueOrFuture::new(move || on_rejected(reason)),
            State::Pending(handle) => ValueOrFuture::new(move || {
                Ok(Step::deferred(async move {
                    match handle.await {
                        Ok(value) => settle(on_fulfilled(value)).await,
                        Err(reason) => settle(on_rejected(reason)).await,
                    }
                }))
            }),
        }
    }

    /// Derives a new container from the fulfilled value; a rejection passes
    /// through untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures::executor::block_on;
    /// use value_or_future::{Step, ValueOrFuture};
    ///
    /// let doubled = ValueOrFuture::<i32, String>::from_value(21).then(|n| Ok(Step::ready(n * 2)));
    /// assert_eq!(doubled.resolve().now(), Some(Ok(42)));
    ///
    /// // A continuation may itself hand off to a future.
    /// let deferred = ValueOrFuture::<i32, String>::from_value(2)
    ///     .then(|n| Ok(Step::deferred(async move { Ok(n * 10) })));
    /// assert!(deferred.is_pending());
    /// assert_eq!(block_on(async { deferred.await }), Ok(20));
    /// ```
    pub fn then<U, FS>(self, on_fulfilled: FS) -> ValueOrFuture<U, E>
    where
        U: Send + 'static,
        FS: FnOnce(T) -> Result<Step<U, E>, E> + Send + 'static,
    {
        self.then_catch(on_fulfilled, Err)
    }

    /// Derives a new container from the rejection reason; a fulfilled value
    /// passes through untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use value_or_future::{Step, ValueOrFuture};
    ///
    /// let recovered = ValueOrFuture::<i32, String>::from_error("offline".into())
    ///     .catch(|reason| Ok(Step::ready(reason.len() as i32)));
    /// assert_eq!(recovered.resolve().now(), Some(Ok(7)));
    /// ```
    pub fn catch<FR>(self, on_rejected: FR) -> ValueOrFuture<T, E>
    where
        FR: FnOnce(E) -> Result<Step<T, E>, E> + Send + 'static,
    {
        self.then_catch(|value| Ok(Step::Ready(value)), on_rejected)
    }
}

impl<T, E> From<Result<T, E>> for ValueOrFuture<T, E> {
    fn from(outcome: Result<T, E>) -> Self {
        match outcome {
            Ok(value) => ValueOrFuture::from_value(value),
            Err(reason) => ValueOrFuture::from_error(reason),
        }
    }
}

impl<T, E> IntoFuture for ValueOrFuture<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = Result<T, E>;
    type IntoFuture = BoxFuture<'static, Result<T, E>>;

    fn into_future(self) -> Self::IntoFuture {
        self.resolve().into_future()
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for ValueOrFuture<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Fulfilled(value) => f.debug_tuple("Fulfilled").field(value).finish(),
            State::Rejected(reason) => f.debug_tuple("Rejected").field(reason).finish(),
            State::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// What [`ValueOrFuture::resolve`] extracted: a settled outcome, or the
/// handle to keep waiting on.
pub enum Resolution<T, E> {
    /// The outcome, available with no wrapping cost.
    Now(Result<T, E>),
    /// Still in flight; await the handle.
    Later(BoxFuture<'static, Result<T, E>>),
}

impl<T, E> Resolution<T, E> {
    /// The settled outcome, or `None` when the computation is still in
    /// flight.
    pub fn now(self) -> Option<Result<T, E>> {
        match self {
            Resolution::Now(outcome) => Some(outcome),
            Resolution::Later(_) => None,
        }
    }
}

impl<T, E> IntoFuture for Resolution<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = Result<T, E>;
    type IntoFuture = BoxFuture<'static, Result<T, E>>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Resolution::Now(outcome) => future::ready(outcome).boxed(),
            Resolution::Later(handle) => handle,
        }
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Resolution<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Now(outcome) => f.debug_tuple("Now").field(outcome).finish(),
            Resolution::Later(_) => f.write_str("Later(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oneshot::Completer;
    use futures::executor::block_on;

    #[test]
    fn captures_value_synchronously() {
        let container: ValueOrFuture<i32, String> = ValueOrFuture::new(|| Ok(Step::ready(5)));
        assert!(container.is_fulfilled());
        assert_eq!(container.resolve().now(), Some(Ok(5)));
    }

    #[test]
    fn captures_failure_without_propagating() {
        let container: ValueOrFuture<i32, String> = ValueOrFuture::new(|| Err("boom".into()));
        assert_eq!(container.error(), Some(&"boom".to_string()));
        assert_eq!(container.resolve().now(), Some(Err("boom".into())));
    }

    #[test]
    fn classifies_futures_as_pending() {
        let container: ValueOrFuture<i32, String> =
            ValueOrFuture::new(|| Ok(Step::deferred(async { Ok(7) })));
        assert!(container.is_pending());
        assert_eq!(block_on(container.into_future()), Ok(7));
    }

    #[test]
    fn executor_runs_exactly_once() {
        let mut runs = 0;
        let container: ValueOrFuture<i32, String> = ValueOrFuture::new(|| {
            runs += 1;
            Ok(Step::ready(runs))
        });
        assert_eq!(runs, 1);
        assert_eq!(container.value(), Some(&1));
        assert_eq!(container.value(), Some(&1));
    }

    #[test]
    fn then_applies_to_fulfilled() {
        let out = ValueOrFuture::<i32, String>::from_value(21).then(|n| Ok(Step::ready(n * 2)));
        assert_eq!(out.resolve().now(), Some(Ok(42)));
    }

    #[test]
    fn then_passes_rejection_through_untouched() {
        let out = ValueOrFuture::<i32, String>::from_error("bad".into())
            .then(|n| Ok(Step::ready(n * 2)));
        assert_eq!(out.resolve().now(), Some(Err("bad".into())));
    }

    #[test]
    fn failing_continuation_rejects_derived_container() {
        let out: ValueOrFuture<i32, String> =
            ValueOrFuture::<i32, String>::from_value(1).then(|_| Err("blew up".to_string()));
        assert_eq!(out.resolve().now(), Some(Err("blew up".to_string())));
    }

    #[test]
    fn continuation_future_demotes_to_pending() {
        let out = ValueOrFuture::<i32, String>::from_value(4)
            .then(|n| Ok(Step::deferred(async move { Ok(n * n) })));
        assert!(out.is_pending());
        assert_eq!(block_on(out.into_future()), Ok(16));
    }

    #[test]
    fn catch_recovers_from_rejection() {
        let out = ValueOrFuture::<i32, String>::from_error("bad".into())
            .catch(|reason| Ok(Step::ready(reason.len() as i32)));
        assert_eq!(out.resolve().now(), Some(Ok(3)));
    }

    #[test]
    fn catch_leaves_fulfilled_untouched() {
        let out = ValueOrFuture::<i32, String>::from_value(9)
            .catch(|_| Ok(Step::ready(0)));
        assert_eq!(out.resolve().now(), Some(Ok(9)));
    }

    #[test]
    fn chaining_on_pending_stays_pending() {
        let (completer, waiter) = Completer::<Result<i32, String>>::new();
        let container =
            ValueOrFuture::from_future(async move { waiter.await.expect("completer kept") });
        let chained = container.then(|n| Ok(Step::ready(n + 1)));
        assert!(chained.is_pending());
        completer.settle(Ok(41));
        assert_eq!(block_on(chained.into_future()), Ok(42));
    }

    #[test]
    fn rejection_travels_through_pending_chain() {
        let (completer, waiter) = Completer::<Result<i32, String>>::new();
        let chained =
            ValueOrFuture::from_future(async move { waiter.await.expect("completer kept") })
                .then(|n| Ok(Step::ready(n + 1)));
        completer.settle(Err("remote down".to_string()));
        assert_eq!(
            block_on(chained.into_future()),
            Err("remote down".to_string())
        );
    }

    #[test]
    fn result_conversion_classifies_both_ways() {
        let ok: ValueOrFuture<i32, String> = Ok(3).into();
        assert!(ok.is_fulfilled());
        let err: ValueOrFuture<i32, String> = Err("no".to_string()).into();
        assert!(err.is_rejected());
    }
}
