//! The outcome of one eagerly-run computation: a value that is already here,
//! or a handle to a computation still in flight.

use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;

/// What an executor or continuation produced.
///
/// Fallible computations return `Result<Step<T, E>, E>`: `Err` is a
/// synchronous failure, `Ok(Step::Ready)` a plain value, and
/// `Ok(Step::Deferred)` an asynchronous handoff. Every constructor and
/// continuation in this crate classifies through this one shape, so a step
/// that hands off to a future is treated the same no matter where it was
/// produced.
///
/// # Examples
///
/// ```
/// use value_or_future::Step;
///
/// fn parse(input: &str) -> Result<Step<i32, String>, String> {
///     let n = input.parse::<i32>().map_err(|e| e.to_string())?;
///     Ok(Step::ready(n))
/// }
///
/// assert!(parse("42").is_ok());
/// assert!(parse("forty-two").is_err());
/// ```
pub enum Step<T, E> {
    /// The value is already available.
    Ready(T),
    /// The value will come out of the boxed future.
    Deferred(BoxFuture<'static, Result<T, E>>),
}

impl<T, E> Step<T, E> {
    /// Wraps an already-computed value.
    pub fn ready(value: T) -> Self {
        Step::Ready(value)
    }

    /// Wraps an in-flight computation. Anything that is a future of
    /// `Result<T, E>` qualifies; no concrete future type is assumed.
    pub fn deferred<F>(handle: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Step::Deferred(handle.boxed())
    }
}

/// Flattens a continuation outcome inside an async context, awaiting the
/// nested future when the continuation handed off to one. Chaining over an
/// unresolved container funnels through here, so continuation results
/// classify exactly like construction results.
pub(crate) async fn settle<T, E>(outcome: Result<Step<T, E>, E>) -> Result<T, E> {
    match outcome {
        Ok(Step::Ready(value)) => Ok(value),
        Ok(Step::Deferred(handle)) => handle.await,
        Err(reason) => Err(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn settle_flattens_each_shape() {
        assert_eq!(block_on(settle::<_, String>(Ok(Step::ready(1)))), Ok(1));
        assert_eq!(
            block_on(settle::<_, String>(Ok(Step::deferred(async { Ok(2) })))),
            Ok(2)
        );
        assert_eq!(
            block_on(settle::<i32, _>(Err("boom".to_string()))),
            Err("boom".to_string())
        );
    }
}
