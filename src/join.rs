//! Joining an ordered batch of containers into one container of their
//! ordered values.

use futures::future::{self, BoxFuture, Either};

use crate::value_or_future::{State, ValueOrFuture};

/// A join entry is either a value that was already settled when the batch
/// was classified, or the handle still being waited on.
type JoinEntry<T, E> = Either<future::Ready<Result<T, E>>, BoxFuture<'static, Result<T, E>>>;

/// Combines an ordered batch of containers into one container of their
/// values, in input order.
///
/// The batch is classified in a single forward pass. The first rejected
/// entry wins immediately and later entries are never inspected; their
/// futures are dropped unpolled. If nothing was rejected and nothing is
/// still in flight, the result is fulfilled synchronously. Otherwise the
/// result is pending on one join over the whole sequence, which treats
/// already-settled entries as immediately available and yields values in
/// input order no matter which waits finish first.
///
/// # Examples
///
/// ```
/// use value_or_future::{join_all, ValueOrFuture};
///
/// let settled = join_all((1..=3).map(ValueOrFuture::<i32, String>::from_value));
/// assert_eq!(settled.resolve().now(), Some(Ok(vec![1, 2, 3])));
///
/// let mixed = join_all(vec![
///     ValueOrFuture::<i32, String>::from_value(1),
///     ValueOrFuture::from_future(async { Ok(2) }),
/// ]);
/// assert!(mixed.is_pending());
/// ```
pub fn join_all<T, E, I>(containers: I) -> ValueOrFuture<Vec<T>, E>
where
    T: Send + 'static,
    E: Send + 'static,
    I: IntoIterator<Item = ValueOrFuture<T, E>>,
{
    let mut values = Vec::new();
    let mut waits: Vec<JoinEntry<T, E>> = Vec::new();
    let mut saw_pending = false;

    for container in containers {
        match container.state {
            State::Rejected(reason) => return ValueOrFuture::from_error(reason),
            State::Fulfilled(value) => {
                if saw_pending {
                    waits.push(Either::Left(future::ready(Ok(value))));
                } else {
                    values.push(value);
                }
            }
            State::Pending(handle) => {
                if !saw_pending {
                    saw_pending = true;
                    // The prefix collected so far becomes immediately-ready
                    // entries; the whole sequence joins once, in order.
                    waits.extend(
                        values
                            .drain(..)
                            .map(|value| Either::Left(future::ready(Ok(value)))),
                    );
                }
                waits.push(Either::Right(handle));
            }
        }
    }

    if saw_pending {
        ValueOrFuture::from_future(future::try_join_all(waits))
    } else {
        ValueOrFuture::from_value(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oneshot::Completer;
    use futures::executor::block_on;
    use std::future::IntoFuture;

    #[test]
    fn all_fulfilled_joins_synchronously() {
        let joined = join_all((1..=3).map(ValueOrFuture::<i32, String>::from_value));
        assert_eq!(joined.resolve().now(), Some(Ok(vec![1, 2, 3])));
    }

    #[test]
    fn empty_batch_joins_synchronously() {
        let joined = join_all(Vec::<ValueOrFuture<i32, String>>::new());
        assert_eq!(joined.resolve().now(), Some(Ok(vec![])));
    }

    #[test]
    fn first_rejection_wins_without_touching_later_entries() {
        let untouched = ValueOrFuture::<i32, String>::from_future(async {
            panic!("entry after the rejection was polled")
        });
        let joined = join_all(vec![
            ValueOrFuture::from_value(1),
            ValueOrFuture::from_error("boom".to_string()),
            untouched,
        ]);
        assert_eq!(joined.resolve().now(), Some(Err("boom".to_string())));
    }

    #[test]
    fn pending_entry_defers_the_batch_but_keeps_order() {
        let (completer, waiter) = Completer::<Result<i32, String>>::new();
        let joined = join_all(vec![
            ValueOrFuture::from_value(1),
            ValueOrFuture::from_future(async move { waiter.await.expect("completer kept") }),
            ValueOrFuture::from_value(3),
        ]);
        assert!(joined.is_pending());
        completer.settle(Ok(2));
        assert_eq!(block_on(joined.into_future()), Ok(vec![1, 2, 3]));
    }

    #[test]
    fn rejection_during_the_wait_fails_the_join() {
        let (completer, waiter) = Completer::<Result<i32, String>>::new();
        let joined = join_all(vec![
            ValueOrFuture::from_value(1),
            ValueOrFuture::from_future(async move { waiter.await.expect("completer kept") }),
        ]);
        completer.settle(Err("late failure".to_string()));
        assert_eq!(
            block_on(joined.into_future()),
            Err("late failure".to_string())
        );
    }
}
