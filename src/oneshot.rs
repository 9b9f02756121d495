//! A one-shot completion pair: a [`Completer`] that settles exactly once and
//! the [`Waiter`] future it wakes. This is the host primitive for handing a
//! not-yet-known outcome to
//! [`ValueOrFuture::from_future`](crate::ValueOrFuture::from_future).

use std::mem;
use std::sync::{Arc, Mutex};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll, Waker},
};

use crate::Error;

/// Settles the paired [`Waiter`] exactly once, from any thread. Consuming
/// `self` in [`settle`](Self::settle) is what enforces the once.
///
/// # Examples
///
/// ```
/// use futures::executor::block_on;
/// use std::thread;
/// use value_or_future::oneshot::Completer;
///
/// let (completer, waiter) = Completer::<String>::new();
/// let task = thread::spawn(move || block_on(async {
///     assert_eq!(waiter.await.unwrap(), "done");
/// }));
/// completer.settle("done".into());
/// task.join().expect("waiter thread panicked");
/// ```
#[derive(Debug)]
pub struct Completer<T> {
    shared: Arc<Mutex<Inner<T>>>,
}

/// Future half of the pair. Yields whatever the completer settles, or
/// [`Error::CompleterDropped`] if the completer goes away first.
#[derive(Debug)]
pub struct Waiter<T> {
    shared: Arc<Mutex<Inner<T>>>,
}

#[derive(Debug)]
enum WakerSlot {
    Empty,
    Waiting(Waker),
    Closed,
}

#[derive(Debug)]
struct Inner<T> {
    settled: Option<Result<T, Error>>,
    waker: WakerSlot,
}

impl<T> Completer<T> {
    pub fn new() -> (Self, Waiter<T>) {
        let shared = Arc::new(Mutex::new(Inner {
            settled: None,
            waker: WakerSlot::Empty,
        }));
        (
            Completer {
                shared: shared.clone(),
            },
            Waiter { shared },
        )
    }

    /// Delivers the value and wakes the waiter.
    pub fn settle(self, value: T) {
        let mut inner = self.shared.lock().unwrap();
        inner.settled = Some(Ok(value));
        if let WakerSlot::Waiting(waker) = mem::replace(&mut inner.waker, WakerSlot::Closed) {
            waker.wake();
        }
    }
}

impl<T> Drop for Completer<T> {
    /// An unsettled completer closes the slot and wakes the waiter with an
    /// error.
    fn drop(&mut self) {
        let mut inner = self.shared.lock().unwrap();
        if let WakerSlot::Waiting(waker) = mem::replace(&mut inner.waker, WakerSlot::Closed) {
            waker.wake();
        }
    }
}

impl<T> Future for Waiter<T> {
    type Output = Result<T, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = self.shared.lock().unwrap();
        match inner.settled.take() {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                if matches!(inner.waker, WakerSlot::Closed) {
                    return Poll::Ready(Err(Error::CompleterDropped));
                }
                inner.waker = WakerSlot::Waiting(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
