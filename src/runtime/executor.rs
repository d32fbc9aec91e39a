use crate::runtime::outcome::BatchOutcome;
use anyhow::Error as AnyError;
use core::future::Future;
use futures::future::{BoxFuture, FutureExt};
use std::marker::PhantomData;

pub type ExecutorFuture<'a, K, E> = BoxFuture<'a, BatchOutcome<K, E>>;

/// Capability invoked once per transaction (and again for every retry).
///
/// The concurrent runner keeps many `execute` futures alive at once, so implementations must
/// tolerate overlapping calls through `&self`.
pub trait BatchExecutor<T>: Send + Sync {
    type Output: Send;
    type Error: Send;

    fn execute<'a>(&'a self, records: &'a [T]) -> ExecutorFuture<'a, Self::Output, Self::Error>;
}

impl<T, X> BatchExecutor<T> for &X
where
    X: BatchExecutor<T> + ?Sized,
{
    type Output = X::Output;
    type Error = X::Error;

    fn execute<'a>(&'a self, records: &'a [T]) -> ExecutorFuture<'a, Self::Output, Self::Error> {
        (**self).execute(records)
    }
}

/// Adapter that turns a closure into a [`BatchExecutor`].
///
/// The closure sees the transaction's records synchronously and returns a future that owns
/// whatever it needs, e.g. `|batch| { let sum = batch.iter().sum(); async move { ... } }`.
pub struct FnExecutor<F, K, E> {
    f: F,
    _marker: PhantomData<fn() -> (K, E)>,
}

/// Wraps `f` so it can be passed to the runners.
pub fn executor_fn<T, K, E, F, Fut>(f: F) -> FnExecutor<F, K, E>
where
    F: Fn(&[T]) -> Fut + Send + Sync,
    Fut: Future<Output = BatchOutcome<K, E>> + Send + 'static,
{
    FnExecutor {
        f,
        _marker: PhantomData,
    }
}

impl<T, K, E, F, Fut> BatchExecutor<T> for FnExecutor<F, K, E>
where
    F: Fn(&[T]) -> Fut + Send + Sync,
    Fut: Future<Output = BatchOutcome<K, E>> + Send + 'static,
    K: Send,
    E: Send,
{
    type Output = K;
    type Error = E;

    fn execute<'a>(&'a self, records: &'a [T]) -> ExecutorFuture<'a, K, E> {
        (self.f)(records).boxed()
    }
}

/// Convenience alias for executors whose failures carry an [`anyhow::Error`].
pub type AnyOutcome<K> = BatchOutcome<K, AnyError>;
