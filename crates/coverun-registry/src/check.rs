//! Cover callables and the check result protocol
//!
//! A [`Cover`] is a zero-argument verification function discovered in the
//! merged namespace. Its return value is a [`CheckResult`]: the protocol's
//! result shapes as one tagged union, decided once at the boundary where
//! the callable returns instead of being re-inspected downstream.
//!
//! A [`Checker`] is one concrete assertion produced by a cover — a
//! run-once boolean callable, optionally carrying the literal expression
//! text used for display (see [`checker!`]).

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Finite ordered sequence of checkers (arrays and lazy sequences alike;
/// consumed exactly once).
pub type CheckerSeq = Box<dyn Iterator<Item = Checker> + Send>;

/// Asynchronous sequence of checkers, driven strictly one element at a
/// time.
pub type CheckerStream = BoxStream<'static, Checker>;

enum CheckerBody {
    Sync(Box<dyn FnOnce() -> anyhow::Result<bool> + Send>),
    Future(BoxFuture<'static, anyhow::Result<bool>>),
}

/// One concrete assertion.
pub struct Checker {
    text: Option<String>,
    body: CheckerBody,
}

impl Checker {
    /// Checker from a synchronous closure.
    pub fn new(f: impl FnOnce() -> anyhow::Result<bool> + Send + 'static) -> Self {
        Self {
            text: None,
            body: CheckerBody::Sync(Box::new(f)),
        }
    }

    /// Checker from a synchronous closure, with display text.
    pub fn with_text(
        text: impl Into<String>,
        f: impl FnOnce() -> anyhow::Result<bool> + Send + 'static,
    ) -> Self {
        Self {
            text: Some(text.into()),
            body: CheckerBody::Sync(Box::new(f)),
        }
    }

    /// Checker that must be awaited (used inside async sequences).
    pub fn future(fut: impl Future<Output = anyhow::Result<bool>> + Send + 'static) -> Self {
        Self {
            text: None,
            body: CheckerBody::Future(fut.boxed()),
        }
    }

    /// Awaitable checker with display text.
    pub fn future_with_text(
        text: impl Into<String>,
        fut: impl Future<Output = anyhow::Result<bool>> + Send + 'static,
    ) -> Self {
        Self {
            text: Some(text.into()),
            body: CheckerBody::Future(fut.boxed()),
        }
    }

    /// Literal expression text, when the producer supplied one.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Evaluate the assertion. Synchronous bodies complete without
    /// yielding; future bodies are awaited.
    pub async fn eval(self) -> anyhow::Result<bool> {
        match self.body {
            CheckerBody::Sync(f) => f(),
            CheckerBody::Future(fut) => fut.await,
        }
    }
}

impl fmt::Debug for Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checker").field("text", &self.text).finish_non_exhaustive()
    }
}

/// Everything a cover function may resolve to.
pub enum CheckResult {
    /// No verdict returned: completing without an error is itself the
    /// signal, treated as a pass.
    Implicit,

    /// Direct boolean verdict.
    Verdict(bool),

    /// A single checker to invoke.
    Single(Checker),

    /// A finite ordered sequence of checkers, one outcome per element.
    Many(CheckerSeq),

    /// An asynchronous sequence of checkers; each element is awaited to
    /// completion before the next is requested.
    Stream(CheckerStream),
}

impl CheckResult {
    /// Sequence result from a concrete list of checkers.
    #[must_use]
    pub fn many(checkers: Vec<Checker>) -> Self {
        Self::Many(Box::new(checkers.into_iter()))
    }
}

impl From<bool> for CheckResult {
    fn from(verdict: bool) -> Self {
        Self::Verdict(verdict)
    }
}

impl From<Checker> for CheckResult {
    fn from(checker: Checker) -> Self {
        Self::Single(checker)
    }
}

impl From<Vec<Checker>> for CheckResult {
    fn from(checkers: Vec<Checker>) -> Self {
        Self::many(checkers)
    }
}

impl fmt::Debug for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Implicit => f.write_str("Implicit"),
            Self::Verdict(v) => f.debug_tuple("Verdict").field(v).finish(),
            Self::Single(c) => f.debug_tuple("Single").field(c).finish(),
            Self::Many(_) => f.write_str("Many(..)"),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

type CoverBody = dyn Fn() -> BoxFuture<'static, anyhow::Result<CheckResult>> + Send + Sync;

/// A discovered verification function.
///
/// Covers are shared (cloning is cheap) and re-invocable; each invocation
/// produces a fresh [`CheckResult`]. An `Err` return models a check that
/// threw: the engine converts it to a failed outcome and continues.
#[derive(Clone)]
pub struct Cover {
    body: Arc<CoverBody>,
}

impl Cover {
    /// Cover from a synchronous body.
    pub fn new(
        f: impl Fn() -> anyhow::Result<CheckResult> + Send + Sync + 'static,
    ) -> Self {
        Self {
            body: Arc::new(move || {
                let result = f();
                async move { result }.boxed()
            }),
        }
    }

    /// Cover from an asynchronous body.
    pub fn new_async<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<CheckResult>> + Send + 'static,
    {
        Self {
            body: Arc::new(move || f().boxed()),
        }
    }

    /// Invoke the cover, producing the future of its result.
    #[must_use]
    pub fn invoke(&self) -> BoxFuture<'static, anyhow::Result<CheckResult>> {
        (self.body)()
    }
}

impl fmt::Debug for Cover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cover(..)")
    }
}

/// Build a [`Checker`] from a boolean expression, capturing the literal
/// expression text for display.
///
/// ```
/// use coverun_registry::checker;
/// let c = checker!(1 + 1 == 2);
/// assert_eq!(c.text(), Some("1 + 1 == 2"));
/// ```
#[macro_export]
macro_rules! checker {
    ($cond:expr) => {
        $crate::Checker::with_text(stringify!($cond), move || Ok($cond))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn sync_checker_evaluates() {
        let c = Checker::new(|| Ok(2 + 2 == 4));
        assert!(c.eval().await.unwrap());
    }

    #[tokio::test]
    async fn future_checker_evaluates() {
        let c = Checker::future(async { Ok(false) });
        assert!(!c.eval().await.unwrap());
    }

    #[tokio::test]
    async fn checker_error_is_returned_not_panicked() {
        let c = Checker::new(|| anyhow::bail!("broken fixture"));
        let err = c.eval().await.unwrap_err();
        assert!(err.to_string().contains("broken fixture"));
    }

    #[test]
    fn checker_macro_captures_expression_text() {
        let c = checker!(1 + 1 == 2);
        assert_eq!(c.text(), Some("1 + 1 == 2"));
    }

    #[tokio::test]
    async fn cover_sync_body() {
        let cover = Cover::new(|| Ok(CheckResult::Verdict(true)));
        let result = cover.invoke().await.unwrap();
        assert!(matches!(result, CheckResult::Verdict(true)));
    }

    #[tokio::test]
    async fn cover_async_body() {
        let cover = Cover::new_async(|| async { Ok(CheckResult::Implicit) });
        let result = cover.invoke().await.unwrap();
        assert!(matches!(result, CheckResult::Implicit));
    }

    #[tokio::test]
    async fn cover_is_reinvocable() {
        let cover = Cover::new(|| Ok(CheckResult::from(checker!(true))));
        for _ in 0..2 {
            match cover.invoke().await.unwrap() {
                CheckResult::Single(c) => assert!(c.eval().await.unwrap()),
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn stream_result_yields_in_order() {
        let stream: CheckerStream =
            futures::stream::iter(vec![checker!(true), checker!(false)]).boxed();
        let mut stream = match CheckResult::Stream(stream) {
            CheckResult::Stream(s) => s,
            _ => unreachable!(),
        };

        assert!(stream.next().await.unwrap().eval().await.unwrap());
        assert!(!stream.next().await.unwrap().eval().await.unwrap());
        assert!(stream.next().await.is_none());
    }
}
