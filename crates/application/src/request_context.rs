use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use podwarden_core::{AppError, AppResult, UserIdentity};
use tokio::sync::Notify;
use tokio::time::Instant;

/// Shared cancellation signal for one request.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<CancellationState>,
}

#[derive(Debug, Default)]
struct CancellationState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    /// Creates a non-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation to every clone of this token.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    /// Returns whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Completes once the token is cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Per-request scope: the acting user plus cancellation and deadline.
#[derive(Debug, Clone)]
pub struct RequestContext {
    actor: UserIdentity,
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Creates a context without a deadline.
    #[must_use]
    pub fn new(actor: UserIdentity) -> Self {
        Self {
            actor,
            cancellation: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Sets a deadline `timeout` from now.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now().checked_add(timeout);
        self
    }

    /// Replaces the cancellation token, letting the caller cancel the request.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Returns the acting user.
    #[must_use]
    pub fn actor(&self) -> &UserIdentity {
        &self.actor
    }

    /// Returns the request cancellation token.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Fails with [`AppError::Cancelled`] once the request was cancelled or timed out.
    pub fn ensure_active(&self) -> AppResult<()> {
        if self.cancellation.is_cancelled() {
            return Err(AppError::Cancelled("request was cancelled".to_owned()));
        }

        if self
            .deadline
            .is_some_and(|deadline| deadline <= Instant::now())
        {
            return Err(AppError::Cancelled("request deadline elapsed".to_owned()));
        }

        Ok(())
    }

    /// Runs one backend call, aborting it on cancellation or deadline.
    pub async fn run<T, F>(&self, operation: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        self.ensure_active()?;

        let guarded = async {
            tokio::select! {
                biased;
                () = self.cancellation.cancelled() => {
                    Err(AppError::Cancelled("request was cancelled".to_owned()))
                }
                result = operation => result,
            }
        };

        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .map_err(|_| AppError::Cancelled("request deadline elapsed".to_owned()))?,
            None => guarded.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use podwarden_core::{AppError, UserIdentity};

    use super::{CancellationToken, RequestContext};

    fn context() -> RequestContext {
        RequestContext::new(UserIdentity::new("alice"))
    }

    #[tokio::test]
    async fn cancelled_context_skips_the_operation() {
        let token = CancellationToken::new();
        let ctx = context().with_cancellation(token.clone());
        token.cancel();

        let result = ctx.run(async { Ok::<_, AppError>(1) }).await;
        assert!(matches!(result, Err(AppError::Cancelled(_))));
    }

    #[tokio::test]
    async fn cancellation_interrupts_a_pending_operation() {
        let token = CancellationToken::new();
        let ctx = context().with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, AppError>(())
            })
            .await;

        assert!(canceller.await.is_ok());
        assert!(matches!(result, Err(AppError::Cancelled(_))));
    }

    #[tokio::test]
    async fn elapsed_deadline_reports_cancellation() {
        let ctx = context().with_timeout(Duration::from_millis(5));

        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, AppError>(())
            })
            .await;

        assert!(matches!(result, Err(AppError::Cancelled(_))));
    }
}
