use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use syllabix_logging::syllabix_info;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::JobId;

/// Handle to one open push channel.
///
/// Clones share the channel. It closes on the first of: [`Subscription::unsubscribe`],
/// an elapsed [`Subscription::close_after`], or the last clone being dropped.
#[derive(Debug, Clone)]
pub struct Subscription {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    job_id: JobId,
    token: CancellationToken,
    closed: AtomicBool,
    runtime: Handle,
}

impl Subscription {
    pub(crate) fn new(job_id: JobId, token: CancellationToken, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(Inner {
                job_id,
                token,
                closed: AtomicBool::new(false),
                runtime,
            }),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.inner.job_id
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Closes the channel now. Returns `true` only for the call that closed it.
    pub fn unsubscribe(&self) -> bool {
        self.inner.close()
    }

    /// Closes the channel once `delay` has elapsed, unless it closes earlier.
    pub fn close_after(&self, delay: Duration) {
        if delay.is_zero() {
            self.unsubscribe();
            return;
        }
        let inner = self.inner.clone();
        self.inner.runtime.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    inner.close();
                }
                _ = inner.token.cancelled() => {}
            }
        });
    }
}

impl Inner {
    fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.token.cancel();
        syllabix_info!("Closed processing stream for job {}", self.job_id);
        true
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.token.cancel();
        }
    }
}
