use std::sync::Arc;

use syllabix_core::StreamEvent;
use syllabix_logging::syllabix_debug;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::source::{pump, CallbackSink};
use crate::{EventSource, JobId, ReconnectPolicy, StreamError, StreamSink, Subscription};

/// Opens push-channel subscriptions on a tokio runtime.
#[derive(Clone)]
pub struct StreamClient {
    source: Arc<dyn EventSource>,
    reconnect: ReconnectPolicy,
    runtime: Handle,
}

impl StreamClient {
    pub fn new(source: Arc<dyn EventSource>, reconnect: ReconnectPolicy, runtime: Handle) -> Self {
        Self {
            source,
            reconnect,
            runtime,
        }
    }

    /// Starts streaming `job_id` into `sink` until the returned subscription closes.
    pub fn subscribe(&self, job_id: impl Into<JobId>, sink: Arc<dyn StreamSink>) -> Subscription {
        let job_id = job_id.into();
        let token = CancellationToken::new();
        let source = self.source.clone();
        let policy = self.reconnect;
        let cancel = token.clone();
        let task_job_id = job_id.clone();

        syllabix_debug!("Subscribing to job {}", job_id);
        self.runtime.spawn(async move {
            pump(source.as_ref(), &task_job_id, sink.as_ref(), policy, cancel).await;
        });
        Subscription::new(job_id, token, self.runtime.clone())
    }

    /// Callback form of [`StreamClient::subscribe`].
    pub fn subscribe_with<M, F>(
        &self,
        job_id: impl Into<JobId>,
        on_message: M,
        on_failure: F,
    ) -> Subscription
    where
        M: Fn(StreamEvent) + Send + Sync + 'static,
        F: Fn(StreamError) + Send + Sync + 'static,
    {
        self.subscribe(job_id, Arc::new(CallbackSink::new(on_message, on_failure)))
    }
}
