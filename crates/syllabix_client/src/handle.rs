use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use crate::source::ChannelStreamSink;
use crate::upload::{JobSubmitter, ReqwestSubmitter, UploadError, UploadReceipt};
use crate::{
    ClientEvent, ClientSettings, FailureKind, JobId, ReqwestEventSource, StreamClient, StreamError,
    Subscription,
};

/// Owns the background runtime that streams and uploads run on, for use
/// from a synchronous UI loop.
pub struct StreamHandle {
    runtime: tokio::runtime::Runtime,
    client: StreamClient,
    submitter: ReqwestSubmitter,
}

/// One job's subscription together with the events it reports. Each
/// subscription gets its own channel, so views never see another job's events.
pub struct JobStream {
    subscription: Subscription,
    events: mpsc::Receiver<ClientEvent>,
}

impl JobStream {
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.events.try_recv().ok()
    }
}

impl StreamHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, StreamError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("syllabix-stream")
            .enable_all()
            .build()
            .map_err(|err| StreamError::new(FailureKind::Runtime, err.to_string()))?;
        let source = Arc::new(ReqwestEventSource::new(settings.clone()));
        let client = StreamClient::new(source, settings.reconnect, runtime.handle().clone());

        Ok(Self {
            runtime,
            client,
            submitter: ReqwestSubmitter::new(settings),
        })
    }

    pub fn subscribe(&self, job_id: impl Into<JobId>) -> JobStream {
        let (event_tx, events) = mpsc::channel();
        let sink = Arc::new(ChannelStreamSink::new(event_tx));
        JobStream {
            subscription: self.client.subscribe(job_id, sink),
            events,
        }
    }

    /// Blocks until the upload finishes.
    pub fn upload(&self, files: &[PathBuf]) -> Result<UploadReceipt, UploadError> {
        self.runtime.block_on(self.submitter.submit(files))
    }
}
