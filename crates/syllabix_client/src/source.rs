use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use syllabix_core::StreamEvent;
use syllabix_logging::{syllabix_debug, syllabix_info, syllabix_warn};
use tokio_util::sync::CancellationToken;

use crate::sse::{SseDecoder, SseFrame};
use crate::{ClientEvent, ClientSettings, FailureKind, StreamError};

const EVENT_STREAM: &str = "text/event-stream";

/// Receiver for everything a subscription reports.
pub trait StreamSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

/// Forwards events into a std channel drained by the UI loop.
pub struct ChannelStreamSink {
    tx: std::sync::mpsc::Sender<ClientEvent>,
}

impl ChannelStreamSink {
    pub fn new(tx: std::sync::mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl StreamSink for ChannelStreamSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}

/// Adapts an `on_message` / `on_failure` callback pair into a sink. Other
/// channel notifications are only logged.
pub struct CallbackSink<M, F> {
    on_message: M,
    on_failure: F,
}

impl<M, F> CallbackSink<M, F>
where
    M: Fn(StreamEvent) + Send + Sync,
    F: Fn(StreamError) + Send + Sync,
{
    pub fn new(on_message: M, on_failure: F) -> Self {
        Self {
            on_message,
            on_failure,
        }
    }
}

impl<M, F> StreamSink for CallbackSink<M, F>
where
    M: Fn(StreamEvent) + Send + Sync,
    F: Fn(StreamError) + Send + Sync,
{
    fn emit(&self, event: ClientEvent) {
        match event {
            ClientEvent::Message(event) => (self.on_message)(event),
            ClientEvent::Failed(error) => (self.on_failure)(error),
            other => syllabix_debug!("Channel notification: {:?}", other),
        }
    }
}

/// How a single connection ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The server closed the stream after a terminal event.
    Terminal,
    /// The server closed the stream before any terminal event.
    EndedEarly,
    /// The subscription was closed locally.
    Cancelled,
}

/// One push-channel transport. Implementations stream a single connection;
/// reconnecting is the caller's business.
#[async_trait::async_trait]
pub trait EventSource: Send + Sync {
    async fn connect(
        &self,
        job_id: &str,
        sink: &dyn StreamSink,
        cancel: &CancellationToken,
    ) -> Result<StreamEnd, StreamError>;
}

/// Server-sent events over HTTP.
#[derive(Debug, Clone)]
pub struct ReqwestEventSource {
    settings: ClientSettings,
}

impl ReqwestEventSource {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, StreamError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .build()
            .map_err(|err| StreamError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl EventSource for ReqwestEventSource {
    async fn connect(
        &self,
        job_id: &str,
        sink: &dyn StreamSink,
        cancel: &CancellationToken,
    ) -> Result<StreamEnd, StreamError> {
        let url = self.settings.stream_url(job_id)?;
        let client = self.build_client()?;

        let request = client
            .get(url.clone())
            .header(ACCEPT, EVENT_STREAM)
            .header(CACHE_CONTROL, "no-cache")
            .send();
        let response = tokio::select! {
            _ = cancel.cancelled() => return Ok(StreamEnd::Cancelled),
            response = request => response.map_err(map_reqwest_error)?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_event_stream(&content_type) {
            return Err(StreamError::new(
                FailureKind::UnexpectedContentType { content_type },
                "expected an event stream",
            ));
        }

        syllabix_info!("Opened processing stream {}", url);
        sink.emit(ClientEvent::Opened);

        let mut decoder = SseDecoder::new();
        let mut saw_terminal = false;
        let mut stream = response.bytes_stream();
        loop {
            let chunk = tokio::select! {
                _ = cancel.cancelled() => return Ok(StreamEnd::Cancelled),
                chunk = stream.next() => chunk,
            };
            let Some(chunk) = chunk else {
                if decoder.has_pending() {
                    syllabix_debug!("Dropping unterminated event at end of stream for job {}", job_id);
                }
                return Ok(if saw_terminal {
                    StreamEnd::Terminal
                } else {
                    StreamEnd::EndedEarly
                });
            };
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) if saw_terminal => {
                    syllabix_debug!("Ignoring transport error after the job ended: {}", err);
                    return Ok(StreamEnd::Terminal);
                }
                Err(err) => return Err(map_reqwest_error(err)),
            };
            for frame in decoder.push(&chunk) {
                if cancel.is_cancelled() {
                    return Ok(StreamEnd::Cancelled);
                }
                saw_terminal |= forward_frame(job_id, frame, sink);
            }
        }
    }
}

/// Decodes and forwards one frame. Returns whether it carried a terminal event.
fn forward_frame(job_id: &str, frame: SseFrame, sink: &dyn StreamSink) -> bool {
    if let Some(kind) = frame.event.as_deref().filter(|kind| *kind != "message") {
        syllabix_debug!("Skipping '{}' event for job {}", kind, job_id);
        return false;
    }
    match StreamEvent::from_json(&frame.data) {
        Ok(event) => {
            let terminal = event.is_terminal();
            sink.emit(ClientEvent::Message(event));
            terminal
        }
        Err(err) => {
            syllabix_warn!(
                "Discarding malformed payload for job {}: {} ({} bytes)",
                job_id,
                err,
                frame.data.len()
            );
            sink.emit(ClientEvent::Malformed {
                reason: err.to_string(),
            });
            false
        }
    }
}

fn is_event_stream(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(EVENT_STREAM))
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> StreamError {
    if err.is_timeout() {
        return StreamError::new(FailureKind::Timeout, err.to_string());
    }
    StreamError::new(FailureKind::Network, err.to_string())
}

/// Wraps the caller's sink to note what one connection delivered.
struct DeliveryTracker<'a> {
    inner: &'a dyn StreamSink,
    delivered: AtomicBool,
    terminal: AtomicBool,
}

impl<'a> DeliveryTracker<'a> {
    fn new(inner: &'a dyn StreamSink) -> Self {
        Self {
            inner,
            delivered: AtomicBool::new(false),
            terminal: AtomicBool::new(false),
        }
    }
}

impl StreamSink for DeliveryTracker<'_> {
    fn emit(&self, event: ClientEvent) {
        if let ClientEvent::Message(message) = &event {
            self.delivered.store(true, Ordering::Relaxed);
            if message.is_terminal() {
                self.terminal.store(true, Ordering::Relaxed);
            }
        }
        self.inner.emit(event);
    }
}

/// Drives `source` until the job ends, the subscription is cancelled or
/// reconnects are exhausted. Emits [`ClientEvent::Closed`] last.
///
/// The retry budget is per outage: a connection that delivered a message
/// starts the count again.
pub(crate) async fn pump(
    source: &dyn EventSource,
    job_id: &str,
    sink: &dyn StreamSink,
    policy: crate::ReconnectPolicy,
    cancel: CancellationToken,
) {
    let mut attempt = 0;
    loop {
        let tracker = DeliveryTracker::new(sink);
        let result = source.connect(job_id, &tracker, &cancel).await;
        if tracker.terminal.load(Ordering::Relaxed) {
            break;
        }
        let error = match result {
            Ok(StreamEnd::Terminal) | Ok(StreamEnd::Cancelled) => break,
            Ok(StreamEnd::EndedEarly) => StreamError::new(
                FailureKind::EndedEarly,
                "server closed the stream before the job finished",
            ),
            Err(err) => err,
        };
        if cancel.is_cancelled() {
            break;
        }
        if !error.kind.is_retryable() {
            sink.emit(ClientEvent::Failed(error));
            break;
        }

        if tracker.delivered.load(Ordering::Relaxed) {
            attempt = 0;
        }
        attempt += 1;
        let Some(delay) = policy.delay_for(attempt) else {
            sink.emit(ClientEvent::Failed(error));
            break;
        };
        syllabix_warn!(
            "Stream for job {} dropped ({}), retry {} in {:?}",
            job_id,
            error,
            attempt,
            delay
        );
        sink.emit(ClientEvent::Reconnecting { attempt, delay });
        if !sleep_unless_cancelled(delay, &cancel).await {
            break;
        }
    }
    sink.emit(ClientEvent::Closed);
}

async fn sleep_unless_cancelled(delay: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_stream_content_type_ignores_parameters() {
        assert!(is_event_stream("text/event-stream; charset=utf-8"));
        assert!(is_event_stream("Text/Event-Stream"));
        assert!(!is_event_stream("application/json"));
        assert!(!is_event_stream(""));
    }
}
