//! Syllabix client: push-channel subscription and job upload over HTTP.
mod client;
mod handle;
mod settings;
mod source;
mod sse;
mod subscription;
mod types;
mod upload;

pub use client::StreamClient;
pub use handle::{JobStream, StreamHandle};
pub use settings::{ClientSettings, ReconnectPolicy, DEFAULT_SERVER_URL};
pub use source::{
    CallbackSink, ChannelStreamSink, EventSource, ReqwestEventSource, StreamEnd, StreamSink,
};
pub use sse::{SseDecoder, SseFrame};
pub use subscription::Subscription;
pub use types::{ClientEvent, FailureKind, JobId, StreamError};
pub use upload::{JobSubmitter, ReqwestSubmitter, UploadError, UploadReceipt, UploadedFile};
