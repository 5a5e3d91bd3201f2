//! Hardware decoder backends for a host video decoder.
//!
//! A backend is probed once per stream, initialized once, reconfigured for
//! every format or size change and torn down when the stream ends. Only the
//! session manager touches the hardware session and the attachment slot on
//! the codec context.
//!
//! # Thread Safety
//! A decoder instance and its backend calls belong to a single thread.
//! Hardware contexts are shared via Arc and may be used by many instances.

mod backend;
mod catalog;
mod context;
#[cfg(feature = "ffmpeg")]
mod ffmpeg;
mod lifecycle;
mod report;
mod session;
#[cfg(test)]
mod testing;
mod videotoolbox;

pub use backend::{BackendDescriptor, HwdecBackend};
pub use catalog::{classify, AVERROR_EINVAL, AVERROR_ENOSYS, AVERROR_INVALIDDATA};
pub use context::{
    ApiLoader, CodecContext, DecoderContext, HardwareContext, HwAccelAttachment, HwdecInfo,
};
#[cfg(feature = "ffmpeg")]
pub use ffmpeg::{DeviceContext, FfmpegLayer};
pub use lifecycle::{ActiveHwdec, BackendState};
pub use report::{format_diagnostic, report, DiagnosticSink, LogSink};
pub use session::{
    configure, teardown, HardwareLayer, HardwareSession, SessionHandle, INIT_FAILED_MESSAGE,
};
pub use videotoolbox::{VideoToolboxBackend, VIDEOTOOLBOX};
