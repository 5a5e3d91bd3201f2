use super::context::{CodecContext, DecoderContext, HwAccelAttachment};
use super::report::{format_diagnostic, report};
use hwdec_types::{HwdecError, ImageFormat};
use log::Level;

pub const INIT_FAILED_MESSAGE: &str = "failed to init hardware decoder";

/// An active decode session owned by the platform hardware layer.
pub trait HardwareSession {
    /// Tears the session down. Called exactly once per session, while the
    /// codec context's attachment (if any) is still installed.
    fn invalidate(self: Box<Self>, attachment: Option<&HwAccelAttachment>);
}

/// Platform hardware layer that creates decode sessions.
pub trait HardwareLayer {
    /// Creates a session for `format` at `width`x`height`.
    ///
    /// Errors carry the layer's negative status code (FFmpeg `AVERROR`
    /// convention). The codec context's attachment slot is already installed
    /// when this is called.
    fn create_session(
        &self,
        codec: &mut CodecContext,
        format: ImageFormat,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn HardwareSession>, i32>;
}

/// Ownership wrapper around a live hardware session. The session is
/// invalidated when the handle is invalidated explicitly or dropped; a
/// dropped handle has no attachment to hand over.
pub struct SessionHandle {
    inner: Option<Box<dyn HardwareSession>>,
}

impl SessionHandle {
    pub fn new(session: Box<dyn HardwareSession>) -> Self {
        Self {
            inner: Some(session),
        }
    }

    pub fn invalidate(mut self, attachment: Option<&HwAccelAttachment>) {
        self.release(attachment);
    }

    fn release(&mut self, attachment: Option<&HwAccelAttachment>) {
        if let Some(session) = self.inner.take() {
            session.invalidate(attachment);
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.release(None);
    }
}

/// Replaces the decoder's session with a fresh one for the given format and size.
///
/// On failure the freshly installed attachment is left in the slot; the next
/// configure or [`teardown`] reclaims it.
pub fn configure<L: HardwareLayer + ?Sized>(
    layer: &L,
    ctx: &mut DecoderContext,
    format: ImageFormat,
    width: u32,
    height: u32,
) -> Result<(), HwdecError> {
    let Some(codec) = ctx.codec.as_mut() else {
        let line = format!("{}: no codec context", INIT_FAILED_MESSAGE);
        ctx.log.emit(Level::Error, &line);
        return Err(HwdecError::hardware_init_failed(line));
    };

    codec.invalidate_session();
    codec.hwaccel_context = Some(Box::new(HwAccelAttachment::default()));

    match layer.create_session(codec, format, width, height) {
        Ok(session) => {
            codec.session = Some(SessionHandle::new(session));
            log::debug!(
                "created hardware session for {} {:?} {}x{}",
                codec.codec_name(),
                format,
                width,
                height
            );
            Ok(())
        }
        Err(status) => {
            report(ctx.log.as_ref(), Level::Error, INIT_FAILED_MESSAGE, status);
            Err(HwdecError::hardware_init_failed(format_diagnostic(
                INIT_FAILED_MESSAGE,
                status,
            )))
        }
    }
}

/// Invalidates the session, then releases the attachment. Safe to repeat.
pub fn teardown(ctx: &mut DecoderContext) {
    if let Some(codec) = ctx.codec.as_mut() {
        codec.invalidate_session();
        codec.hwaccel_context = None;
    }
}
