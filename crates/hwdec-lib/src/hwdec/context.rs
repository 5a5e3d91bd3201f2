use super::report::{DiagnosticSink, LogSink};
use super::session::SessionHandle;
use hwdec_types::{HwdecType, ImageFormat};
use std::any::Any;
use std::sync::Arc;

/// Accelerator instance made available by the host.
///
/// The payload is type-erased: backends that need the concrete device (for
/// example an FFmpeg device buffer) downcast it. The host creates and owns
/// it; decoders only hold shared references.
pub struct HardwareContext {
    hwdec_type: HwdecType,
    handle: Box<dyn Any + Send + Sync>,
}

impl HardwareContext {
    pub fn new<T: Any + Send + Sync>(hwdec_type: HwdecType, handle: T) -> Arc<Self> {
        Arc::new(Self {
            hwdec_type,
            handle: Box::new(handle),
        })
    }

    pub fn hwdec_type(&self) -> HwdecType {
        self.hwdec_type
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.handle.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for HardwareContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HardwareContext")
            .field("hwdec_type", &self.hwdec_type)
            .finish_non_exhaustive()
    }
}

/// Host callback resolving an API name to a hardware context.
pub type ApiLoader = Box<dyn FnMut(&str) -> Option<Arc<HardwareContext>>>;

/// Hardware information the host exposes to backend probes.
#[derive(Default)]
pub struct HwdecInfo {
    pub hwctx: Option<Arc<HardwareContext>>,
    load_api: Option<ApiLoader>,
}

impl HwdecInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(hwctx: Arc<HardwareContext>) -> Self {
        Self {
            hwctx: Some(hwctx),
            load_api: None,
        }
    }

    pub fn with_loader(loader: ApiLoader) -> Self {
        Self {
            hwctx: None,
            load_api: Some(loader),
        }
    }

    /// Asks the host to bind `api_name` as the active acceleration API.
    /// Ignored when a context is already bound or no loader is installed.
    pub fn request_api(&mut self, api_name: &str) {
        if self.hwctx.is_some() {
            return;
        }
        if let Some(load) = self.load_api.as_mut() {
            self.hwctx = load(api_name);
        }
    }
}

impl std::fmt::Debug for HwdecInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HwdecInfo")
            .field("hwctx", &self.hwctx)
            .field("load_api", &self.load_api.is_some())
            .finish()
    }
}

/// Per-session data the hardware layer keeps on the codec context.
/// Installed zeroed on every configure and filled by the layer on success.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HwAccelAttachment {
    pub sw_format: Option<ImageFormat>,
    pub width: u32,
    pub height: u32,
    pub session_serial: u64,
}

/// Execution context of the host codec.
pub struct CodecContext {
    codec_name: String,
    pub width: u32,
    pub height: u32,
    pub sw_format: Option<ImageFormat>,
    pub hw_device: Option<Arc<HardwareContext>>,
    // A session may reference the attachment while it is invalidated; the
    // attachment is only released after the session is gone.
    pub(crate) session: Option<SessionHandle>,
    pub(crate) hwaccel_context: Option<Box<HwAccelAttachment>>,
}

impl CodecContext {
    pub fn new(codec_name: impl Into<String>) -> Self {
        Self {
            codec_name: codec_name.into(),
            width: 0,
            height: 0,
            sw_format: None,
            hw_device: None,
            session: None,
            hwaccel_context: None,
        }
    }

    pub fn with_hw_device(mut self, hw_device: Arc<HardwareContext>) -> Self {
        self.hw_device = Some(hw_device);
        self
    }

    pub fn codec_name(&self) -> &str {
        &self.codec_name
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn hwaccel_context(&self) -> Option<&HwAccelAttachment> {
        self.hwaccel_context.as_deref()
    }

    pub fn hwaccel_context_mut(&mut self) -> Option<&mut HwAccelAttachment> {
        self.hwaccel_context.as_deref_mut()
    }

    /// Invalidates the live session, if any.
    pub(crate) fn invalidate_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.invalidate(self.hwaccel_context.as_deref());
        }
    }
}

impl Drop for CodecContext {
    fn drop(&mut self) {
        self.invalidate_session();
    }
}

impl std::fmt::Debug for CodecContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecContext")
            .field("codec_name", &self.codec_name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sw_format", &self.sw_format)
            .field("hw_device", &self.hw_device)
            .field("session", &self.session.is_some())
            .field("hwaccel_context", &self.hwaccel_context)
            .finish()
    }
}

/// Per-instance decoder state the host hands to every backend call.
pub struct DecoderContext {
    pub codec: Option<CodecContext>,
    pub(crate) log: Box<dyn DiagnosticSink>,
}

impl DecoderContext {
    pub fn new(codec: Option<CodecContext>) -> Self {
        Self::with_sink(codec, Box::new(LogSink::default()))
    }

    pub fn with_sink(codec: Option<CodecContext>, log: Box<dyn DiagnosticSink>) -> Self {
        Self { codec, log }
    }

    pub fn log(&self) -> &dyn DiagnosticSink {
        self.log.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn request_api_uses_loader_once_context_unset() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let mut info = HwdecInfo::with_loader(Box::new(move |api: &str| {
            seen.set(seen.get() + 1);
            assert_eq!(api, "videotoolbox");
            Some(HardwareContext::new(HwdecType::VideoToolbox, ()))
        }));

        info.request_api("videotoolbox");
        info.request_api("videotoolbox");

        assert_eq!(calls.get(), 1);
        assert_eq!(
            info.hwctx.as_ref().map(|ctx| ctx.hwdec_type()),
            Some(HwdecType::VideoToolbox)
        );
    }

    #[test]
    fn request_api_keeps_bound_context() {
        let bound = HardwareContext::new(HwdecType::Cuda, 7u32);
        let mut info = HwdecInfo::with_context(bound.clone());
        info.request_api("videotoolbox");
        let hwctx = info.hwctx.expect("context stays bound");
        assert!(Arc::ptr_eq(&hwctx, &bound));
        assert_eq!(hwctx.downcast_ref::<u32>(), Some(&7));
        assert_eq!(hwctx.downcast_ref::<String>(), None);
    }

    #[test]
    fn new_codec_context_has_empty_slots() {
        let codec = CodecContext::new("h264");
        assert_eq!(codec.codec_name(), "h264");
        assert!(!codec.has_session());
        assert!(codec.hwaccel_context().is_none());
    }
}
