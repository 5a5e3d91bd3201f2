use super::context::{DecoderContext, HwdecInfo};
use hwdec_types::{BackendInfo, HwdecError, HwdecType, ImageFormat};

/// Static identity of a backend: which API it binds and which surface format it outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendDescriptor {
    pub hwdec_type: HwdecType,
    pub image_format: ImageFormat,
}

impl BackendDescriptor {
    pub fn api_name(&self) -> &'static str {
        self.hwdec_type.api_name()
    }

    pub fn info(&self) -> BackendInfo {
        BackendInfo {
            hwdec_type: self.hwdec_type,
            image_format: self.image_format,
            api_name: self.api_name().into(),
        }
    }
}

/// Lifecycle contract the host decoder drives uniformly for every hardware backend.
///
/// The host calls `probe` once per stream, `init` once, `init_decoder`
/// whenever the stream's pixel format or dimensions change (including the
/// first frame), and `uninit` when the stream ends or the backend is dropped.
pub trait HwdecBackend {
    fn descriptor(&self) -> &BackendDescriptor;

    /// Checks whether the host exposes the hardware context this backend needs.
    fn probe(&self, info: Option<&mut HwdecInfo>, decoder: &str) -> Result<(), HwdecError>;

    fn init(&self, _ctx: &mut DecoderContext) -> Result<(), HwdecError> {
        Ok(())
    }

    /// (Re)creates the hardware session for a new format or frame size.
    fn init_decoder(
        &self,
        ctx: &mut DecoderContext,
        format: ImageFormat,
        width: u32,
        height: u32,
    ) -> Result<(), HwdecError>;

    /// Releases everything `init_decoder` created. Never fails and may be repeated.
    fn uninit(&self, ctx: &mut DecoderContext);
}
