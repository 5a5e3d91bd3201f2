use super::backend::{BackendDescriptor, HwdecBackend};
use super::context::{DecoderContext, HwdecInfo};
use super::session::{configure, teardown, HardwareLayer};
use hwdec_types::{HwdecError, HwdecType, ImageFormat};

pub const VIDEOTOOLBOX: BackendDescriptor = BackendDescriptor {
    hwdec_type: HwdecType::VideoToolbox,
    image_format: ImageFormat::VideoToolbox,
};

/// VideoToolbox backend. Session creation is delegated to `L`; the session
/// itself is only created once the first frame header gives format and size.
pub struct VideoToolboxBackend<L> {
    layer: L,
}

impl<L: HardwareLayer> VideoToolboxBackend<L> {
    pub fn new(layer: L) -> Self {
        Self { layer }
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }
}

impl<L: HardwareLayer> HwdecBackend for VideoToolboxBackend<L> {
    fn descriptor(&self) -> &BackendDescriptor {
        &VIDEOTOOLBOX
    }

    fn probe(&self, mut info: Option<&mut HwdecInfo>, decoder: &str) -> Result<(), HwdecError> {
        let api_name = VIDEOTOOLBOX.api_name();
        if let Some(info) = info.as_deref_mut() {
            info.request_api(api_name);
        }

        match info {
            Some(info) if info.hwctx.is_some() => Ok(()),
            _ => {
                log::debug!("no {} context available for {}", api_name, decoder);
                Err(HwdecError::no_hardware_context(api_name))
            }
        }
    }

    fn init_decoder(
        &self,
        ctx: &mut DecoderContext,
        format: ImageFormat,
        width: u32,
        height: u32,
    ) -> Result<(), HwdecError> {
        configure(&self.layer, ctx, format, width, height)
    }

    fn uninit(&self, ctx: &mut DecoderContext) {
        teardown(ctx);
    }
}
