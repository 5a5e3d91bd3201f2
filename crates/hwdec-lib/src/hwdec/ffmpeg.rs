use super::catalog::averror;
use super::context::{CodecContext, HardwareContext, HwAccelAttachment};
use super::session::{HardwareLayer, HardwareSession};
use ffmpeg_next::ffi::{
    av_buffer_unref, av_hwdevice_ctx_create, av_hwframe_ctx_alloc, av_hwframe_ctx_init,
    AVBufferRef, AVHWDeviceType, AVHWFramesContext, AVPixelFormat,
};
use hwdec_types::{HwdecError, HwdecType, ImageFormat};
use std::cell::Cell;
use std::ptr::null_mut;
use std::sync::Arc;

fn device_type(hwdec_type: HwdecType) -> AVHWDeviceType {
    match hwdec_type {
        HwdecType::VideoToolbox => AVHWDeviceType::AV_HWDEVICE_TYPE_VIDEOTOOLBOX,
        HwdecType::Vaapi => AVHWDeviceType::AV_HWDEVICE_TYPE_VAAPI,
        HwdecType::Vdpau => AVHWDeviceType::AV_HWDEVICE_TYPE_VDPAU,
        HwdecType::Cuda => AVHWDeviceType::AV_HWDEVICE_TYPE_CUDA,
        HwdecType::D3d11va => AVHWDeviceType::AV_HWDEVICE_TYPE_D3D11VA,
        HwdecType::Dxva2 => AVHWDeviceType::AV_HWDEVICE_TYPE_DXVA2,
    }
}

fn hw_pix_fmt(hwdec_type: HwdecType) -> AVPixelFormat {
    match hwdec_type {
        HwdecType::VideoToolbox => AVPixelFormat::AV_PIX_FMT_VIDEOTOOLBOX,
        HwdecType::Vaapi => AVPixelFormat::AV_PIX_FMT_VAAPI,
        HwdecType::Vdpau => AVPixelFormat::AV_PIX_FMT_VDPAU,
        HwdecType::Cuda => AVPixelFormat::AV_PIX_FMT_CUDA,
        HwdecType::D3d11va => AVPixelFormat::AV_PIX_FMT_D3D11,
        HwdecType::Dxva2 => AVPixelFormat::AV_PIX_FMT_DXVA2_VLD,
    }
}

fn sw_pix_fmt(format: ImageFormat) -> AVPixelFormat {
    match format {
        ImageFormat::Nv12 | ImageFormat::VideoToolbox => AVPixelFormat::AV_PIX_FMT_NV12,
        ImageFormat::Yuv420p => AVPixelFormat::AV_PIX_FMT_YUV420P,
        ImageFormat::Uyvy422 => AVPixelFormat::AV_PIX_FMT_UYVY422,
        ImageFormat::P010 => AVPixelFormat::AV_PIX_FMT_P010LE,
        ImageFormat::Bgra => AVPixelFormat::AV_PIX_FMT_BGRA,
    }
}

/// RAII wrapper for an FFmpeg hardware device context.
/// The host creates one per accelerator and shares it through [`HardwareContext`].
pub struct DeviceContext {
    ctx: *mut AVBufferRef,
    hwdec_type: HwdecType,
}

impl DeviceContext {
    pub fn create(hwdec_type: HwdecType) -> Result<Arc<HardwareContext>, HwdecError> {
        let mut hw_device_ctx = null_mut();

        let ret = unsafe {
            av_hwdevice_ctx_create(
                &mut hw_device_ctx,
                device_type(hwdec_type),
                std::ptr::null(),
                null_mut(),
                0,
            )
        };
        if ret < 0 || hw_device_ctx.is_null() {
            return Err(HwdecError::no_hardware_context(format!(
                "failed to create {} device context: {}",
                hwdec_type.api_name(),
                ret
            )));
        }

        Ok(HardwareContext::new(
            hwdec_type,
            Self {
                ctx: hw_device_ctx,
                hwdec_type,
            },
        ))
    }

    pub fn as_ptr(&self) -> *mut AVBufferRef {
        self.ctx
    }
}

impl Drop for DeviceContext {
    fn drop(&mut self) {
        unsafe {
            if !self.ctx.is_null() {
                av_buffer_unref(&mut self.ctx);
            }
        }
    }
}

// The device buffer is reference counted by FFmpeg and only read after creation.
unsafe impl Send for DeviceContext {}
unsafe impl Sync for DeviceContext {}

/// A hardware frames context sized for one stream configuration.
struct FramesSession {
    frames: *mut AVBufferRef,
}

impl HardwareSession for FramesSession {
    fn invalidate(mut self: Box<Self>, _attachment: Option<&HwAccelAttachment>) {
        unsafe {
            av_buffer_unref(&mut self.frames);
        }
    }
}

/// Session layer backed by FFmpeg hardware frame pools.
#[derive(Debug, Default)]
pub struct FfmpegLayer {
    sessions: Cell<u64>,
}

impl FfmpegLayer {
    /// Serial for the next session this layer creates, starting at 1.
    fn next_serial(&self) -> u64 {
        let serial = self.sessions.get() + 1;
        self.sessions.set(serial);
        serial
    }
}

impl HardwareLayer for FfmpegLayer {
    fn create_session(
        &self,
        codec: &mut CodecContext,
        format: ImageFormat,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn HardwareSession>, i32> {
        let device = codec
            .hw_device
            .as_ref()
            .and_then(|hw| hw.downcast_ref::<DeviceContext>())
            .ok_or(averror(libc::ENOSYS))?;
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(averror(libc::EINVAL));
        };
        let sw_format = if format.is_hwaccel() {
            codec.sw_format.unwrap_or(ImageFormat::Nv12)
        } else {
            format
        };

        let mut frames = unsafe { av_hwframe_ctx_alloc(device.as_ptr()) };
        if frames.is_null() {
            return Err(averror(libc::ENOMEM));
        }

        let ret = unsafe {
            let frames_ctx = (*frames).data as *mut AVHWFramesContext;
            (*frames_ctx).format = hw_pix_fmt(device.hwdec_type);
            (*frames_ctx).sw_format = sw_pix_fmt(sw_format);
            (*frames_ctx).width = w;
            (*frames_ctx).height = h;
            av_hwframe_ctx_init(frames)
        };
        if ret < 0 {
            unsafe { av_buffer_unref(&mut frames) };
            return Err(ret);
        }

        if let Some(attachment) = codec.hwaccel_context_mut() {
            attachment.sw_format = Some(sw_format);
            attachment.width = width;
            attachment.height = height;
            attachment.session_serial = self.next_serial();
        }

        Ok(Box::new(FramesSession { frames }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_device_reports_enosys() {
        let mut codec = CodecContext::new("h264");
        let err = FfmpegLayer::default()
            .create_session(&mut codec, ImageFormat::VideoToolbox, 1920, 1080)
            .err();
        assert_eq!(err, Some(crate::hwdec::catalog::AVERROR_ENOSYS));
    }

    #[test]
    fn device_of_other_kind_is_rejected() {
        let mut codec = CodecContext::new("h264")
            .with_hw_device(HardwareContext::new(HwdecType::VideoToolbox, ()));
        assert!(FfmpegLayer::default()
            .create_session(&mut codec, ImageFormat::Nv12, 64, 64)
            .is_err());
    }

    #[test]
    #[cfg(target_os = "macos")]
    fn videotoolbox_device_session() {
        let device = DeviceContext::create(HwdecType::VideoToolbox)
            .expect("VideoToolbox device context");
        let mut codec = CodecContext::new("h264").with_hw_device(device);
        codec.hwaccel_context = Some(Box::default());

        let layer = FfmpegLayer::default();
        let first = layer
            .create_session(&mut codec, ImageFormat::VideoToolbox, 1920, 1080)
            .expect("frames context");
        assert_eq!(codec.hwaccel_context().map(|a| a.width), Some(1920));
        first.invalidate(codec.hwaccel_context());

        codec.hwaccel_context = Some(Box::default());
        let second = layer
            .create_session(&mut codec, ImageFormat::VideoToolbox, 3840, 2160)
            .expect("frames context");
        assert_eq!(codec.hwaccel_context().map(|a| a.session_serial), Some(2));
        second.invalidate(codec.hwaccel_context());
    }

    #[test]
    fn session_serials_count_per_layer() {
        let layer = FfmpegLayer::default();
        assert_eq!(layer.next_serial(), 1);
        assert_eq!(layer.next_serial(), 2);
        assert_eq!(FfmpegLayer::default().next_serial(), 1);
    }
}
