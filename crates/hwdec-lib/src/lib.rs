pub mod hwdec;

#[cfg(feature = "ffmpeg")]
use ffmpeg_next as ffmpeg;
use hwdec::{format_diagnostic, VIDEOTOOLBOX};
use hwdec_types::{BackendInfo, HwdecError};

#[stabby::stabby]
#[stabby::export]
pub fn init_hwdec_lib() -> stabby::result::Result<BackendInfo, HwdecError> {
    #[cfg(feature = "ffmpeg")]
    if let Err(e) = ffmpeg::init() {
        return Err(HwdecError::library(e.to_string())).into();
    }
    Ok(VIDEOTOOLBOX.info()).into()
}

#[stabby::stabby]
#[stabby::export]
pub fn backend_info() -> BackendInfo {
    VIDEOTOOLBOX.info()
}

/// Diagnostic line for `code`, exactly as the decoder logs it.
#[stabby::stabby]
#[stabby::export]
pub fn explain_status(message: stabby::string::String, code: i32) -> stabby::string::String {
    stabby::string::String::from(format_diagnostic(&message, code).as_str())
}

#[stabby::stabby]
#[stabby::export]
pub fn init_logging() {
    #[cfg(feature = "ffmpeg")]
    ffmpeg::util::log::set_level(ffmpeg::util::log::Level::Info);
    let _ = pretty_env_logger::try_init();
}
