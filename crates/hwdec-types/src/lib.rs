use stabby::string::String;

/// Status returned when a configure call could not create a hardware session.
pub const HWDEC_ERR_INIT_FAILED: i32 = -1;
/// Status returned by a probe that found no usable hardware context.
pub const HWDEC_ERR_NO_CTX: i32 = -2;
pub const HWDEC_ERR_INVALID_STATE: i32 = -3;
pub const HWDEC_ERR_LIBRARY: i32 = -4;

/// Hardware API a backend binds to. Used as the capability tag of a backend.
#[stabby::stabby]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwdecType {
    VideoToolbox,
    Vaapi,
    Vdpau,
    Cuda,
    D3d11va,
    Dxva2,
}

impl HwdecType {
    /// Name under which the host knows how to load this API.
    pub fn api_name(&self) -> &'static str {
        match self {
            HwdecType::VideoToolbox => "videotoolbox",
            HwdecType::Vaapi => "vaapi",
            HwdecType::Vdpau => "vdpau",
            HwdecType::Cuda => "cuda",
            HwdecType::D3d11va => "d3d11va",
            HwdecType::Dxva2 => "dxva2",
        }
    }
}

#[stabby::stabby]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    VideoToolbox, // opaque CVPixelBuffer surface
    Nv12,
    Yuv420p,
    Uyvy422,
    P010,
    Bgra,
}

impl ImageFormat {
    /// True for formats that only exist as hardware surfaces.
    pub fn is_hwaccel(&self) -> bool {
        matches!(self, ImageFormat::VideoToolbox)
    }
}

/// ABI-stable view of a backend descriptor, handed across the plug-in boundary.
#[stabby::stabby]
#[derive(Debug, Clone)]
pub struct BackendInfo {
    pub hwdec_type: HwdecType,
    pub image_format: ImageFormat,
    pub api_name: String,
}

#[stabby::stabby]
#[repr(stabby)]
#[derive(Debug, Clone)]
pub enum HwdecError {
    NoHardwareContext(String),
    HardwareInitFailed(String),
    InvalidState(String),
    LibraryError(String),
}

impl HwdecError {
    pub fn no_hardware_context(msg: impl AsRef<str>) -> Self {
        HwdecError::NoHardwareContext(String::from(msg.as_ref()))
    }

    pub fn hardware_init_failed(msg: impl AsRef<str>) -> Self {
        HwdecError::HardwareInitFailed(String::from(msg.as_ref()))
    }

    pub fn invalid_state(msg: impl AsRef<str>) -> Self {
        HwdecError::InvalidState(String::from(msg.as_ref()))
    }

    pub fn library(msg: impl AsRef<str>) -> Self {
        HwdecError::LibraryError(String::from(msg.as_ref()))
    }

    /// Numeric status the host framework sees for this error.
    pub fn status(&self) -> i32 {
        self.match_ref(
            |_| HWDEC_ERR_NO_CTX,
            |_| HWDEC_ERR_INIT_FAILED,
            |_| HWDEC_ERR_INVALID_STATE,
            |_| HWDEC_ERR_LIBRARY,
        )
    }
}

impl std::fmt::Display for HwdecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let output = self.match_ref(
            |e| format!("no hardware context: {}", e),
            |e| format!("hardware init failed: {}", e),
            |e| format!("invalid backend state: {}", e),
            |e| format!("library error: {}", e),
        );
        write!(f, "{}", output)
    }
}

impl std::error::Error for HwdecError {}
