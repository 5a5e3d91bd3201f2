use std::path::Path;

pub use hwdec_types;
use hwdec_types::{BackendInfo, HwdecError};
use stabby::libloading::StabbyLibrary;


#[derive(Debug)]
pub enum HwdecClientError {
    HwdecError(HwdecError),
    UnknownError(String),
}

impl From<HwdecError> for HwdecClientError {
    fn from(error: HwdecError) -> Self {
        HwdecClientError::HwdecError(error)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for HwdecClientError {
    fn from(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        HwdecClientError::UnknownError(error.to_string())
    }
}

impl std::fmt::Display for HwdecClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HwdecClientError::HwdecError(e) => write!(f, "{}", e),
            HwdecClientError::UnknownError(s) => write!(f, "Unknown error: {}", s),
        }
    }
}
impl std::error::Error for HwdecClientError {}

type ExplainStatusFn = extern "C" fn(stabby::string::String, i32) -> stabby::string::String;

/// Entry points of a loaded hwdec plug-in. Keeps the library mapped.
pub struct HwdecClient {
    pub backend: BackendInfo,
    explain_status: ExplainStatusFn,
    _library: libloading::Library,
}

impl HwdecClient {
    /// Diagnostic line the plug-in logs for `code`.
    pub fn explain(&self, message: &str, code: i32) -> String {
        (self.explain_status)(message.into(), code).to_string()
    }
}

/// Platform file name of the plug-in library.
pub fn lib_file_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "hwdec_lib.dll"
    } else if cfg!(target_os = "macos") {
        "libhwdec_lib.dylib"
    } else {
        "libhwdec_lib.so"
    }
}

pub fn load(lib: &Path) -> Result<HwdecClient, HwdecClientError> {
    let library = unsafe { libloading::Library::new(lib) }
        .map_err(|e| HwdecClientError::UnknownError(e.to_string()))?;

    let init_logging = unsafe { library.get_stabbied::<extern "C" fn()>(b"init_logging") }?;
    init_logging();

    let init_hwdec_lib = unsafe {
        library.get_stabbied::<extern "C" fn() -> stabby::result::Result<BackendInfo, HwdecError>>(
            b"init_hwdec_lib",
        )
    }?;

    let backend: Result<BackendInfo, HwdecError> = init_hwdec_lib().into();
    let backend = backend?;

    let explain_status =
        *unsafe { library.get_stabbied::<ExplainStatusFn>(b"explain_status") }?;

    Ok(HwdecClient {
        backend,
        explain_status,
        _library: library,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_is_an_error() {
        let err = load(Path::new("/nonexistent/libhwdec_lib.so")).err();
        assert!(matches!(err, Some(HwdecClientError::UnknownError(_))));
    }

    #[test]
    #[ignore = "needs the hwdec-lib plug-in built into target/debug"]
    fn it_can_load_lib() {
        let lib = test::get_hwdec_lib();
        let client = load(&lib).unwrap();

        assert_eq!(
            client.backend.hwdec_type,
            hwdec_types::HwdecType::VideoToolbox
        );
        assert_eq!(&*client.backend.api_name, "videotoolbox");

        let einval = -22;
        let line = client.explain("failed to init hardware decoder", einval);
        assert!(line.starts_with("failed to init hardware decoder: "));
        assert_eq!(client.explain("decode", -12345), "decode: -12345");
    }
}
