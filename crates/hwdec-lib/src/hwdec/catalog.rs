//! Explanations for the status codes the VideoToolbox session layer returns.

/// FFmpeg's `AVERROR(e)`: POSIX errors are reported negated.
pub const fn averror(errno: i32) -> i32 {
    -errno
}

/// FFmpeg's `FFERRTAG`: a negated little-endian four character tag.
const fn fferrtag(tag: &[u8; 4]) -> i32 {
    -((tag[0] as i32) | ((tag[1] as i32) << 8) | ((tag[2] as i32) << 16) | ((tag[3] as i32) << 24))
}

pub const AVERROR_ENOSYS: i32 = averror(libc::ENOSYS);
pub const AVERROR_EINVAL: i32 = averror(libc::EINVAL);
/// `AVERROR_INVALIDDATA`, the codec layer's generic "invalid data" error.
pub const AVERROR_INVALIDDATA: i32 = fferrtag(b"INDA");

// Matched by exact code only. The table length bounds the scan, so no code,
// including 0 or a positive one, is reserved as a terminator.
static VT_ERRORS: &[(i32, &str)] = &[
    (
        AVERROR_ENOSYS,
        "Hardware doesn't support accelerated decoding for this stream",
    ),
    (
        AVERROR_EINVAL,
        "Invalid configuration provided to VTDecompressionSessionCreate",
    ),
    (
        AVERROR_INVALIDDATA,
        "Generic error returned by the decoder layer. The cause can range from \
         VideoToolbox finding errors in the bitstream to another application \
         using VideoToolbox at the moment. Only one application can use \
         VideoToolbox at a given time.",
    ),
];

/// Returns the operator-facing explanation for `code`, if the catalog has one.
pub fn classify(code: i32) -> Option<&'static str> {
    VT_ERRORS
        .iter()
        .find(|(entry, _)| *entry == code)
        .map(|(_, reason)| *reason)
}
