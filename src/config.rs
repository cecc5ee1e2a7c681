use std::sync::OnceLock;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

static PARALLEL_MASKS: OnceLock<bool> = OnceLock::new();

/// Score the eight QR mask candidates on the rayon pool.
pub(crate) fn parallel_mask_scoring() -> bool {
    *PARALLEL_MASKS.get_or_init(|| parse_env_bool_u8("MATRIX_PARALLEL_MASKS", true))
}

static UTF8_FALLBACK: OnceLock<bool> = OnceLock::new();

/// Treat QR byte segments without an ECI header as UTF-8 when they validate.
pub(crate) fn utf8_byte_fallback() -> bool {
    *UTF8_FALLBACK.get_or_init(|| parse_env_bool_u8("MATRIX_UTF8_FALLBACK", false))
}

static FORMAT_MAX_DISTANCE: OnceLock<u32> = OnceLock::new();

/// Largest Hamming distance accepted when matching format or version information.
pub(crate) fn format_max_distance() -> u32 {
    *FORMAT_MAX_DISTANCE
        .get_or_init(|| parse_env_usize("MATRIX_FORMAT_MAX_DISTANCE", 3).clamp(0, 3) as u32)
}
