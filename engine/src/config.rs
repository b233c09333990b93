use std::time::Duration;

pub use eramap_shared::{MAX_YEAR, MIN_YEAR};

/// Year increment per slider step and per playback tick.
pub const SLIDER_STEP: i32 = 10;

/// Opacity used when a feature carries no usable stroke-width.
pub const DEF_OPACITY: f64 = 0.7;

// Icon scale envelope relative to zoom level. Icons are largest at the
// reference zoom and shrink symmetrically away from it.
pub const MIN_ICON_SCALE: f64 = 0.25;
pub const MAX_ICON_SCALE: f64 = 1.0;
pub const ZOOM_CENTER: f64 = 9.0;

/// Fallback circle marker radius is this factor times the icon scale.
pub const FALLBACK_MARKER_RADIUS: f64 = 4.0;

pub const LINE_WEIGHT: f64 = 2.0;
pub const LINE_DASH: &str = "4,4";
pub const POLYGON_WEIGHT: f64 = 1.0;
pub const TERRITORY_BLUR_CLASS: &str = "territory-blur";

/// Symbol table entry that configures emblem artwork, and the pane emblem
/// markers render into so they stack above regular markers.
pub const EMBLEM_SYMBOL: &str = "emblem";
pub const EMBLEM_PANE: &str = "emblems";
/// Emblem file name is the title-cased civilisation name plus this suffix.
pub const EMBLEM_FILE_SUFFIX: &str = "_AoE2.png";

pub const META_FILE: &str = "meta_data.json";
pub const EMBLEM_POSITIONS_FILE: &str = "wonder_pos.json";

pub const DEFAULT_PLAYBACK_TICK_MS: u64 = 200;
pub const DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 3;

/// Saturate derived opacity to [0, 1]. Off by default: upstream data is
/// taken as authored, out-of-range values included.
pub fn clamp_opacity_enabled() -> bool {
    std::env::var("ERAMAP_CLAMP_OPACITY")
        .map(|value| {
            let normalized = value.trim().to_ascii_lowercase();
            matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
        })
        .unwrap_or(false)
}

pub fn playback_tick() -> Duration {
    std::env::var("ERAMAP_PLAYBACK_TICK_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_millis)
        .unwrap_or_else(|| Duration::from_millis(DEFAULT_PLAYBACK_TICK_MS))
}

pub fn upstream_http_timeout() -> Duration {
    std::env::var("ERAMAP_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS))
}

pub fn upstream_connect_timeout() -> Duration {
    std::env::var("ERAMAP_CONNECT_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS))
}
