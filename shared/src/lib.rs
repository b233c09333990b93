pub mod colors;
pub mod feature;
pub mod meta;
pub mod span;

pub use colors::{Rgb, fallback_color, parse_hex_color};
pub use feature::{ActiveFeature, FeatureCollection, FeatureProperties, Geometry, RawFeature};
pub use meta::{AtlasMeta, Civilisation, EmblemPosition, StyleFlags, SymbolConfig, title_case};
pub use span::YearSpan;

/// Inclusive bounds of the atlas timeline, in years AD.
pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 1700;
