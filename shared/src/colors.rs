pub type Rgb = (u8, u8, u8);

/// Parse a `#rrggbb` (or `rrggbb`) string into RGB components.
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

pub fn rgb_to_hex((r, g, b): Rgb) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Deterministic color via CRC32 hash of the civilisation name.
/// Used when the configured color string fails to parse.
pub fn fallback_color(name: &str) -> Rgb {
    let hash = crc32fast::hash(name.to_lowercase().as_bytes());
    let bytes = hash.to_be_bytes();
    (bytes[0], bytes[1], bytes[2])
}
