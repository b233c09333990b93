//! Icon artwork cache. Artwork is fetched once per (symbol, scale, color)
//! combination, recolored to inherit the surrounding tint, and wrapped in a
//! sized container. Entries are immutable and never evicted; fetch failures
//! are not cached and retry on the next miss.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use eramap_shared::SymbolConfig;
use tracing::{debug, warn};

use crate::source::AtlasSource;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct IconKey {
    symbol: String,
    /// Bit pattern of the zoom-derived scale; scales come from a small
    /// discrete set so exact equality is the right cache behavior.
    scale_bits: u64,
    color: String,
}

/// Ready-to-render icon markup plus its scaled pixel geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedIcon {
    pub html: String,
    pub size: [f64; 2],
    pub anchor: [f64; 2],
}

#[derive(Debug, Default)]
pub struct IconCache {
    entries: DashMap<IconKey, Arc<CachedIcon>>,
    artwork_fetches: AtomicU64,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of artwork fetches issued so far (cache misses that reached
    /// the source).
    pub fn artwork_fetches(&self) -> u64 {
        self.artwork_fetches.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve the cached icon for `(symbol, scale, color)`, fetching and
    /// recoloring artwork on a miss. `None` means the artwork could not be
    /// fetched; the caller falls back to a plain dot marker and the failure
    /// is retried on the next miss.
    pub async fn get<S: AtlasSource>(
        &self,
        source: &S,
        symbol: &str,
        cfg: &SymbolConfig,
        scale: f64,
        color: &str,
    ) -> Option<Arc<CachedIcon>> {
        let key = IconKey {
            symbol: symbol.to_string(),
            scale_bits: scale.to_bits(),
            color: color.to_string(),
        };
        if let Some(hit) = self.entries.get(&key) {
            return Some(hit.clone());
        }

        self.artwork_fetches.fetch_add(1, Ordering::Relaxed);
        let raw = match source.load_artwork(&cfg.icon_url).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(symbol, error = %e, "icon artwork fetch failed, using fallback marker");
                return None;
            }
        };

        let size = [scale * cfg.icon_size[0], scale * cfg.icon_size[1]];
        let anchor = [scale * cfg.icon_anchor[0], scale * cfg.icon_anchor[1]];
        let entry = Arc::new(CachedIcon {
            html: wrap_artwork(&rewrite_fills(&raw), size, color),
            size,
            anchor,
        });
        debug!(symbol, scale, color, "cached recolored icon");
        // A concurrent miss for the same key keeps whichever entry landed
        // first; both are byte-identical.
        let entry = self.entries.entry(key).or_insert(entry).clone();
        Some(entry)
    }

    /// Warm the cache for a set of symbols at one scale across the given
    /// colors. Fetch failures are ignored here; they surface as fallback
    /// markers at render time.
    pub async fn prefetch<'a, S: AtlasSource>(
        &self,
        source: &S,
        symbols: impl IntoIterator<Item = (&'a str, &'a SymbolConfig)>,
        scale: f64,
        colors: &[&str],
    ) {
        for (symbol, cfg) in symbols {
            for color in colors {
                self.get(source, symbol, cfg, scale, color).await;
            }
        }
    }
}

/// Rewrite every explicit `fill="…"` attribute to `fill="currentColor"` so
/// the artwork takes its tint from the wrapping container.
fn rewrite_fills(svg: &str) -> String {
    const NEEDLE: &str = "fill=\"";
    let mut out = String::with_capacity(svg.len());
    let mut rest = svg;
    while let Some(idx) = rest.find(NEEDLE) {
        let value_start = idx + NEEDLE.len();
        out.push_str(&rest[..value_start]);
        match rest[value_start..].find('"') {
            Some(end) => {
                out.push_str("currentColor");
                rest = &rest[value_start + end..];
            }
            None => {
                // Unterminated attribute; leave the tail untouched.
                rest = &rest[value_start..];
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

fn wrap_artwork(svg: &str, size: [f64; 2], color: &str) -> String {
    format!(
        "<div style=\"width:{}px;height:{}px;color:{};display:block;margin:auto;\
         justify-content:center;filter:drop-shadow(0 0 5px #000);\">{}</div>",
        size[0], size[1], color, svg
    )
}
