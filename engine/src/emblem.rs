//! Emblem overlay: a per-civilisation badge at a fixed position, shown only
//! when that civilisation already has at least one visible feature. Emblems
//! are a secondary indicator, never the sole output for a civilisation.

use eramap_shared::{AtlasMeta, EmblemPosition, title_case};
use tracing::{debug, warn};

use crate::config::{EMBLEM_FILE_SUFFIX, EMBLEM_PANE, EMBLEM_SYMBOL};
use crate::map::{Icon, LatLng, Primitive};
use crate::render::icon_scale;
use crate::scene::VisibleLayerSet;

/// Decide which emblems to show for the current pass. Returns the owning
/// civilisation's registry key with each planned marker so the scene can
/// register the handle for the next clear.
pub fn plan_emblems(
    positions: &[EmblemPosition],
    meta: &AtlasMeta,
    zoom: f64,
    layers: &VisibleLayerSet,
) -> Vec<(String, Primitive)> {
    let Some(cfg) = meta.symbols.get(EMBLEM_SYMBOL) else {
        warn!("no emblem symbol configured, skipping emblem overlay");
        return Vec::new();
    };
    let scale = icon_scale(zoom);

    let mut planned = Vec::new();
    for pos in positions {
        let Some(civ) = meta
            .civilisations
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(&pos.civilization))
        else {
            debug!(civilization = %pos.civilization, "emblem position without matching civilisation");
            continue;
        };
        let key = civ.key();
        if layers.get(&key).map_or(true, Vec::is_empty) {
            continue;
        }

        let display_name = title_case(&civ.name);
        let file_name = format!("{}{}", display_name.replace(' ', "_"), EMBLEM_FILE_SUFFIX);
        let url = if cfg.icon_url.ends_with('/') {
            format!("{}{}", cfg.icon_url, file_name)
        } else {
            format!("{}/{}", cfg.icon_url, file_name)
        };

        planned.push((
            key,
            Primitive::Marker {
                position: LatLng {
                    lat: pos.latitude,
                    lng: pos.longitude,
                },
                icon: Icon::Image { url },
                size: [scale * cfg.icon_size[0], scale * cfg.icon_size[1]],
                anchor: [scale * cfg.icon_anchor[0], scale * cfg.icon_anchor[1]],
                pane: Some(EMBLEM_PANE.to_string()),
                popup: Some(display_name),
            },
        ));
    }
    planned
}
