//! Geometry renderer: one normalized feature in, one map primitive out.

use std::collections::HashMap;

use eramap_shared::feature::to_lat_lng;
use eramap_shared::{ActiveFeature, Geometry, StyleFlags, SymbolConfig};
use tracing::debug;

use crate::config::{
    DEF_OPACITY, FALLBACK_MARKER_RADIUS, LINE_DASH, LINE_WEIGHT, MAX_ICON_SCALE, MIN_ICON_SCALE,
    POLYGON_WEIGHT, TERRITORY_BLUR_CLASS, ZOOM_CENTER,
};
use crate::icons::IconCache;
use crate::map::{Icon, LatLng, Primitive};
use crate::source::AtlasSource;

/// Zoom-derived size multiplier for point icons. Largest at the reference
/// zoom level, shrinking linearly as zoom moves away in either direction,
/// capped at `MAX_ICON_SCALE`.
pub fn icon_scale(zoom: f64) -> f64 {
    (10.0 * MIN_ICON_SCALE - MIN_ICON_SCALE * (zoom - ZOOM_CENTER).abs()).min(MAX_ICON_SCALE)
}

/// Convert an active feature into a displayable primitive, or `None` for
/// geometry the pipeline does not support. A non-empty description is bound
/// to the primitive as popup text.
pub async fn render_feature<S: AtlasSource>(
    feature: &ActiveFeature<'_>,
    zoom: f64,
    symbols: &HashMap<String, SymbolConfig>,
    styles: &StyleFlags,
    icons: &IconCache,
    source: &S,
) -> Option<Primitive> {
    let mut primitive = match feature.geometry {
        Geometry::Point { coordinates } => {
            render_point(feature, coordinates, zoom, symbols, icons, source).await?
        }
        Geometry::LineString { coordinates } => render_line(feature, coordinates),
        Geometry::Polygon { coordinates } => render_polygon(feature, coordinates, styles)?,
        Geometry::Other => {
            debug!("skipping feature with unsupported geometry type");
            return None;
        }
    };

    if let Some(description) = feature.properties.description.as_deref() {
        if !description.is_empty() {
            primitive.set_popup(description.to_string());
        }
    }
    Some(primitive)
}

async fn render_point<S: AtlasSource>(
    feature: &ActiveFeature<'_>,
    coordinates: &[f64],
    zoom: f64,
    symbols: &HashMap<String, SymbolConfig>,
    icons: &IconCache,
    source: &S,
) -> Option<Primitive> {
    let position: LatLng = to_lat_lng(coordinates)?.into();
    let scale = icon_scale(zoom);

    if let Some(symbol) = feature.properties.marker_symbol.as_deref() {
        if let Some(cfg) = symbols.get(symbol) {
            if let Some(icon) = icons.get(source, symbol, cfg, scale, &feature.color).await {
                return Some(Primitive::Marker {
                    position,
                    icon: Icon::Markup {
                        html: icon.html.clone(),
                    },
                    size: icon.size,
                    anchor: icon.anchor,
                    pane: None,
                    popup: None,
                });
            }
        }
    }

    // Unknown symbol or artwork failure: plain dot in the civilisation color.
    Some(Primitive::CircleMarker {
        position,
        radius: scale * FALLBACK_MARKER_RADIUS,
        color: feature.color.clone(),
        fill_color: feature.color.clone(),
        fill_opacity: feature.opacity,
        popup: None,
    })
}

fn render_line(feature: &ActiveFeature<'_>, coordinates: &[Vec<f64>]) -> Primitive {
    let positions = coordinates
        .iter()
        .filter_map(|c| to_lat_lng(c))
        .map(LatLng::from)
        .collect();
    Primitive::Polyline {
        positions,
        color: feature.color.clone(),
        weight: LINE_WEIGHT,
        opacity: feature.opacity,
        dash: Some(LINE_DASH.to_string()),
        popup: None,
    }
}

fn render_polygon(
    feature: &ActiveFeature<'_>,
    coordinates: &[Vec<Vec<f64>>],
    styles: &StyleFlags,
) -> Option<Primitive> {
    // Only the outer ring is drawn; holes in later rings are ignored.
    let ring = coordinates
        .first()?
        .iter()
        .filter_map(|c| to_lat_lng(c))
        .map(LatLng::from)
        .collect();
    let fill_opacity = if feature.opacity == 0.0 || feature.opacity.is_nan() {
        DEF_OPACITY
    } else {
        feature.opacity
    };
    Some(Primitive::Polygon {
        ring,
        color: feature.color.clone(),
        weight: POLYGON_WEIGHT,
        opacity: feature.opacity,
        fill_color: feature.color.clone(),
        fill_opacity,
        class_name: styles
            .territory_blur
            .then(|| TERRITORY_BLUR_CLASS.to_string()),
        popup: None,
    })
}
