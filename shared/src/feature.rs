use serde::{Deserialize, Deserializer, Serialize};

use crate::meta::Civilisation;
use crate::span::YearSpan;

/// A GeoJSON position: longitude first, latitude second, anything after
/// (elevation etc.) carried along but unused.
pub type Position = Vec<f64>;

/// Flip a stored (longitude, latitude) position into the (latitude,
/// longitude) order map widgets expect.
pub fn to_lat_lng(position: &[f64]) -> Option<(f64, f64)> {
    match position {
        [lng, lat, ..] => Some((*lat, *lng)),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    LineString { coordinates: Vec<Position> },
    Polygon { coordinates: Vec<Vec<Position>> },
    /// Unknown geometry types deserialize instead of failing the whole
    /// collection; the renderer skips them.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// simplestyle stroke width; hand-authored data sometimes quotes it.
    #[serde(
        rename = "stroke-width",
        default,
        deserialize_with = "de_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub stroke_width: Option<f64>,
    #[serde(rename = "marker-symbol", default, skip_serializing_if = "Option::is_none")]
    pub marker_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFeature {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<RawFeature>,
}

/// A feature joined with its owning civilisation's style for one render
/// pass. Recomputed per render, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFeature<'a> {
    pub geometry: &'a Geometry,
    pub properties: &'a FeatureProperties,
    pub span: YearSpan,
    /// Always the civilisation's color, never the feature's own.
    pub color: String,
    pub opacity: f64,
}

impl RawFeature {
    /// Derive the per-render view of this feature: span from the title
    /// annotation, opacity from `stroke-width / 10` (falling back to
    /// `default_opacity`), color inherited from the civilisation.
    ///
    /// Opacity is unclamped upstream; `clamp_opacity` saturates it to
    /// [0, 1] when a deployment opts in.
    pub fn activate<'a>(
        &'a self,
        civilisation: &Civilisation,
        default_opacity: f64,
        clamp_opacity: bool,
    ) -> ActiveFeature<'a> {
        let span = YearSpan::parse(self.properties.title.as_deref());
        let mut opacity = match self.properties.stroke_width {
            Some(sw) if sw.is_finite() => sw / 10.0,
            _ => default_opacity,
        };
        if clamp_opacity {
            opacity = opacity.clamp(0.0, 1.0);
        }
        ActiveFeature {
            geometry: &self.geometry,
            properties: &self.properties,
            span,
            color: civilisation.color_hex(),
            opacity,
        }
    }
}

fn de_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::String(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_YEAR;

    fn civ() -> Civilisation {
        Civilisation {
            name: "Romans".into(),
            color: "#ff0000".into(),
            file: "romans.geojson".into(),
        }
    }

    fn point_feature(json: &str) -> RawFeature {
        serde_json::from_str(json).expect("feature should deserialize")
    }

    #[test]
    fn geometry_deserializes_by_type_tag() {
        let collection: FeatureCollection = serde_json::from_str(
            r#"{"features":[
                {"geometry":{"type":"Point","coordinates":[10.0,50.0]},"properties":{}},
                {"geometry":{"type":"LineString","coordinates":[[0.0,1.0],[2.0,3.0]]},"properties":{}},
                {"geometry":{"type":"Polygon","coordinates":[[[0.0,0.0],[1.0,0.0],[1.0,1.0]]]},"properties":{}}
            ]}"#,
        )
        .expect("collection should deserialize");
        assert_eq!(collection.features.len(), 3);
        assert!(matches!(
            collection.features[0].geometry,
            Geometry::Point { .. }
        ));
    }

    #[test]
    fn unknown_geometry_type_becomes_other() {
        let feature = point_feature(
            r#"{"geometry":{"type":"MultiPolygon","coordinates":[]},"properties":{}}"#,
        );
        assert_eq!(feature.geometry, Geometry::Other);
    }

    #[test]
    fn activation_parses_span_and_inherits_color() {
        let feature = point_feature(
            r#"{"geometry":{"type":"Point","coordinates":[10.0,50.0]},
                "properties":{"title":"100-200"}}"#,
        );
        let active = feature.activate(&civ(), 0.7, false);
        assert_eq!(active.span.start, 100);
        assert_eq!(active.span.end, 200);
        assert_eq!(active.color, "#ff0000");
    }

    #[test]
    fn opacity_from_stroke_width_over_ten() {
        let feature = point_feature(
            r#"{"geometry":{"type":"Point","coordinates":[0.0,0.0]},
                "properties":{"stroke-width":5}}"#,
        );
        assert_eq!(feature.activate(&civ(), 0.7, false).opacity, 0.5);
    }

    #[test]
    fn quoted_stroke_width_still_parses() {
        let feature = point_feature(
            r#"{"geometry":{"type":"Point","coordinates":[0.0,0.0]},
                "properties":{"stroke-width":"4"}}"#,
        );
        assert_eq!(feature.activate(&civ(), 0.7, false).opacity, 0.4);
    }

    #[test]
    fn missing_stroke_width_uses_default_opacity() {
        let feature = point_feature(
            r#"{"geometry":{"type":"Point","coordinates":[0.0,0.0]},"properties":{}}"#,
        );
        assert_eq!(feature.activate(&civ(), 0.7, false).opacity, 0.7);
    }

    #[test]
    fn oversized_stroke_width_clamps_only_when_asked() {
        let feature = point_feature(
            r#"{"geometry":{"type":"Point","coordinates":[0.0,0.0]},
                "properties":{"stroke-width":25}}"#,
        );
        assert_eq!(feature.activate(&civ(), 0.7, false).opacity, 2.5);
        assert_eq!(feature.activate(&civ(), 0.7, true).opacity, 1.0);
    }

    #[test]
    fn missing_title_spans_full_timeline() {
        let feature = point_feature(
            r#"{"geometry":{"type":"Point","coordinates":[0.0,0.0]},"properties":{}}"#,
        );
        let active = feature.activate(&civ(), 0.7, false);
        assert_eq!(active.span.start, 0);
        assert_eq!(active.span.end, MAX_YEAR);
    }

    #[test]
    fn lat_lng_flip() {
        assert_eq!(to_lat_lng(&[10.0, 50.0]), Some((50.0, 10.0)));
        assert_eq!(to_lat_lng(&[10.0, 50.0, 120.0]), Some((50.0, 10.0)));
        assert_eq!(to_lat_lng(&[10.0]), None);
    }
}
