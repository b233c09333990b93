//! The map widget seam. The pipeline produces [`Primitive`] values and hands
//! them to an injected [`MapWidget`]; it never touches a concrete map
//! library itself.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Opaque handle to a primitive the widget has accepted. Only meaningful to
/// the widget that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerHandle(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Icon {
    /// Inline recolored SVG markup, already sized and tinted.
    Markup { html: String },
    /// External image artwork (emblem badges).
    Image { url: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Marker {
        position: LatLng,
        icon: Icon,
        size: [f64; 2],
        anchor: [f64; 2],
        /// Named stacking pane, used by emblems to render above markers.
        pane: Option<String>,
        popup: Option<String>,
    },
    CircleMarker {
        position: LatLng,
        radius: f64,
        color: String,
        fill_color: String,
        fill_opacity: f64,
        popup: Option<String>,
    },
    Polyline {
        positions: Vec<LatLng>,
        color: String,
        weight: f64,
        opacity: f64,
        dash: Option<String>,
        popup: Option<String>,
    },
    Polygon {
        ring: Vec<LatLng>,
        color: String,
        weight: f64,
        opacity: f64,
        fill_color: String,
        fill_opacity: f64,
        class_name: Option<String>,
        popup: Option<String>,
    },
}

impl Primitive {
    pub fn set_popup(&mut self, text: String) {
        let slot = match self {
            Primitive::Marker { popup, .. }
            | Primitive::CircleMarker { popup, .. }
            | Primitive::Polyline { popup, .. }
            | Primitive::Polygon { popup, .. } => popup,
        };
        *slot = Some(text);
    }

    pub fn popup(&self) -> Option<&str> {
        match self {
            Primitive::Marker { popup, .. }
            | Primitive::CircleMarker { popup, .. }
            | Primitive::Polyline { popup, .. }
            | Primitive::Polygon { popup, .. } => popup.as_deref(),
        }
    }
}

/// Display surface collaborator. Implementations must tolerate interleaved
/// calls from concurrently suspended render paths; methods take `&self`.
pub trait MapWidget: Send + Sync {
    fn add(&self, primitive: Primitive) -> LayerHandle;
    fn remove(&self, handle: LayerHandle);
    fn zoom(&self) -> f64;
    fn set_year_label(&self, year: i32);
}
