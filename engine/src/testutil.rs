//! Test doubles: a scriptable atlas source and a recording map widget.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use eramap_shared::{
    AtlasMeta, Civilisation, EmblemPosition, FeatureCollection, RawFeature, SymbolConfig,
};
use tokio::sync::Notify;

use crate::map::{LayerHandle, MapWidget, Primitive};
use crate::source::{AtlasSource, SourceError};

fn missing(path: &str) -> SourceError {
    SourceError::Io {
        path: path.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not in mock source"),
    }
}

#[derive(Default)]
pub(crate) struct MockSource {
    meta: Mutex<AtlasMeta>,
    collections: Mutex<HashMap<String, FeatureCollection>>,
    positions: Mutex<Vec<EmblemPosition>>,
    artwork: Mutex<HashMap<String, String>>,
    artwork_fetches: AtomicU64,
    features_fetches: AtomicU64,
    fail_artwork: AtomicBool,
    fail_positions: AtomicBool,
    gate_next_features: AtomicBool,
    features_gate: Notify,
}

impl MockSource {
    pub fn with_artwork(path: &str, svg: &str) -> Self {
        let source = Self::default();
        source.insert_artwork(path, svg);
        source
    }

    pub fn insert_artwork(&self, path: &str, svg: &str) {
        self.artwork
            .lock()
            .unwrap()
            .insert(path.to_string(), svg.to_string());
    }

    pub fn insert_collection(&self, file: &str, features: Vec<RawFeature>) {
        self.collections
            .lock()
            .unwrap()
            .insert(file.to_string(), FeatureCollection { features });
    }

    pub fn set_meta(&self, meta: AtlasMeta) {
        *self.meta.lock().unwrap() = meta;
    }

    pub fn set_positions(&self, positions: Vec<EmblemPosition>) {
        *self.positions.lock().unwrap() = positions;
    }

    pub fn fail_artwork(&self, fail: bool) {
        self.fail_artwork.store(fail, Ordering::SeqCst);
    }

    pub fn fail_positions(&self, fail: bool) {
        self.fail_positions.store(fail, Ordering::SeqCst);
    }

    /// The next `load_features` call parks until the gate is released.
    pub fn gate_next_features_load(&self) {
        self.gate_next_features.store(true, Ordering::SeqCst);
    }

    pub fn release_features_gate(&self) {
        self.features_gate.notify_one();
    }

    pub fn artwork_fetch_count(&self) -> u64 {
        self.artwork_fetches.load(Ordering::SeqCst)
    }

    pub fn features_fetch_count(&self) -> u64 {
        self.features_fetches.load(Ordering::SeqCst)
    }
}

impl AtlasSource for MockSource {
    async fn load_meta(&self) -> Result<AtlasMeta, SourceError> {
        Ok(self.meta.lock().unwrap().clone())
    }

    async fn load_features(&self, file: &str) -> Result<FeatureCollection, SourceError> {
        if self.gate_next_features.swap(false, Ordering::SeqCst) {
            self.features_gate.notified().await;
        }
        self.features_fetches.fetch_add(1, Ordering::SeqCst);
        self.collections
            .lock()
            .unwrap()
            .get(file)
            .cloned()
            .ok_or_else(|| missing(file))
    }

    async fn load_emblem_positions(&self) -> Result<Vec<EmblemPosition>, SourceError> {
        if self.fail_positions.load(Ordering::SeqCst) {
            return Err(missing("wonder_pos.json"));
        }
        Ok(self.positions.lock().unwrap().clone())
    }

    async fn load_artwork(&self, path: &str) -> Result<String, SourceError> {
        self.artwork_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_artwork.load(Ordering::SeqCst) {
            return Err(missing(path));
        }
        self.artwork
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| missing(path))
    }
}

/// Map widget double that records live primitives and removals.
pub(crate) struct RecordingMap {
    zoom: Mutex<f64>,
    next_handle: AtomicU64,
    live: Mutex<HashMap<u64, Primitive>>,
    removed: AtomicU64,
    year_label: Mutex<Option<i32>>,
}

impl RecordingMap {
    pub fn new(zoom: f64) -> Self {
        Self {
            zoom: Mutex::new(zoom),
            next_handle: AtomicU64::new(1),
            live: Mutex::new(HashMap::new()),
            removed: AtomicU64::new(0),
            year_label: Mutex::new(None),
        }
    }

    pub fn set_zoom(&self, zoom: f64) {
        *self.zoom.lock().unwrap() = zoom;
    }

    pub fn live_primitives(&self) -> Vec<Primitive> {
        self.live.lock().unwrap().values().cloned().collect()
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub fn removed_count(&self) -> u64 {
        self.removed.load(Ordering::SeqCst)
    }

    pub fn year_label(&self) -> Option<i32> {
        *self.year_label.lock().unwrap()
    }
}

impl MapWidget for RecordingMap {
    fn add(&self, primitive: Primitive) -> LayerHandle {
        let id = self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.live.lock().unwrap().insert(id, primitive);
        LayerHandle(id)
    }

    fn remove(&self, handle: LayerHandle) {
        if self.live.lock().unwrap().remove(&handle.0).is_some() {
            self.removed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn zoom(&self) -> f64 {
        *self.zoom.lock().unwrap()
    }

    fn set_year_label(&self, year: i32) {
        *self.year_label.lock().unwrap() = Some(year);
    }
}

/// One-civilisation meta table with a house symbol and emblem artwork config.
pub(crate) fn romans_meta() -> AtlasMeta {
    AtlasMeta {
        civilisations: vec![Civilisation {
            name: "Romans".into(),
            color: "#ff0000".into(),
            file: "romans.geojson".into(),
        }],
        symbols: HashMap::from([
            (
                "house".to_string(),
                SymbolConfig {
                    icon_url: "icons/house.svg".into(),
                    icon_size: [24.0, 24.0],
                    icon_anchor: [12.0, 12.0],
                },
            ),
            (
                "emblem".to_string(),
                SymbolConfig {
                    icon_url: "emblems".into(),
                    icon_size: [40.0, 40.0],
                    icon_anchor: [20.0, 20.0],
                },
            ),
        ]),
        styles: Default::default(),
    }
}

/// A point feature at (10°E, 50°N) with the given title span and symbol.
pub(crate) fn romans_point(span: &str, symbol: &str) -> RawFeature {
    serde_json::from_str(&format!(
        r#"{{"geometry":{{"type":"Point","coordinates":[10.0,50.0]}},
            "properties":{{"title":"{span}","marker-symbol":"{symbol}"}}}}"#
    ))
    .expect("test feature should deserialize")
}
