//! Headless preview: load an atlas data directory, render one year, and log
//! a per-civilisation summary of the primitives produced.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::EnvFilter;

use eramap_engine::config::MIN_YEAR;
use eramap_engine::map::{LayerHandle, MapWidget, Primitive};
use eramap_engine::scene::SceneManager;
use eramap_engine::source::FsSource;

/// Headless map widget: logs primitives instead of drawing them.
struct ConsoleMap {
    zoom: f64,
    next_handle: AtomicU64,
}

impl ConsoleMap {
    fn new(zoom: f64) -> Self {
        Self {
            zoom,
            next_handle: AtomicU64::new(1),
        }
    }
}

impl MapWidget for ConsoleMap {
    fn add(&self, primitive: Primitive) -> LayerHandle {
        let id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        let kind = match &primitive {
            Primitive::Marker { .. } => "marker",
            Primitive::CircleMarker { .. } => "circle",
            Primitive::Polyline { .. } => "polyline",
            Primitive::Polygon { .. } => "polygon",
        };
        tracing::debug!(id, kind, "add primitive");
        LayerHandle(id)
    }

    fn remove(&self, handle: LayerHandle) {
        tracing::debug!(id = handle.0, "remove primitive");
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_year_label(&self, year: i32) {
        tracing::info!("Year: {year} AD");
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let data_dir = std::env::var("ERAMAP_DATA_DIR").unwrap_or_else(|_| "data".into());
    let year = std::env::var("ERAMAP_YEAR")
        .ok()
        .and_then(|value| value.parse::<i32>().ok())
        .unwrap_or(MIN_YEAR);
    let zoom = std::env::var("ERAMAP_ZOOM")
        .ok()
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or(3.0);

    let source = FsSource::new(&data_dir);
    let scene = match SceneManager::load(source, ConsoleMap::new(zoom)).await {
        Ok(scene) => scene,
        Err(e) => {
            tracing::error!(error = %e, data_dir = %data_dir, "failed to load atlas meta");
            return;
        }
    };

    tracing::info!(year, zoom, data_dir = %data_dir, "rendering preview");
    scene.render(year).await;

    for (civilisation, primitives) in scene.layer_counts().await {
        tracing::info!(%civilisation, primitives, "layer summary");
    }
}
