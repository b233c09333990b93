//! Render orchestration: clear, filter by year, render, overlay emblems.
//!
//! All mutable pipeline state (icon cache, lazily loaded feature
//! collections, the layer registry) is owned by the manager instance, so
//! independent maps can run side by side and tests stay deterministic.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};

use dashmap::DashMap;
use eramap_shared::{AtlasMeta, Civilisation, EmblemPosition, FeatureCollection};
use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::{DEF_OPACITY, EMBLEM_SYMBOL, MIN_YEAR, clamp_opacity_enabled};
use crate::emblem::plan_emblems;
use crate::icons::IconCache;
use crate::map::{LayerHandle, MapWidget};
use crate::render::{icon_scale, render_feature};
use crate::source::{AtlasSource, SourceError};

/// Registry of currently displayed primitives, keyed by lowercase
/// civilisation name. Fully cleared and rebuilt on every render.
pub type VisibleLayerSet = HashMap<String, Vec<LayerHandle>>;

pub struct SceneManager<S, W> {
    source: S,
    widget: W,
    meta: AtlasMeta,
    icons: IconCache,
    layers: RwLock<VisibleLayerSet>,
    /// Feature collections loaded on first need, cached for the session.
    features: DashMap<String, Arc<FeatureCollection>>,
    /// Emblem position table, loaded once; a failed load retries next render.
    emblem_positions: RwLock<Option<Arc<Vec<EmblemPosition>>>>,
    /// Render generation token. Completions holding a stale token discard
    /// their work instead of mutating the map behind a newer render.
    generation: AtomicU64,
    current_year: AtomicI32,
    clamp_opacity: bool,
}

impl<S: AtlasSource, W: MapWidget> SceneManager<S, W> {
    /// Load the meta table from the source and build a manager around it.
    pub async fn load(source: S, widget: W) -> Result<Self, SourceError> {
        let meta = source.load_meta().await?;
        info!(
            civilisations = meta.civilisations.len(),
            symbols = meta.symbols.len(),
            "atlas meta loaded"
        );
        Ok(Self::with_meta(source, widget, meta))
    }

    pub fn with_meta(source: S, widget: W, meta: AtlasMeta) -> Self {
        let layers = meta
            .civilisations
            .iter()
            .map(|civ| (civ.key(), Vec::new()))
            .collect();
        Self {
            source,
            widget,
            meta,
            icons: IconCache::new(),
            layers: RwLock::new(layers),
            features: DashMap::new(),
            emblem_positions: RwLock::new(None),
            generation: AtomicU64::new(0),
            current_year: AtomicI32::new(MIN_YEAR),
            clamp_opacity: clamp_opacity_enabled(),
        }
    }

    pub fn meta(&self) -> &AtlasMeta {
        &self.meta
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn icons(&self) -> &IconCache {
        &self.icons
    }

    /// Year of the most recent render call.
    pub fn year(&self) -> i32 {
        self.current_year.load(Ordering::Relaxed)
    }

    /// Render the scene for one year: clear the previous pass, then filter,
    /// style, and display every civilisation's active features, then overlay
    /// emblems for civilisations that ended up with visible features.
    pub async fn render(&self, year: i32) {
        self.widget.set_year_label(year);
        self.current_year.store(year, Ordering::Relaxed);
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.clear_all_layers().await;

        let zoom = self.widget.zoom();
        join_all(
            self.meta
                .civilisations
                .iter()
                .map(|civ| self.render_civilisation(civ, year, zoom, token)),
        )
        .await;

        if !self.is_current(token) {
            debug!(year, "render superseded before emblem pass");
            return;
        }
        self.render_emblems(zoom, token).await;
    }

    /// Re-render at the last requested year, e.g. after a zoom change
    /// invalidates the icon scale.
    pub async fn render_at_current_year(&self) {
        self.render(self.year()).await;
    }

    /// Warm the icon cache for every configured symbol at the current zoom
    /// across all civilisation colors.
    pub async fn prefetch_icons(&self) {
        let scale = icon_scale(self.widget.zoom());
        let colors: Vec<String> = self
            .meta
            .civilisations
            .iter()
            .map(|civ| civ.color_hex())
            .collect();
        let colors: Vec<&str> = colors.iter().map(String::as_str).collect();
        let symbols = self
            .meta
            .symbols
            .iter()
            .filter(|(name, _)| name.as_str() != EMBLEM_SYMBOL)
            .map(|(name, cfg)| (name.as_str(), cfg));
        self.icons.prefetch(&self.source, symbols, scale, &colors).await;
    }

    /// Per-civilisation primitive counts for the current pass.
    pub async fn layer_counts(&self) -> Vec<(String, usize)> {
        let layers = self.layers.read().await;
        let mut counts: Vec<(String, usize)> = layers
            .iter()
            .map(|(key, handles)| (key.clone(), handles.len()))
            .collect();
        counts.sort();
        counts
    }

    fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }

    async fn clear_all_layers(&self) {
        let mut layers = self.layers.write().await;
        for handles in layers.values_mut() {
            for handle in handles.drain(..) {
                self.widget.remove(handle);
            }
        }
    }

    async fn render_civilisation(&self, civ: &Civilisation, year: i32, zoom: f64, token: u64) {
        let collection = match self.features_for(civ).await {
            Ok(collection) => collection,
            Err(e) => {
                warn!(civilisation = %civ.name, error = %e, "feature load failed, nothing rendered this pass");
                return;
            }
        };

        for raw in &collection.features {
            let active = raw.activate(civ, DEF_OPACITY, self.clamp_opacity);
            if !active.span.contains(year) {
                continue;
            }
            let Some(primitive) = render_feature(
                &active,
                zoom,
                &self.meta.symbols,
                &self.meta.styles,
                &self.icons,
                &self.source,
            )
            .await
            else {
                continue;
            };

            // Check-and-add under the registry lock so a newer render's
            // clear cannot interleave between the add and the registration.
            let mut layers = self.layers.write().await;
            if !self.is_current(token) {
                debug!(civilisation = %civ.name, "stale completion discarded");
                return;
            }
            let handle = self.widget.add(primitive);
            layers.entry(civ.key()).or_default().push(handle);
        }
    }

    async fn features_for(&self, civ: &Civilisation) -> Result<Arc<FeatureCollection>, SourceError> {
        let key = civ.key();
        if let Some(cached) = self.features.get(&key) {
            return Ok(cached.clone());
        }
        let collection = Arc::new(self.source.load_features(&civ.file).await?);
        debug!(civilisation = %civ.name, features = collection.features.len(), "feature collection loaded");
        // Keep the first collection if a concurrent render loaded it too.
        Ok(self.features.entry(key).or_insert(collection).clone())
    }

    async fn emblem_positions(&self) -> Option<Arc<Vec<EmblemPosition>>> {
        if let Some(cached) = self.emblem_positions.read().await.as_ref() {
            return Some(cached.clone());
        }
        match self.source.load_emblem_positions().await {
            Ok(positions) => {
                let positions = Arc::new(positions);
                let mut slot = self.emblem_positions.write().await;
                let positions = slot.get_or_insert_with(|| positions.clone()).clone();
                Some(positions)
            }
            Err(e) => {
                warn!(error = %e, "emblem position load failed, skipping overlay this pass");
                None
            }
        }
    }

    async fn render_emblems(&self, zoom: f64, token: u64) {
        let Some(positions) = self.emblem_positions().await else {
            return;
        };

        let planned = {
            let layers = self.layers.read().await;
            plan_emblems(&positions, &self.meta, zoom, &layers)
        };

        let mut layers = self.layers.write().await;
        if !self.is_current(token) {
            debug!("stale emblem pass discarded");
            return;
        }
        for (key, primitive) in planned {
            let handle = self.widget.add(primitive);
            layers.entry(key).or_default().push(handle);
        }
    }
}
