//! Timer-driven year advance: steps the timeline forward at a fixed
//! interval until it reaches the end of the slider range or is stopped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::info;

use crate::config::{MAX_YEAR, SLIDER_STEP};
use crate::map::MapWidget;
use crate::scene::SceneManager;
use crate::source::AtlasSource;

/// Shared play/pause flag. `stop` takes effect at the next tick.
#[derive(Debug, Default)]
pub struct PlaybackControl {
    active: AtomicBool,
}

impl PlaybackControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    fn try_start(&self) -> bool {
        !self.active.swap(true, Ordering::SeqCst)
    }
}

/// Advance the scene's year by `SLIDER_STEP` once per tick, rendering each
/// step, until the timeline ends or the control is stopped. A second call
/// while one loop is active returns immediately.
pub async fn run<S: AtlasSource, W: MapWidget>(
    scene: &SceneManager<S, W>,
    control: &PlaybackControl,
    tick: Duration,
) {
    if !control.try_start() {
        return;
    }
    let mut interval = tokio::time::interval(tick);
    while control.is_active() && scene.year() < MAX_YEAR {
        interval.tick().await;
        if !control.is_active() {
            break;
        }
        let next = (scene.year() + SLIDER_STEP).min(MAX_YEAR);
        scene.render(next).await;
    }
    control.stop();
    info!(year = scene.year(), "playback stopped");
}
