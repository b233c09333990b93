pub mod config;
pub mod emblem;
pub mod icons;
pub mod map;
pub mod playback;
pub mod render;
pub mod scene;
pub mod source;

pub use icons::{CachedIcon, IconCache};
pub use map::{Icon, LatLng, LayerHandle, MapWidget, Primitive};
pub use playback::PlaybackControl;
pub use scene::{SceneManager, VisibleLayerSet};
pub use source::{AtlasSource, FsSource, HttpSource, SourceError};

#[cfg(test)]
pub(crate) mod testutil;
