//! A walkable photo gallery: an avatar steps between two columns of photos,
//! captions appear when a photo is faced, and the view scrolls to follow.

use bevy::prelude::*;
use walk_helpers::lifecycle::despawn_view_scoped;

pub mod camera;
pub mod catalog;
pub mod config;
pub mod grid;
pub mod input;
pub mod movement;
pub mod proximity;
pub mod repeat;
pub mod scroll;
pub mod view;
pub mod welcome;

pub use catalog::{Catalog, CatalogError, PhotoRecord};
pub use config::{ConfigError, GalleryConfig};
pub use grid::{Footprint, GridModel, Obstacle, Side, TileCoord, WalkBounds};
pub use movement::{ControllerError, Direction, StepOutcome, WalkController};
pub use proximity::{ProximityChange, ProximityTracker};
pub use scroll::{ScrollContainer, ScrollMetrics, ScrollSynchronizer, ViewportClass};

#[derive(States, Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppState {
    #[default]
    Welcome,
    Gallery,
}

/// Frame order of the gallery systems.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkSet {
    Input,
    Movement,
    Presentation,
    Scroll,
}

#[derive(Default)]
pub struct GalleryWalkPlugin {
    pub config: GalleryConfig,
}

impl Plugin for GalleryWalkPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .init_state::<AppState>()
            .configure_sets(
                Update,
                (
                    WalkSet::Input,
                    WalkSet::Movement,
                    WalkSet::Presentation,
                    WalkSet::Scroll,
                )
                    .chain(),
            )
            .add_plugins((
                welcome::WelcomePlugin,
                input::WalkInputPlugin,
                view::GalleryViewPlugin,
                camera::ScrollCameraPlugin,
            ))
            .add_systems(
                OnEnter(AppState::Gallery),
                (view::mount_gallery, camera::attach_camera_scroll).chain(),
            )
            .add_systems(
                OnExit(AppState::Gallery),
                (
                    despawn_view_scoped,
                    view::unmount_gallery,
                    camera::detach_camera_scroll,
                ),
            );
    }
}

pub fn run() {
    run_with(GalleryConfig::default());
}

pub fn run_with(config: GalleryConfig) {
    let info = walk_helpers::WalkInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        native_assets: concat!(env!("CARGO_MANIFEST_DIR"), "/assets"),
    };
    walk_helpers::get_default_app(&info)
        .add_plugins(GalleryWalkPlugin { config })
        .run();
}
