use bevy::asset::{AssetMetaCheck, AssetMode, AssetPlugin};
use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{Backends, PowerPreference, RenderCreation, WgpuSettings};
use bevy::window::{PresentMode, WindowResolution};

#[cfg(target_arch = "wasm32")]
use crate::window_resizing::handle_browser_resize;

// Invitation card frame, same 9:16 ratio as a phone held upright
pub const WINDOW_WIDTH: f32 = 360.0;
pub const WINDOW_HEIGHT: f32 = 640.0;

/// Page background behind every view.
pub const PAGE_COLOR: Color = Color::srgb(0.937, 0.937, 0.937);

/// Canvas element the wasm build draws into.
pub const CANVAS_SELECTOR: &str = "#gallery";

/// Where a walk is published and where its assets live.
#[derive(Debug, Clone, Copy)]
pub struct WalkInfo<'a> {
    pub name: &'a str,
    pub version: &'a str,
    /// Asset directory for native runs, usually `<crate>/assets`.
    pub native_assets: &'a str,
}

impl WalkInfo<'_> {
    /// Assets are read from disk natively and from the versioned publish folder on the web.
    fn asset_root(&self) -> String {
        if cfg!(target_arch = "wasm32") {
            format!("walks/{}-{}/assets", self.name, self.version)
        } else {
            self.native_assets.to_owned()
        }
    }
}

fn asset_plugin(info: &WalkInfo<'_>) -> AssetPlugin {
    AssetPlugin {
        mode: AssetMode::Unprocessed,
        file_path: info.asset_root(),
        // Static hosting has no .meta files, asking for them only adds 404s
        meta_check: AssetMetaCheck::Never,
        ..default()
    }
}

fn window_plugin(info: &WalkInfo<'_>) -> WindowPlugin {
    WindowPlugin {
        primary_window: Some(Window {
            title: info.name.to_owned(),
            present_mode: PresentMode::AutoVsync,
            resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            canvas: Some(CANVAS_SELECTOR.into()),
            fit_canvas_to_parent: true,
            // Leave browser shortcuts and page scrolling keys alone
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    }
}

// Photos and a few sprites, the low power adapter is plenty on phones
fn render_plugin() -> RenderPlugin {
    RenderPlugin {
        render_creation: RenderCreation::Automatic(WgpuSettings {
            backends: Some(Backends::BROWSER_WEBGPU | Backends::GL | Backends::PRIMARY),
            power_preference: PowerPreference::LowPower,
            ..default()
        }),
        ..default()
    }
}

/// Creates the Bevy app shared by every view of a walk.
///
/// On wasm the app draws into [`CANVAS_SELECTOR`] and follows the browser size.
pub fn get_default_app(info: &WalkInfo<'_>) -> App {
    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(asset_plugin(info))
            .set(window_plugin(info))
            .set(render_plugin()),
    )
    // Keeps the frame rate down while nothing moves, guests mostly open this on a phone.
    .add_plugins(bevy_framepace::FramepacePlugin)
    .insert_resource(ClearColor(PAGE_COLOR));

    #[cfg(target_arch = "wasm32")]
    app.add_systems(PreUpdate, handle_browser_resize);

    info!("{} {} app created", info.name, info.version);

    app
}
