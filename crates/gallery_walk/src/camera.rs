use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use walk_helpers::viewport_width;

use crate::config::GalleryConfig;
use crate::movement::WalkController;
use crate::scroll::{ScrollContainer, ScrollMetrics, ScrollSynchronizer, ViewportClass};
use crate::view::{Avatar, AvatarMoved, avatar_top_pixel};
use crate::{AppState, WalkSet};

// Closer than this and the animation snaps to its target.
const SNAP_DISTANCE: f32 = 0.5;

#[derive(Component)]
pub struct GalleryCamera;

/// Vertical scroll state of the gallery camera, in page pixels.
///
/// The camera shows the page from `scroll_top` down and eases towards the
/// most recent target.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct CameraScroll {
    scroll_top: f32,
    target: Option<f32>,
    visible_height: f32,
    content_height: f32,
}

impl CameraScroll {
    pub const fn new(content_height: f32, visible_height: f32) -> Self {
        Self {
            scroll_top: 0.0,
            target: None,
            visible_height,
            content_height,
        }
    }

    pub const fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub const fn target(&self) -> Option<f32> {
        self.target
    }

    pub fn set_visible_height(&mut self, visible_height: f32) {
        self.visible_height = visible_height.max(0.0);
    }

    /// Moves `scroll_top` a frame closer to the target.
    pub fn advance(&mut self, delta_secs: f32, smoothing: f32) -> f32 {
        if let Some(target) = self.target {
            let alpha = 1.0 - (-smoothing * delta_secs).exp();
            self.scroll_top += (target - self.scroll_top) * alpha;
            if (target - self.scroll_top).abs() < SNAP_DISTANCE {
                self.scroll_top = target;
                self.target = None;
            }
        }
        self.scroll_top
    }

    /// World `y` of the camera centre for the current scroll offset.
    pub fn camera_y(&self) -> f32 {
        -(self.scroll_top + self.visible_height / 2.0)
    }
}

impl ScrollContainer for CameraScroll {
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.scroll_top,
            visible_height: self.visible_height,
            content_height: self.content_height,
        }
    }

    fn smooth_scroll_to(&mut self, top: f32) {
        let max = self.metrics().max_scroll();
        self.target = Some(top.max(0.0).min(max));
    }
}

pub struct ScrollCameraPlugin;

impl Plugin for ScrollCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera).add_systems(
            Update,
            (
                sync_viewport_scroll
                    .run_if(in_state(AppState::Gallery))
                    .run_if(resource_exists::<WalkController>)
                    .run_if(resource_exists::<ScrollSynchronizer>),
                animate_camera_scroll,
            )
                .chain()
                .in_set(WalkSet::Scroll),
        );
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Camera2d, GalleryCamera));
}

pub(crate) fn attach_camera_scroll(
    mut commands: Commands,
    controller: Option<Res<WalkController>>,
    cameras: Query<(Entity, &Camera), With<GalleryCamera>>,
) {
    let Some(controller) = controller else {
        return;
    };

    let content_height = controller.grid().pixel_extent().y;
    for (entity, camera) in &cameras {
        let visible_height = camera
            .logical_viewport_size()
            .map_or(0.0, |size| size.y);
        commands
            .entity(entity)
            .insert(CameraScroll::new(content_height, visible_height));
    }
}

pub(crate) fn detach_camera_scroll(
    mut commands: Commands,
    mut cameras: Query<(Entity, &mut Transform), With<GalleryCamera>>,
) {
    for (entity, mut transform) in &mut cameras {
        commands.entity(entity).remove::<CameraScroll>();
        transform.translation.x = 0.0;
        transform.translation.y = 0.0;
    }
}

/// Re-anchors the viewport on the avatar after each move.
fn sync_viewport_scroll(
    controller: Res<WalkController>,
    mut moves: EventReader<AvatarMoved>,
    mut synchronizer: ResMut<ScrollSynchronizer>,
    config: Res<GalleryConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    avatars: Query<&Transform, With<Avatar>>,
    mut cameras: Query<&mut CameraScroll>,
) {
    let moved = moves.read().count() > 0;
    if !controller.is_added() && !moved {
        return;
    }

    let class = windows.get_single().map_or(ViewportClass::Mobile, |window| {
        ViewportClass::from_width(viewport_width(window), config.mobile_breakpoint)
    });

    let mut container = cameras.get_single_mut().ok();
    let avatar_offset = match (container.as_deref(), avatars.get_single()) {
        (Some(scroll), Ok(transform)) => {
            Some(avatar_top_pixel(controller.grid(), transform.translation) - scroll.scroll_top())
        }
        _ => None,
    };

    if let Some(target) = synchronizer.sync(
        container.as_deref_mut(),
        avatar_offset,
        class.anchor_fraction(&config),
    ) {
        debug!("Scrolling to {target:.0} ({class})");
    }
}

fn animate_camera_scroll(
    time: Res<Time>,
    config: Res<GalleryConfig>,
    mut cameras: Query<(&Camera, &mut CameraScroll, &mut Transform)>,
) {
    for (camera, mut scroll, mut transform) in &mut cameras {
        if let Some(size) = camera.logical_viewport_size() {
            scroll.set_visible_height(size.y);
        }
        scroll.advance(time.delta_secs(), config.scroll_smoothing);
        transform.translation.x = 0.0;
        transform.translation.y = scroll.camera_y();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_scroll_is_clamped() {
        let mut scroll = CameraScroll::new(1760.0, 640.0);
        scroll.smooth_scroll_to(5000.0);
        assert_eq!(scroll.target(), Some(1120.0), "max scroll");
        scroll.smooth_scroll_to(-20.0);
        assert_eq!(scroll.target(), Some(0.0), "top");
    }

    #[test]
    fn test_advance_eases_then_snaps() {
        let mut scroll = CameraScroll::new(1760.0, 640.0);
        scroll.smooth_scroll_to(300.0);

        let first = scroll.advance(1.0 / 60.0, 12.0);
        assert!(first > 0.0 && first < 300.0, "partway after one frame: {first}");

        for _ in 0..120 {
            scroll.advance(1.0 / 60.0, 12.0);
        }
        assert_eq!(scroll.scroll_top(), 300.0, "arrived");
        assert_eq!(scroll.target(), None, "animation finished");
    }

    #[test]
    fn test_latest_request_wins() {
        let mut scroll = CameraScroll::new(1760.0, 640.0);
        scroll.smooth_scroll_to(400.0);
        scroll.advance(1.0 / 60.0, 12.0);
        scroll.smooth_scroll_to(100.0);

        for _ in 0..120 {
            scroll.advance(1.0 / 60.0, 12.0);
        }
        assert_eq!(scroll.scroll_top(), 100.0, "settles on the newest target");
    }

    #[test]
    fn test_camera_centre_follows_scroll() {
        let scroll = CameraScroll::new(1760.0, 640.0);
        assert_eq!(scroll.camera_y(), -320.0, "top of the page fills the view");
        assert_eq!(
            scroll.metrics(),
            ScrollMetrics {
                scroll_top: 0.0,
                visible_height: 640.0,
                content_height: 1760.0,
            },
            "metrics"
        );
    }
}
