use bevy::prelude::Resource;
use strum::Display;
use tracing::debug;

use crate::config::GalleryConfig;

/// Snapshot of a scrollable container, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f32,
    pub visible_height: f32,
    pub content_height: f32,
}

impl ScrollMetrics {
    pub fn max_scroll(&self) -> f32 {
        (self.content_height - self.visible_height).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ViewportClass {
    Mobile,
    Desktop,
}

impl ViewportClass {
    pub fn from_width(width: f32, breakpoint: f32) -> Self {
        if width <= breakpoint {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    /// Fraction of the visible height where the avatar is kept.
    pub const fn anchor_fraction(self, config: &GalleryConfig) -> f32 {
        match self {
            Self::Mobile => config.mobile_anchor,
            Self::Desktop => config.desktop_anchor,
        }
    }
}

/// Scroll offset that puts the avatar at `anchor` of the visible height,
/// kept inside the scrollable range.
pub fn target_scroll(metrics: ScrollMetrics, avatar_offset: f32, anchor: f32) -> f32 {
    let target = metrics.scroll_top + avatar_offset - metrics.visible_height * anchor;
    target.max(0.0).min(metrics.max_scroll())
}

/// A viewport owned by the host that can be scrolled with an animation.
///
/// A new request replaces the target of one still in flight.
pub trait ScrollContainer {
    fn metrics(&self) -> ScrollMetrics;
    fn smooth_scroll_to(&mut self, top: f32);
}

/// Keeps the avatar anchored in the viewport after each move.
///
/// The first call after creation belongs to the initial render and is skipped
/// so entering the gallery does not jump.
#[derive(Resource, Debug, Default)]
pub struct ScrollSynchronizer {
    mounted: bool,
}

impl ScrollSynchronizer {
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Returns the requested scroll offset, or `None` when nothing was issued.
    ///
    /// `avatar_offset` is the avatar top relative to the visible top of the container.
    pub fn sync<C: ScrollContainer + ?Sized>(
        &mut self,
        container: Option<&mut C>,
        avatar_offset: Option<f32>,
        anchor: f32,
    ) -> Option<f32> {
        if !self.mounted {
            self.mounted = true;
            return None;
        }

        let (Some(container), Some(avatar_offset)) = (container, avatar_offset) else {
            debug!("Scroll sync skipped, container or avatar not ready");
            return None;
        };

        let target = target_scroll(container.metrics(), avatar_offset, anchor);
        container.smooth_scroll_to(target);
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeContainer {
        metrics: Option<ScrollMetrics>,
        requests: Vec<f32>,
    }

    impl ScrollContainer for FakeContainer {
        fn metrics(&self) -> ScrollMetrics {
            self.metrics.unwrap_or(ScrollMetrics {
                scroll_top: 0.0,
                visible_height: 600.0,
                content_height: 1800.0,
            })
        }

        fn smooth_scroll_to(&mut self, top: f32) {
            self.requests.push(top);
        }
    }

    const METRICS: ScrollMetrics = ScrollMetrics {
        scroll_top: 100.0,
        visible_height: 600.0,
        content_height: 1800.0,
    };

    #[test]
    fn test_target_keeps_avatar_at_anchor() {
        // 100 + 400 - 600 * 0.5
        assert!((target_scroll(METRICS, 400.0, 0.5) - 200.0).abs() < 1e-4, "mobile anchor");
        // 100 + 400 - 600 * 0.7
        assert!((target_scroll(METRICS, 400.0, 0.7) - 80.0).abs() < 1e-4, "desktop anchor");
    }

    #[test]
    fn test_target_is_clamped() {
        assert!(target_scroll(METRICS, 10.0, 0.7) <= 0.0, "never above the content");
        assert!(
            (target_scroll(METRICS, 5000.0, 0.5) - 1200.0).abs() < 1e-4,
            "never past the bottom"
        );

        let short = ScrollMetrics {
            scroll_top: 0.0,
            visible_height: 600.0,
            content_height: 300.0,
        };
        assert!(target_scroll(short, 250.0, 0.5).abs() < 1e-4, "content shorter than view");
    }

    #[test]
    fn test_viewport_class() {
        let config = GalleryConfig::default();
        assert_eq!(ViewportClass::from_width(768.0, 768.0), ViewportClass::Mobile, "inclusive");
        assert_eq!(ViewportClass::from_width(1024.0, 768.0), ViewportClass::Desktop, "wide");
        assert!(
            ViewportClass::Mobile.anchor_fraction(&config)
                < ViewportClass::Desktop.anchor_fraction(&config),
            "mobile anchor is the smaller fraction"
        );
    }

    #[test]
    fn test_mount_pass_is_skipped_once() {
        let mut container = FakeContainer {
            metrics: Some(METRICS),
            ..Default::default()
        };
        let mut sync = ScrollSynchronizer::default();

        assert_eq!(sync.sync(Some(&mut container), Some(400.0), 0.5), None, "mount pass");
        assert!(container.requests.is_empty(), "no scroll on mount");
        assert!(sync.is_mounted(), "guard flipped");

        assert_eq!(sync.sync(Some(&mut container), Some(400.0), 0.5), Some(200.0), "first move");
        assert_eq!(sync.sync(Some(&mut container), Some(700.0), 0.5), Some(500.0), "second move");
        assert_eq!(container.requests, vec![200.0, 500.0], "each move issues a scroll");
    }

    #[test]
    fn test_missing_references_are_a_no_op() {
        let mut container = FakeContainer::default();
        let mut sync = ScrollSynchronizer::default();
        sync.sync(Some(&mut container), Some(0.0), 0.5);

        assert_eq!(sync.sync::<FakeContainer>(None, Some(400.0), 0.5), None, "no container");
        assert_eq!(sync.sync(Some(&mut container), None, 0.5), None, "no avatar");
        assert!(container.requests.is_empty(), "nothing issued");

        assert!(
            sync.sync(Some(&mut container), Some(400.0), 0.5).is_some(),
            "recovers on the next move"
        );
    }
}
