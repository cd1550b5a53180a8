use tracing::debug;

use crate::grid::{Footprint, GridModel, Obstacle, Side, TileCoord};

/// The lane column from which a photo can be looked at, one tile outside its footprint.
pub const fn facing_column(obstacle: &Obstacle, footprint: Footprint) -> i32 {
    match obstacle.side {
        Side::Left => obstacle.origin.x + footprint.width,
        Side::Right => obstacle.origin.x - 1,
    }
}

/// First photo, in catalog order, faced from `coord`.
pub fn faced_obstacle(grid: &GridModel, coord: TileCoord) -> Option<&Obstacle> {
    let footprint = grid.footprint();
    grid.obstacles().iter().find(|obstacle| {
        coord.x == facing_column(obstacle, footprint) && footprint.spans_row(obstacle.origin, coord.y)
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProximityChange {
    Entered(String),
    Left(String),
    Switched { from: String, to: String },
}

/// Remembers which photo is faced and reports only transitions.
#[derive(Debug, Default, Clone)]
pub struct ProximityTracker {
    active: Option<String>,
}

impl ProximityTracker {
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn update(&mut self, grid: &GridModel, coord: TileCoord) -> Option<ProximityChange> {
        let faced = faced_obstacle(grid, coord).map(|obstacle| obstacle.id.as_str());
        if faced == self.active.as_deref() {
            return None;
        }

        let change = match (self.active.take(), faced) {
            (None, Some(to)) => ProximityChange::Entered(to.to_owned()),
            (Some(from), None) => ProximityChange::Left(from),
            (Some(from), Some(to)) => ProximityChange::Switched {
                from,
                to: to.to_owned(),
            },
            (None, None) => return None,
        };
        self.active = faced.map(str::to_owned);
        debug!(?change, "proximity changed at {coord}");
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::GalleryConfig;

    fn gallery() -> GridModel {
        let catalog = Catalog::embedded().expect("embedded catalog");
        GridModel::new(&catalog, &GalleryConfig::default()).expect("embedded grid")
    }

    fn faced_id(grid: &GridModel, x: i32, y: i32) -> Option<&str> {
        faced_obstacle(grid, TileCoord::new(x, y)).map(|obstacle| obstacle.id.as_str())
    }

    #[test]
    fn test_facing_columns() {
        let grid = gallery();
        let footprint = grid.footprint();
        let left = grid.obstacle("left-0").expect("left-0");
        let right = grid.obstacle("right-0").expect("right-0");
        assert_eq!(facing_column(left, footprint), 4, "origin.x + width");
        assert_eq!(facing_column(right, footprint), 6, "origin.x - 1");
    }

    #[test]
    fn test_faced_only_within_vertical_span() {
        let grid = gallery();
        assert_eq!(faced_id(&grid, 4, 3), Some("left-0"), "top row");
        assert_eq!(faced_id(&grid, 4, 6), Some("left-0"), "bottom row");
        assert_eq!(faced_id(&grid, 4, 7), None, "gap between photos");
        assert_eq!(faced_id(&grid, 4, 8), Some("left-1"), "next photo");
        assert_eq!(faced_id(&grid, 6, 48), Some("right-9"), "last right photo");
        assert_eq!(faced_id(&grid, 5, 10), None, "middle of the lane");
    }

    #[test]
    fn test_tracker_reports_transitions_only() {
        let grid = gallery();
        let mut tracker = ProximityTracker::default();

        assert_eq!(tracker.update(&grid, TileCoord::new(5, 3)), None, "nothing faced");
        assert_eq!(
            tracker.update(&grid, TileCoord::new(6, 3)),
            Some(ProximityChange::Entered("right-0".into())),
            "step right"
        );
        assert_eq!(tracker.update(&grid, TileCoord::new(6, 4)), None, "same photo");
        assert_eq!(
            tracker.update(&grid, TileCoord::new(6, 7)),
            Some(ProximityChange::Left("right-0".into())),
            "below the photo"
        );
        assert_eq!(
            tracker.update(&grid, TileCoord::new(6, 8)),
            Some(ProximityChange::Entered("right-1".into())),
            "next photo"
        );
        assert_eq!(tracker.active(), Some("right-1"), "active kept");
    }

    #[test]
    fn test_tracker_switches_between_adjacent_photos() {
        let json = r#"[
            { "id": "a", "side": "left", "x": 0, "y": 0, "caption": "one" },
            { "id": "b", "side": "left", "x": 0, "y": 4, "caption": "two" }
        ]"#;
        let catalog = Catalog::from_json(json).expect("parses");
        let grid = GridModel::new(&catalog, &GalleryConfig::default()).expect("grid");
        let mut tracker = ProximityTracker::default();

        tracker.update(&grid, TileCoord::new(3, 3));
        assert_eq!(
            tracker.update(&grid, TileCoord::new(3, 4)),
            Some(ProximityChange::Switched {
                from: "a".into(),
                to: "b".into()
            }),
            "stacked photos"
        );
    }
}
