use bevy::prelude::Resource;
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogError};
use crate::config::GalleryConfig;
use crate::grid::{GridModel, Obstacle, TileCoord};
use crate::proximity::{ProximityChange, ProximityTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// One tile along the direction, `y` grows downwards.
    pub const fn offset(self) -> TileCoord {
        match self {
            Self::Up => TileCoord::new(0, -1),
            Self::Down => TileCoord::new(0, 1),
            Self::Left => TileCoord::new(-1, 0),
            Self::Right => TileCoord::new(1, 0),
        }
    }
}

/// Next avatar tile for one direction event.
///
/// The candidate is clamped to the walk bounds and then dropped if it lands in
/// a photo footprint, in which case `current` is returned.
pub fn step(grid: &GridModel, current: TileCoord, direction: Direction) -> TileCoord {
    let candidate = grid.clamp(current + direction.offset());
    if grid.blocked_at(candidate) {
        current
    } else {
        candidate
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Moved {
        from: TileCoord,
        to: TileCoord,
        proximity: Option<ProximityChange>,
    },
    Blocked,
}

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Start tile {start} is inside photo {id}")]
    StartBlocked { start: TileCoord, id: String },
}

/// Owns the avatar for the lifetime of one gallery visit.
#[derive(Resource, Debug)]
pub struct WalkController {
    grid: GridModel,
    position: TileCoord,
    hint_visible: bool,
    proximity: ProximityTracker,
}

impl WalkController {
    /// Loads the grid from `catalog` and places the avatar on the configured start tile.
    pub fn mount(catalog: &Catalog, config: &GalleryConfig) -> Result<Self, ControllerError> {
        let grid = GridModel::new(catalog, config)?;
        Self::new(grid, config.start)
    }

    pub fn new(grid: GridModel, start: TileCoord) -> Result<Self, ControllerError> {
        let position = grid.clamp(start);
        if let Some(obstacle) = grid.obstacle_covering(position) {
            return Err(ControllerError::StartBlocked {
                start: position,
                id: obstacle.id.clone(),
            });
        }

        let mut proximity = ProximityTracker::default();
        proximity.update(&grid, position);

        info!(
            "Gallery mounted with {} photos, avatar at {position}",
            grid.obstacles().len()
        );

        Ok(Self {
            grid,
            position,
            hint_visible: true,
            proximity,
        })
    }

    /// Applies one direction event. Any attempt dismisses the first visit hint.
    pub fn step(&mut self, direction: Direction) -> StepOutcome {
        self.hint_visible = false;

        let from = self.position;
        let to = step(&self.grid, from, direction);
        if to == from {
            debug!("{direction} blocked at {from}");
            return StepOutcome::Blocked;
        }

        self.position = to;
        let proximity = self.proximity.update(&self.grid, to);
        debug!("{direction}: {from} -> {to}");

        StepOutcome::Moved {
            from,
            to,
            proximity,
        }
    }

    pub const fn position(&self) -> TileCoord {
        self.position
    }

    pub const fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    pub const fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn faced(&self) -> Option<&Obstacle> {
        self.proximity
            .active()
            .and_then(|id| self.grid.obstacle(id))
    }

    pub fn caption(&self) -> Option<&str> {
        self.faced().map(|obstacle| obstacle.caption.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WalkBounds;

    fn controller() -> WalkController {
        let catalog = Catalog::embedded().expect("embedded catalog");
        WalkController::mount(&catalog, &GalleryConfig::default()).expect("mount")
    }

    #[test]
    fn test_offsets_are_unit_steps() {
        use strum::IntoEnumIterator;

        for direction in Direction::iter() {
            let offset = direction.offset();
            assert_eq!(offset.x.abs() + offset.y.abs(), 1, "{direction} moves one tile");
        }
        assert_eq!("up".parse::<Direction>().ok(), Some(Direction::Up), "from str");
    }

    #[test]
    fn test_mount_places_avatar_and_hint() {
        let controller = controller();
        assert_eq!(controller.position(), TileCoord::new(5, 3), "start tile");
        assert!(controller.hint_visible(), "hint shown on mount");
        assert_eq!(controller.caption(), None, "nothing faced from the middle");
    }

    #[test]
    fn test_step_moves_and_reports_proximity() {
        let mut controller = controller();
        let outcome = controller.step(Direction::Left);
        assert_eq!(
            outcome,
            StepOutcome::Moved {
                from: TileCoord::new(5, 3),
                to: TileCoord::new(4, 3),
                proximity: Some(ProximityChange::Entered("left-0".into())),
            },
            "step towards left-0"
        );
        assert_eq!(controller.caption(), Some("In Tokyo"), "caption of left-0");
    }

    #[test]
    fn test_walls_block_without_moving() {
        let mut controller = controller();
        controller.step(Direction::Right);
        assert_eq!(controller.position(), TileCoord::new(6, 3), "one step right");
        assert_eq!(controller.step(Direction::Right), StepOutcome::Blocked, "lane edge");
        assert_eq!(controller.position(), TileCoord::new(6, 3), "unchanged");

        for _ in 0..3 {
            controller.step(Direction::Up);
        }
        assert_eq!(controller.position(), TileCoord::new(6, 0), "top row");
        assert_eq!(controller.step(Direction::Up), StepOutcome::Blocked, "top edge");
    }

    #[test]
    fn test_blocked_start_is_rejected() {
        let catalog = Catalog::embedded().expect("embedded catalog");
        let grid = GridModel::new(&catalog, &GalleryConfig::default())
            .expect("grid")
            .with_bounds(WalkBounds {
                min: TileCoord::ZERO,
                max: TileCoord::new(10, 54),
            });

        let err = WalkController::new(grid, TileCoord::new(2, 4)).expect_err("inside left-0");
        assert!(
            matches!(&err, ControllerError::StartBlocked { id, .. } if id == "left-0"),
            "got {err}"
        );
    }

    #[test]
    fn test_start_outside_bounds_is_clamped() {
        let catalog = Catalog::embedded().expect("embedded catalog");
        let grid = GridModel::new(&catalog, &GalleryConfig::default()).expect("grid");
        let controller = WalkController::new(grid, TileCoord::new(0, -2)).expect("clamped start");
        assert_eq!(controller.position(), TileCoord::new(4, 0), "clamped into the lane");
    }
}
