use bevy::math::{IVec2, Vec2};
use serde::Deserialize;
use strum::{Display, EnumString};

use crate::catalog::{Catalog, CatalogError};
use crate::config::GalleryConfig;

/// One cell of the virtual grid. `y` grows downwards, like the page.
pub type TileCoord = IVec2;

/// Wall of the walkway a photo hangs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Footprint {
    pub width: i32,
    pub height: i32,
}

impl Footprint {
    pub const PHOTO: Self = Self {
        width: 3,
        height: 4,
    };

    pub const fn covers(self, origin: TileCoord, coord: TileCoord) -> bool {
        coord.x >= origin.x
            && coord.x < origin.x + self.width
            && coord.y >= origin.y
            && coord.y < origin.y + self.height
    }

    pub const fn overlaps(self, a: TileCoord, b: TileCoord) -> bool {
        a.x < b.x + self.width
            && b.x < a.x + self.width
            && a.y < b.y + self.height
            && b.y < a.y + self.height
    }

    pub const fn spans_row(self, origin: TileCoord, y: i32) -> bool {
        y >= origin.y && y < origin.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obstacle {
    pub id: String,
    pub side: Side,
    pub origin: TileCoord,
    pub caption: String,
    pub image: Option<String>,
}

/// Inclusive walkable range on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkBounds {
    pub min: TileCoord,
    pub max: TileCoord,
}

impl WalkBounds {
    pub const fn contains(self, coord: TileCoord) -> bool {
        coord.x >= self.min.x
            && coord.x <= self.max.x
            && coord.y >= self.min.y
            && coord.y <= self.max.y
    }

    pub fn clamp(self, coord: TileCoord) -> TileCoord {
        TileCoord::new(
            coord.x.max(self.min.x).min(self.max.x),
            coord.y.max(self.min.y).min(self.max.y),
        )
    }
}

/// Immutable layout of the gallery: the photos and the lane the avatar may walk.
#[derive(Debug, Clone)]
pub struct GridModel {
    obstacles: Vec<Obstacle>,
    footprint: Footprint,
    bounds: WalkBounds,
    tile_size: f32,
    columns: i32,
    rows: i32,
}

impl GridModel {
    /// Builds the grid and derives its bounds from the photo positions.
    ///
    /// The lane runs between the innermost left column and the innermost right
    /// column. Vertically the avatar may go one row past the bottom of the last
    /// photo.
    pub fn new(catalog: &Catalog, config: &GalleryConfig) -> Result<Self, CatalogError> {
        let footprint = config.footprint;
        let columns = config.grid_width;
        catalog.check_layout(footprint, columns)?;

        let obstacles: Vec<Obstacle> = catalog
            .records()
            .iter()
            .map(|record| Obstacle {
                id: record.id.clone(),
                side: record.side,
                origin: record.origin(),
                caption: record.caption.clone(),
                image: record.image.clone(),
            })
            .collect();

        let min_x = obstacles
            .iter()
            .filter(|obstacle| obstacle.side == Side::Left)
            .map(|obstacle| obstacle.origin.x + footprint.width)
            .max()
            .unwrap_or(0);
        let max_x = obstacles
            .iter()
            .filter(|obstacle| obstacle.side == Side::Right)
            .map(|obstacle| obstacle.origin.x - 1)
            .min()
            .unwrap_or(columns - 1);
        if min_x > max_x {
            return Err(CatalogError::NoWalkableLane {
                min: min_x,
                max: max_x,
            });
        }

        let Some(last) = obstacles.iter().max_by_key(|obstacle| obstacle.origin.y) else {
            return Err(CatalogError::Empty);
        };
        // check_layout keeps this far from overflow
        let photo_bottom = last.origin.y + footprint.height;
        let rows = photo_bottom
            .checked_add(config.extra_bottom_rows)
            .filter(|rows| *rows >= photo_bottom)
            .ok_or_else(|| CatalogError::RowOutOfRange {
                id: last.id.clone(),
                y: last.origin.y,
            })?;

        let bounds = WalkBounds {
            min: TileCoord::new(min_x, 0),
            max: TileCoord::new(max_x, photo_bottom + 1),
        };

        Ok(Self {
            obstacles,
            footprint,
            bounds,
            tile_size: config.tile_size,
            columns,
            rows,
        })
    }

    /// Replaces the derived bounds, clamped to the rendered grid.
    pub fn with_bounds(mut self, bounds: WalkBounds) -> Self {
        let limit = WalkBounds {
            min: TileCoord::ZERO,
            max: TileCoord::new(self.columns - 1, self.rows - 1),
        };
        self.bounds = WalkBounds {
            min: limit.clamp(bounds.min),
            max: limit.clamp(bounds.max),
        };
        self
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacle(&self, id: &str) -> Option<&Obstacle> {
        self.obstacles.iter().find(|obstacle| obstacle.id == id)
    }

    pub const fn footprint(&self) -> Footprint {
        self.footprint
    }

    pub const fn bounds(&self) -> WalkBounds {
        self.bounds
    }

    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Rendered grid size in tiles.
    pub const fn extent(&self) -> IVec2 {
        IVec2::new(self.columns, self.rows)
    }

    pub fn pixel_extent(&self) -> Vec2 {
        self.extent().as_vec2() * self.tile_size
    }

    pub const fn in_bounds(&self, coord: TileCoord) -> bool {
        self.bounds.contains(coord)
    }

    pub fn clamp(&self, coord: TileCoord) -> TileCoord {
        self.bounds.clamp(coord)
    }

    pub fn obstacle_covering(&self, coord: TileCoord) -> Option<&Obstacle> {
        self.obstacles
            .iter()
            .find(|obstacle| self.footprint.covers(obstacle.origin, coord))
    }

    pub fn blocked_at(&self, coord: TileCoord) -> bool {
        self.obstacle_covering(coord).is_some()
    }

    /// Top-left corner of a tile in page pixels.
    pub fn tile_to_pixel(&self, coord: TileCoord) -> Vec2 {
        coord.as_vec2() * self.tile_size
    }

    /// Photo under a page pixel, if any.
    pub fn obstacle_at_pixel(&self, pixel: Vec2) -> Option<&Obstacle> {
        let coord = (pixel / self.tile_size).floor().as_ivec2();
        self.obstacle_covering(coord)
    }
}
