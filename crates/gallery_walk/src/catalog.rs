use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use crate::grid::{Footprint, Side, TileCoord};

const EMBEDDED_CATALOG: &str = include_str!("../assets/catalog.json");

/// Lowest row a photo may reach, far past any real page.
pub const MAX_PHOTO_BOTTOM: i32 = 1 << 16;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog has no photos")]
    Empty,

    #[error("Photo id {0} appears more than once")]
    DuplicateId(String),

    #[error("Photo {id} has a negative origin {origin}")]
    NegativeOrigin { id: String, origin: TileCoord },

    #[error("Photo {id} does not fit in a grid {columns} tiles wide")]
    OutsideGrid { id: String, columns: i32 },

    #[error("Photo {id} at row {y} is too far down the grid")]
    RowOutOfRange { id: String, y: i32 },

    #[error("Photos {first} and {second} overlap")]
    Overlap { first: String, second: String },

    #[error("No walkable lane between the photo columns (x {min} > {max})")]
    NoWalkableLane { min: i32, max: i32 },
}

/// One photo as written in the catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    pub side: Side,
    pub x: i32,
    pub y: i32,
    pub caption: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl PhotoRecord {
    pub const fn origin(&self) -> TileCoord {
        TileCoord::new(self.x, self.y)
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<PhotoRecord>,
}

impl Catalog {
    /// The catalog shipped with the crate.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<PhotoRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<PhotoRecord>) -> Result<Self, CatalogError> {
        if records.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut ids = HashSet::new();
        for record in &records {
            if !ids.insert(record.id.as_str()) {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
            if record.x < 0 || record.y < 0 {
                return Err(CatalogError::NegativeOrigin {
                    id: record.id.clone(),
                    origin: record.origin(),
                });
            }
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[PhotoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Footprints are never checked at runtime after this, so every pair is tested once here.
    pub fn check_layout(&self, footprint: Footprint, columns: i32) -> Result<(), CatalogError> {
        for record in &self.records {
            if record
                .x
                .checked_add(footprint.width)
                .is_none_or(|right| right > columns)
            {
                return Err(CatalogError::OutsideGrid {
                    id: record.id.clone(),
                    columns,
                });
            }
        }

        // Rows below the photos are added on top of this, keep headroom for them
        for record in &self.records {
            if record
                .y
                .checked_add(footprint.height)
                .is_none_or(|bottom| bottom > MAX_PHOTO_BOTTOM)
            {
                return Err(CatalogError::RowOutOfRange {
                    id: record.id.clone(),
                    y: record.y,
                });
            }
        }

        for (index, first) in self.records.iter().enumerate() {
            for second in self.records.iter().skip(index + 1) {
                if footprint.overlaps(first.origin(), second.origin()) {
                    return Err(CatalogError::Overlap {
                        first: first.id.clone(),
                        second: second.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
