//! Single-line transfer format for navigation grid layouts.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use rampart_core::{CellCoord, CellRect, CellRectSize, NavError};
use rampart_grid::NavGrid;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "grid";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "grid:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Grid dimensions plus every obstacle footprint placed on the grid.
///
/// Footprints may overlap; applying them stacks obstruction counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GridLayoutSnapshot {
    /// Number of cell columns contained in the grid.
    pub(crate) width: u32,
    /// Number of cell rows contained in the grid.
    pub(crate) height: u32,
    /// Obstacle footprints, one entry per placement.
    pub(crate) obstacles: Vec<CellRect>,
}

impl GridLayoutSnapshot {
    /// Captures the obstruction counts of `grid` as unit footprints.
    #[must_use]
    pub(crate) fn from_grid(grid: &NavGrid) -> Self {
        let mut obstacles = Vec::new();
        for cell in grid.obstructed_cells() {
            let count = grid.obstruction(cell).unwrap_or(0);
            let footprint = CellRect::from_origin_and_size(cell, CellRectSize::new(1, 1));
            obstacles.extend((0..count).map(|_| footprint));
        }

        Self {
            width: grid.width(),
            height: grid.height(),
            obstacles,
        }
    }

    /// Rebuilds the navigation grid described by the snapshot.
    pub(crate) fn to_grid(&self) -> Result<NavGrid, LayoutTransferError> {
        let mut grid = NavGrid::try_new(self.width, self.height)?;
        for footprint in &self.obstacles {
            grid.obstruct_region(*footprint);
        }
        Ok(grid)
    }

    /// Encodes the snapshot into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = SerializableSnapshot {
            obstacles: self.obstacles.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
            self.width, self.height
        ))
    }

    /// Decodes a snapshot from the provided string representation.
    ///
    /// Every obstacle must be anchored inside the declared grid; footprints
    /// may still extend past its far edges.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let fields: Vec<&str> = trimmed.splitn(4, FIELD_DELIMITER).collect();
        let &[domain, version, dimensions, payload] = fields.as_slice() else {
            return Err(match fields.len() {
                1 => LayoutTransferError::MissingVersion,
                2 => LayoutTransferError::MissingDimensions,
                _ => LayoutTransferError::MissingPayload,
            });
        };

        match (domain, version) {
            (SNAPSHOT_DOMAIN, SNAPSHOT_VERSION) => {}
            (SNAPSHOT_DOMAIN, other) => {
                return Err(LayoutTransferError::UnsupportedVersion(other.to_owned()))
            }
            (other, _) => return Err(LayoutTransferError::InvalidPrefix(other.to_owned())),
        }

        let (width, height) = parse_dimensions(dimensions)?;
        let json = STANDARD_NO_PAD
            .decode(payload)
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let SerializableSnapshot { obstacles } =
            serde_json::from_slice(&json).map_err(LayoutTransferError::InvalidPayload)?;

        if let Some((index, stray)) = obstacles.iter().enumerate().find(|(_, footprint)| {
            let origin = footprint.origin();
            origin.column() >= width || origin.row() >= height
        }) {
            return Err(LayoutTransferError::ObstacleOutsideGrid {
                index,
                origin: stray.origin(),
            });
        }

        Ok(Self {
            width,
            height,
            obstacles,
        })
    }

    /// Reports whether `value` looks like an encoded snapshot rather than an ASCII map.
    #[must_use]
    pub(crate) fn is_encoded(value: &str) -> bool {
        value
            .trim_start()
            .starts_with(&format!("{SNAPSHOT_DOMAIN}{FIELD_DELIMITER}"))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSnapshot {
    obstacles: Vec<CellRect>,
}

/// Errors that can occur while encoding or decoding layout transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout payload was empty")]
    EmptyPayload,
    /// The encoded snapshot did not contain a version segment.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include grid dimensions.
    #[error("layout string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded snapshot.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    #[error("could not process layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// An obstacle footprint is anchored outside the declared grid.
    #[error(
        "obstacle {index} is anchored at ({}, {}) outside the grid",
        .origin.column(),
        .origin.row()
    )]
    ObstacleOutsideGrid {
        /// Position of the obstacle in the payload.
        index: usize,
        /// Anchor cell of the obstacle.
        origin: CellCoord,
    },
    /// The declared dimensions cannot be turned into a grid.
    #[error(transparent)]
    InvalidGrid(#[from] NavError),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let mut axes = dimensions
        .split(['x', 'X'])
        .map(|axis| axis.trim().parse::<u32>().ok().filter(|cells| *cells > 0));

    match (axes.next(), axes.next(), axes.next()) {
        (Some(Some(width)), Some(Some(height)), None) => Ok((width, height)),
        _ => Err(invalid()),
    }
}
