#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Waypoint planner that chains the search with the configured reduction.
//!
//! Agents ask the planner for a route between two cells. The planner runs
//! the A* search, applies the reduction passes selected by
//! [`ReductionMode`], and hands back both the raw path and the waypoints the
//! movement controller should steer toward.

use std::{fmt, str::FromStr};

use glam::Vec2;
use rampart_core::{CellCoord, CellRect, NavError};
use rampart_grid::{GridFrame, NavGrid, SharedNavGrid};
use rampart_system_reducer::{collapse_turns, simplify_by_visibility};
use rampart_system_search::{AStar, SearchConfig, SearchOutcome};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reduction passes applied to a raw search result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReductionMode {
    /// Keep every cell of the raw path.
    Raw,
    /// Keep only the cells where the path turns.
    Turns,
    /// Drop cells a straight unobstructed line can skip.
    #[default]
    Visibility,
    /// Collapse turns first, then simplify by visibility.
    TurnsThenVisibility,
}

impl ReductionMode {
    /// Every mode, in declaration order.
    pub const ALL: [ReductionMode; 4] = [
        ReductionMode::Raw,
        ReductionMode::Turns,
        ReductionMode::Visibility,
        ReductionMode::TurnsThenVisibility,
    ];

    /// Reduces `path` according to the mode.
    #[must_use]
    pub fn apply(self, grid: &NavGrid, path: &[CellCoord]) -> Vec<CellCoord> {
        match self {
            Self::Raw => path.to_vec(),
            Self::Turns => collapse_turns(path),
            Self::Visibility => simplify_by_visibility(grid, path),
            Self::TurnsThenVisibility => simplify_by_visibility(grid, &collapse_turns(path)),
        }
    }

    /// Stable kebab-case name used in configuration files and flags.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Turns => "turns",
            Self::Visibility => "visibility",
            Self::TurnsThenVisibility => "turns-then-visibility",
        }
    }
}

impl fmt::Display for ReductionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReductionMode {
    type Err = UnknownReductionMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownReductionMode(trimmed.to_owned()))
    }
}

/// Raised when a reduction mode name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown reduction mode '{0}' (expected raw, turns, visibility or turns-then-visibility)")]
pub struct UnknownReductionMode(pub String);

/// Route produced for a reachable target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// Cell-by-cell shortest path from start to target.
    pub path: Vec<CellCoord>,
    /// Reduced waypoints, an order-preserving subsequence of `path`.
    pub waypoints: Vec<CellCoord>,
    /// Nodes the search expanded to find the path.
    pub nodes_expanded: usize,
}

impl Route {
    /// World-space positions of the waypoints within `frame`.
    #[must_use]
    pub fn world_waypoints(&self, frame: &GridFrame) -> Vec<Vec2> {
        self.waypoints
            .iter()
            .map(|cell| frame.world_position(*cell))
            .collect()
    }
}

/// Result of a planning request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanOutcome {
    /// The target is reachable.
    Routed(Route),
    /// No four-connected passable route exists.
    Unreachable {
        /// Nodes the search expanded before giving up.
        nodes_expanded: usize,
    },
    /// The search budget ran out before the search concluded.
    BudgetExhausted {
        /// Nodes the search expanded before stopping.
        nodes_expanded: usize,
    },
}

impl PlanOutcome {
    /// The route, if the target was reached.
    #[must_use]
    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::Routed(route) => Some(route),
            Self::Unreachable { .. } | Self::BudgetExhausted { .. } => None,
        }
    }

    /// Waypoints to follow, empty when no route was produced.
    #[must_use]
    pub fn into_waypoints(self) -> Vec<CellCoord> {
        match self {
            Self::Routed(route) => route.waypoints,
            Self::Unreachable { .. } | Self::BudgetExhausted { .. } => Vec::new(),
        }
    }
}

/// Plans waypoint routes for agents.
#[derive(Clone, Copy, Debug, Default)]
pub struct WaypointPlanner {
    search: AStar,
    reduction: ReductionMode,
}

impl WaypointPlanner {
    /// Creates a planner with the provided search budget and reduction.
    #[must_use]
    pub const fn new(config: SearchConfig, reduction: ReductionMode) -> Self {
        Self {
            search: AStar::new(config),
            reduction,
        }
    }

    /// Search configuration used by the planner.
    #[must_use]
    pub const fn search_config(&self) -> SearchConfig {
        self.search.config()
    }

    /// Reduction applied to found paths.
    #[must_use]
    pub const fn reduction(&self) -> ReductionMode {
        self.reduction
    }

    /// Plans a route from `start` to `target` on `grid`.
    pub fn plan(
        &self,
        grid: &NavGrid,
        start: CellCoord,
        target: CellCoord,
    ) -> Result<PlanOutcome, NavError> {
        let report = self.search.search(grid, start, target)?;
        let nodes_expanded = report.nodes_expanded;

        let outcome = match report.outcome {
            SearchOutcome::Found(path) => {
                let waypoints = self.reduction.apply(grid, &path);
                tracing::debug!(
                    cells = path.len(),
                    waypoints = waypoints.len(),
                    reduction = %self.reduction,
                    "route planned"
                );
                PlanOutcome::Routed(Route {
                    path,
                    waypoints,
                    nodes_expanded,
                })
            }
            SearchOutcome::Unreachable => PlanOutcome::Unreachable { nodes_expanded },
            SearchOutcome::BudgetExhausted => PlanOutcome::BudgetExhausted { nodes_expanded },
        };

        Ok(outcome)
    }

    /// Reports whether `spawn` still reaches `goal` once `footprint` is obstructed.
    ///
    /// The footprint is placed for the duration of one search and lifted
    /// again before returning, so `grid` comes back unchanged whatever the
    /// result. A search that runs out of budget counts as blocked.
    pub fn keeps_route(
        &self,
        grid: &mut NavGrid,
        footprint: CellRect,
        spawn: CellCoord,
        goal: CellCoord,
    ) -> Result<bool, NavError> {
        grid.ensure_contains(spawn)?;
        grid.ensure_contains(goal)?;

        grid.obstruct_region(footprint);
        let report = self.search.search(grid, spawn, goal);
        grid.clear_region(footprint);

        let open = matches!(report?.outcome, SearchOutcome::Found(_));
        tracing::debug!(?footprint, open, "placement route check");
        Ok(open)
    }

    /// Plans against a shared grid, holding its read lock for the whole request.
    pub fn plan_shared(
        &self,
        grid: &SharedNavGrid,
        start: CellCoord,
        target: CellCoord,
    ) -> Result<PlanOutcome, NavError> {
        let guard = grid.read();
        self.plan(&guard, start, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduction_mode_names_round_trip() {
        for mode in ReductionMode::ALL {
            assert_eq!(mode.name().parse::<ReductionMode>(), Ok(mode));
            assert_eq!(mode.to_string(), mode.name());
        }
        assert_eq!(
            " Turns-Then-Visibility ".parse::<ReductionMode>(),
            Ok(ReductionMode::TurnsThenVisibility)
        );
    }

    #[test]
    fn unknown_reduction_mode_is_reported() {
        let error = "diagonal".parse::<ReductionMode>().expect_err("unknown mode");
        assert_eq!(error, UnknownReductionMode("diagonal".to_owned()));
    }

    #[test]
    fn default_planner_simplifies_without_budget() {
        let planner = WaypointPlanner::default();
        assert_eq!(planner.reduction(), ReductionMode::Visibility);
        assert_eq!(planner.search_config(), SearchConfig::unbounded());
    }

    #[test]
    fn non_routed_outcomes_have_no_waypoints() {
        let unreachable = PlanOutcome::Unreachable { nodes_expanded: 4 };
        assert!(unreachable.route().is_none());
        assert!(unreachable.into_waypoints().is_empty());
    }
}
