//! Planner settings read from an optional TOML file.

use std::path::Path;

use anyhow::{Context, Result};
use rampart_system_planner::{ReductionMode, WaypointPlanner};
use rampart_system_search::SearchConfig;
use serde::Deserialize;

/// Settings file layout; every section is optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlannerSettings {
    /// `[search]` table.
    pub(crate) search: SearchConfig,
    /// `[reduction]` table.
    pub(crate) reduction: ReductionSettings,
}

/// `[reduction]` table of the settings file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ReductionSettings {
    /// Reduction passes applied to found paths.
    pub(crate) mode: ReductionMode,
}

/// Values given on the command line; they win over the file.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PlannerOverrides {
    pub(crate) max_expansions: Option<usize>,
    pub(crate) reduction: Option<ReductionMode>,
}

impl PlannerSettings {
    /// Reads settings from `path`, or returns defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let settings = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?settings, "loaded planner settings");
        Ok(settings)
    }

    /// Applies command-line overrides on top of the file values.
    #[must_use]
    pub(crate) fn with_overrides(mut self, overrides: PlannerOverrides) -> Self {
        if let Some(limit) = overrides.max_expansions {
            self.search.max_expansions = Some(limit);
        }
        if let Some(mode) = overrides.reduction {
            self.reduction.mode = mode;
        }
        self
    }

    /// Builds the planner described by the settings.
    #[must_use]
    pub(crate) fn planner(&self) -> WaypointPlanner {
        WaypointPlanner::new(self.search, self.reduction.mode)
    }
}
