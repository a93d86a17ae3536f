#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic A* search over the navigation grid.
//!
//! Movement is four-connected with unit step cost and the Manhattan distance
//! serves as heuristic, so every returned path holds the minimal number of
//! cells. Among equally good candidates the open set expands the one
//! discovered first, which makes the chosen route reproducible.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, HashSet},
};

use rampart_core::{CellCoord, NavError};
use rampart_grid::NavGrid;
use serde::{Deserialize, Serialize};

/// Tunables applied to every search run by an [`AStar`] instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of nodes expanded before the search gives up.
    ///
    /// `None` searches until the open set is exhausted.
    pub max_expansions: Option<usize>,
}

impl SearchConfig {
    /// Configuration without an expansion budget.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_expansions: None,
        }
    }

    /// Configuration that stops after `limit` node expansions.
    #[must_use]
    pub const fn with_budget(limit: usize) -> Self {
        Self {
            max_expansions: Some(limit),
        }
    }
}

/// Terminal state of a single search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A shortest path from start to target, both inclusive.
    Found(Vec<CellCoord>),
    /// The open set drained without reaching the target.
    Unreachable,
    /// The expansion budget ran out before the search concluded.
    BudgetExhausted,
}

impl SearchOutcome {
    /// Converts the outcome into a path, empty unless one was found.
    #[must_use]
    pub fn into_path(self) -> Vec<CellCoord> {
        match self {
            Self::Found(path) => path,
            Self::Unreachable | Self::BudgetExhausted => Vec::new(),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::Unreachable => "unreachable",
            Self::BudgetExhausted => "budget exhausted",
        }
    }
}

/// Outcome of a search together with the work it took.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    /// How the search concluded.
    pub outcome: SearchOutcome,
    /// Number of nodes moved to the closed set.
    pub nodes_expanded: usize,
}

/// A* pathfinder configured with an optional expansion budget.
#[derive(Clone, Copy, Debug, Default)]
pub struct AStar {
    config: SearchConfig,
}

impl AStar {
    /// Creates a pathfinder using the provided configuration.
    #[must_use]
    pub const fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Configuration applied to every search.
    #[must_use]
    pub const fn config(&self) -> SearchConfig {
        self.config
    }

    /// Searches for a shortest four-connected path from `start` to `target`.
    ///
    /// Both endpoints must lie inside the grid. The start cell's own
    /// obstruction is not consulted; every other cell on the path is
    /// passable.
    pub fn search(
        &self,
        grid: &NavGrid,
        start: CellCoord,
        target: CellCoord,
    ) -> Result<SearchReport, NavError> {
        grid.ensure_contains(start)?;
        grid.ensure_contains(target)?;
        tracing::trace!(?start, ?target, budget = ?self.config.max_expansions, "search started");

        let mut frontier = Frontier::seeded(start, target);
        let mut nodes_expanded = 0usize;

        let outcome = loop {
            let Some(current) = frontier.pop() else {
                break SearchOutcome::Unreachable;
            };

            let cell = frontier.nodes[current].cell;
            if cell == target {
                break SearchOutcome::Found(frontier.reconstruct(current));
            }

            if self
                .config
                .max_expansions
                .is_some_and(|limit| nodes_expanded >= limit)
            {
                break SearchOutcome::BudgetExhausted;
            }

            nodes_expanded += 1;
            frontier.close(cell);

            let tentative = frontier.nodes[current].g.saturating_add(1);
            for neighbor in grid.passable_neighbors(cell) {
                if frontier.is_closed(neighbor) {
                    continue;
                }
                frontier.relax(neighbor, tentative, target, current);
            }
        };

        tracing::debug!(
            ?start,
            ?target,
            nodes_expanded,
            outcome = outcome.label(),
            "search finished"
        );

        Ok(SearchReport {
            outcome,
            nodes_expanded,
        })
    }
}

/// Finds a shortest path from `start` to `target` without an expansion budget.
///
/// Returns an empty path when the target is unreachable.
pub fn find_path(
    grid: &NavGrid,
    start: CellCoord,
    target: CellCoord,
) -> Result<Vec<CellCoord>, NavError> {
    let report = AStar::new(SearchConfig::unbounded()).search(grid, start, target)?;
    Ok(report.outcome.into_path())
}

#[derive(Clone, Copy, Debug)]
struct SearchNode {
    cell: CellCoord,
    g: u32,
    h: u32,
    parent: Option<usize>,
}

impl SearchNode {
    fn f(&self) -> u32 {
        self.g.saturating_add(self.h)
    }
}

/// Heap entry ordered so the smallest `(f, sequence)` pops first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    sequence: u64,
    node: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.f, other.sequence).cmp(&(self.f, self.sequence))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-invocation search state: node arena, open heap and closed set.
#[derive(Debug)]
struct Frontier {
    nodes: Vec<SearchNode>,
    discovered: HashMap<u64, usize>,
    closed: HashSet<u64>,
    open: BinaryHeap<OpenEntry>,
    next_sequence: u64,
}

impl Frontier {
    fn seeded(start: CellCoord, target: CellCoord) -> Self {
        let mut frontier = Self {
            nodes: Vec::new(),
            discovered: HashMap::new(),
            closed: HashSet::new(),
            open: BinaryHeap::new(),
            next_sequence: 0,
        };
        frontier.discover(start, 0, target, None);
        frontier
    }

    fn pop(&mut self) -> Option<usize> {
        while let Some(entry) = self.open.pop() {
            let cell = self.nodes[entry.node].cell;
            // Superseded entries linger after an improvement; their cell is closed by then.
            if self.is_closed(cell) {
                continue;
            }
            return Some(entry.node);
        }
        None
    }

    fn close(&mut self, cell: CellCoord) {
        let _ = self.closed.insert(pack(cell));
    }

    fn is_closed(&self, cell: CellCoord) -> bool {
        self.closed.contains(&pack(cell))
    }

    fn relax(&mut self, cell: CellCoord, g: u32, target: CellCoord, parent: usize) {
        let Some(&index) = self.discovered.get(&pack(cell)) else {
            self.discover(cell, g, target, Some(parent));
            return;
        };

        let node = &mut self.nodes[index];
        if node.g <= g {
            return;
        }

        node.g = g;
        node.h = cell.manhattan_distance(target);
        node.parent = Some(parent);
        self.enqueue(index);
    }

    fn discover(&mut self, cell: CellCoord, g: u32, target: CellCoord, parent: Option<usize>) {
        let index = self.nodes.len();
        self.nodes.push(SearchNode {
            cell,
            g,
            h: cell.manhattan_distance(target),
            parent,
        });
        let _ = self.discovered.insert(pack(cell), index);
        self.enqueue(index);
    }

    fn enqueue(&mut self, index: usize) {
        self.open.push(OpenEntry {
            f: self.nodes[index].f(),
            sequence: self.next_sequence,
            node: index,
        });
        self.next_sequence += 1;
    }

    fn reconstruct(&self, end: usize) -> Vec<CellCoord> {
        let mut path = Vec::new();
        let mut cursor = Some(end);
        while let Some(index) = cursor {
            let node = &self.nodes[index];
            path.push(node.cell);
            cursor = node.parent;
        }
        path.reverse();
        path
    }
}

fn pack(cell: CellCoord) -> u64 {
    (u64::from(cell.row()) << 32) | u64::from(cell.column())
}
