#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plans waypoint routes over grid layouts.

mod ascii;
mod config;
mod layout_transfer;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use glam::Vec2;
use rampart_core::CellCoord;
use rampart_grid::{GridFrame, NavGrid};
use rampart_system_planner::{PlanOutcome, ReductionMode};
use tracing_subscriber::EnvFilter;

use crate::{
    ascii::RouteOverlay,
    config::{PlannerOverrides, PlannerSettings},
    layout_transfer::GridLayoutSnapshot,
};

/// Plans agent routes across tower defence grid layouts.
#[derive(Debug, Parser)]
#[command(name = "rampart", version)]
struct Cli {
    /// Raise log verbosity (`-v` for debug, `-vv` for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a route between two cells and print its waypoints.
    Plan(PlanArgs),
    /// Convert a layout into a single-line transfer string.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Layout file holding an ASCII map or a transfer string.
    #[arg(long)]
    layout: PathBuf,

    /// Start cell as `column,row`.
    #[arg(long, value_parser = parse_cell)]
    from: CellCoord,

    /// Target cell as `column,row`.
    #[arg(long, value_parser = parse_cell)]
    to: CellCoord,

    /// Reduction passes applied to the found path.
    #[arg(long)]
    reduce: Option<ReductionMode>,

    /// Stop the search after this many node expansions.
    #[arg(long)]
    max_expansions: Option<usize>,

    /// TOML file with `[search]` and `[reduction]` settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of a cell in world units; prints waypoint world positions.
    #[arg(long)]
    cell_length: Option<f32>,

    /// Draw the map with the route overlaid.
    #[arg(long)]
    render: bool,
}

#[derive(Debug, Args)]
struct ExportArgs {
    /// Layout file holding an ASCII map or a transfer string.
    #[arg(long)]
    layout: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Plan(args) => plan(&args),
        Command::Export(args) => export(&args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn plan(args: &PlanArgs) -> Result<()> {
    let grid = load_layout(&args.layout)?;
    let settings = PlannerSettings::load(args.config.as_deref())?.with_overrides(PlannerOverrides {
        max_expansions: args.max_expansions,
        reduction: args.reduce,
    });
    let planner = settings.planner();

    let outcome = planner
        .plan(&grid, args.from, args.to)
        .context("could not plan route")?;

    match &outcome {
        PlanOutcome::Routed(route) => {
            println!("waypoints: {}", format_cells(&route.waypoints));
            if let Some(cell_length) = args.cell_length {
                let frame = GridFrame::new(Vec2::ZERO, cell_length);
                println!("world: {}", format_points(&route.world_waypoints(&frame)));
            }
            println!("path cells: {}", route.path.len());
            println!("nodes expanded: {}", route.nodes_expanded);
        }
        PlanOutcome::Unreachable { nodes_expanded } => {
            println!("unreachable");
            println!("nodes expanded: {nodes_expanded}");
        }
        PlanOutcome::BudgetExhausted { nodes_expanded } => {
            println!("budget exhausted");
            println!("nodes expanded: {nodes_expanded}");
        }
    }

    if args.render {
        let route = outcome.route();
        let overlay = RouteOverlay {
            path: route.map(|route| route.path.as_slice()).unwrap_or_default(),
            waypoints: route
                .map(|route| route.waypoints.as_slice())
                .unwrap_or_default(),
            start: Some(args.from),
            target: Some(args.to),
        };
        print!("{}", ascii::render(&grid, &overlay));
    }

    Ok(())
}

fn export(args: &ExportArgs) -> Result<()> {
    let grid = load_layout(&args.layout)?;
    let encoded = GridLayoutSnapshot::from_grid(&grid)
        .encode()
        .context("could not encode layout")?;
    println!("{encoded}");
    Ok(())
}

fn load_layout(path: &Path) -> Result<NavGrid> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read layout {}", path.display()))?;

    let grid = if GridLayoutSnapshot::is_encoded(&text) {
        GridLayoutSnapshot::decode(&text)
            .and_then(|snapshot| snapshot.to_grid())
            .with_context(|| format!("invalid layout string in {}", path.display()))?
    } else {
        ascii::parse(&text).with_context(|| format!("invalid layout map in {}", path.display()))?
    };

    tracing::debug!(
        width = grid.width(),
        height = grid.height(),
        obstructed = grid.obstructed_cells().count(),
        "layout loaded"
    );
    Ok(grid)
}

fn parse_cell(value: &str) -> Result<CellCoord, String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `column,row`, found '{value}'"))?;
    let column = column
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid column '{column}': {error}"))?;
    let row = row
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid row '{row}': {error}"))?;
    Ok(CellCoord::new(column, row))
}

fn format_cells(cells: &[CellCoord]) -> String {
    cells
        .iter()
        .map(|cell| format!("({},{})", cell.column(), cell.row()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_points(points: &[Vec2]) -> String {
    points
        .iter()
        .map(|point| format!("({},{})", point.x, point.y))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_cells_with_whitespace() {
        assert_eq!(parse_cell("3, 4"), Ok(CellCoord::new(3, 4)));
        assert!(parse_cell("3;4").is_err());
        assert!(parse_cell("-1,0").is_err());
    }

    #[test]
    fn plan_flags_reach_the_arguments() {
        let cli = Cli::try_parse_from([
            "rampart",
            "-v",
            "plan",
            "--layout",
            "map.txt",
            "--from",
            "0,2",
            "--to",
            "4,2",
            "--reduce",
            "turns",
            "--max-expansions",
            "50",
        ])
        .expect("valid arguments");

        assert_eq!(cli.verbose, 1);
        let Command::Plan(args) = cli.command else {
            panic!("expected plan subcommand");
        };
        assert_eq!(args.from, CellCoord::new(0, 2));
        assert_eq!(args.to, CellCoord::new(4, 2));
        assert_eq!(args.reduce, Some(ReductionMode::Turns));
        assert_eq!(args.max_expansions, Some(50));
        assert!(!args.render);
    }

    #[test]
    fn unknown_reduction_is_rejected() {
        let result = Cli::try_parse_from([
            "rampart", "plan", "--layout", "m", "--from", "0,0", "--to", "1,1", "--reduce",
            "smooth",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn formats_cells_and_points() {
        assert_eq!(
            format_cells(&[CellCoord::new(0, 2), CellCoord::new(4, 1)]),
            "(0,2) (4,1)"
        );
        assert_eq!(format_points(&[Vec2::new(15.0, 45.0)]), "(15,45)");
    }
}
