//! derm CLI tool
//!
//! Inspects DERM grid indices, rhombi and lookup tables. Results are
//! printed as JSON on stdout.
//!
//! Usage:
//!   derm move <index> <direction>
//!   derm neighbours <index>
//!   derm children <index>
//!   derm position <index>
//!   derm rhombus <root-number>
//!   derm lut <root-number> <depth>

use derm_rhombus::{LutCache, Rhombus};
use derm_topology::{
    children, global_cell_position, move_index, neighbours, GlobalIndex, HexDirection,
};
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Topology(#[from] derm_topology::Error),

    #[error(transparent)]
    Rhombus(#[from] derm_rhombus::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct MoveReport {
    from: GlobalIndex,
    direction: HexDirection,
    to: Option<GlobalIndex>,
    rotation: i32,
}

#[derive(Debug, Serialize)]
struct Neighbour {
    direction: HexDirection,
    index: GlobalIndex,
}

#[derive(Debug, Serialize)]
struct PositionReport {
    index: GlobalIndex,
    resolution: i32,
    position: u64,
}

#[derive(Debug, Serialize)]
struct LutReport {
    key: String,
    depth: i32,
    max_uv: i32,
    slots: usize,
    filled: usize,
    cache_dir: Option<String>,
}

fn print_usage() {
    eprintln!("derm - Inspect DERM grid cells, rhombi and lookup tables");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  derm move <index> <direction>    Step to a neighbour (direction 1-6)");
    eprintln!("  derm neighbours <index>          List every neighbour");
    eprintln!("  derm children <index>            List child cells");
    eprintln!("  derm position <index>            Depth-first position of a cell");
    eprintln!("  derm rhombus <root-number>       Corners of a root rhombus (0-89)");
    eprintln!("  derm lut <root-number> <depth>   Build or load a lookup table");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DERM_LUT_DIR          Directory for .rlut files (default: memory only)");
    eprintln!("  DERM_LUT_MAX_ENTRIES  Tables kept in memory (default: 1000)");
    eprintln!("  RUST_LOG              Log filter (default: info for the derm crates)");
}

fn arg<'a>(args: &'a [String], n: usize, what: &str) -> Result<&'a str, CliError> {
    args.get(n)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("{} requires {what}", args[1])))
}

fn parse_index(s: &str) -> Result<GlobalIndex, CliError> {
    Ok(s.parse()?)
}

fn parse_number<T: std::str::FromStr>(s: &str, what: &str) -> Result<T, CliError> {
    s.parse()
        .map_err(|_| CliError::Usage(format!("invalid {what} '{s}'")))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(args: &[String]) -> Result<(), CliError> {
    match args[1].as_str() {
        "move" => {
            let from = parse_index(arg(args, 2, "an index")?)?;
            if from.is_null() {
                return Err(derm_topology::Error::NullIndex.into());
            }
            let direction: i32 = parse_number(arg(args, 3, "a direction")?, "direction")?;
            let direction = HexDirection::try_from(direction)?;
            let mut to = from.clone();
            let mut rotation = 0;
            let moved = move_index(&mut to, direction, &mut rotation);
            print_json(&MoveReport {
                from,
                direction,
                to: moved.then_some(to),
                rotation,
            })
        }
        "neighbours" => {
            let index = parse_index(arg(args, 2, "an index")?)?;
            let list: Vec<Neighbour> = neighbours(&index)
                .into_iter()
                .map(|(direction, index)| Neighbour { direction, index })
                .collect();
            print_json(&list)
        }
        "children" => {
            let index = parse_index(arg(args, 2, "an index")?)?;
            print_json(&children(&index))
        }
        "position" => {
            let index = parse_index(arg(args, 2, "an index")?)?;
            let position = global_cell_position(&index)?;
            print_json(&PositionReport {
                resolution: index.resolution(),
                index,
                position,
            })
        }
        "rhombus" => {
            let number = parse_number(arg(args, 2, "a root number")?, "root number")?;
            print_json(&Rhombus::from_root_number(number)?)
        }
        "lut" => {
            let number = parse_number(arg(args, 2, "a root number")?, "root number")?;
            let depth = parse_number(arg(args, 3, "a depth")?, "depth")?;
            let rhombus = Rhombus::from_root_number(number)?;
            let cache = LutCache::from_env();
            let lut = cache.get(&rhombus, depth)?;
            tracing::info!(key = lut.key(), "lookup table ready");
            print_json(&LutReport {
                key: lut.key().to_string(),
                depth: lut.depth(),
                max_uv: lut.max_uv(),
                slots: lut.len(),
                filled: lut.filled(),
                cache_dir: cache
                    .config()
                    .cache_dir
                    .as_ref()
                    .map(|dir| dir.display().to_string()),
            })
        }
        other => Err(CliError::Usage(format!("unknown command '{other}'"))),
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "derm_cli=info,derm_rhombus=info,derm_topology=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        if matches!(e, CliError::Usage(_)) {
            eprintln!();
            print_usage();
        }
        std::process::exit(1);
    }
}
