//! Partition tree builder binary: builds a world tree from a marker file.
//!
//! Usage: cargo run --release --bin build_tree -- --markers <FILE> [OPTIONS]
//!
//! Options:
//!   --markers <FILE>   JSON array of [x, y, z] marker positions (required)
//!   --grid <SIZE>      Grid cell size (default: 20, or the config value)
//!   --config <FILE>    JSON tree config; --grid overrides its grid size
//!   --out <FILE>       Output path (default: tree.json, or tree.wtr with --binary)
//!   --binary           Write an LZ4-compressed archive instead of JSON
//!   --print            Dump split nodes to stdout after building

use std::path::PathBuf;
use std::process::ExitCode;

use worldtree::core::Result;
use worldtree::export::{disk_io, flatten};
use worldtree::markers::load_markers;
use worldtree::partition::{PartitionBuilder, TreeConfig};

fn main() -> ExitCode {
    worldtree::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let Some(markers_path) = parse_str_arg(&args, "--markers").map(PathBuf::from) else {
        eprintln!("usage: build_tree --markers <FILE> [--grid <SIZE>] [--config <FILE>] [--out <FILE>] [--binary] [--print]");
        return ExitCode::FAILURE;
    };

    let grid = match parse_f64_arg(&args, "--grid") {
        Ok(grid) => grid,
        Err(msg) => {
            eprintln!("error: {}", msg);
            return ExitCode::FAILURE;
        }
    };

    match run(&args, markers_path, grid) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String], markers_path: PathBuf, grid: Option<f64>) -> Result<()> {
    let binary = has_flag(args, "--binary");
    let mut config = match parse_str_arg(args, "--config") {
        Some(path) => TreeConfig::load_sync(&PathBuf::from(path))?,
        None => TreeConfig::default(),
    };
    if let Some(grid) = grid {
        config.grid_size = grid;
    }
    let out_path = parse_str_arg(args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            if binary {
                PathBuf::from(format!("tree.{}", disk_io::RECORDS_FILE_EXTENSION))
            } else {
                PathBuf::from("tree.json")
            }
        });

    let markers = load_markers(&markers_path)?;
    log::info!("Loaded {} markers from {}", markers.len(), markers_path.display());

    let tree = PartitionBuilder::new(&config)?.build(&markers)?;
    if has_flag(args, "--print") {
        print!("{}", tree);
    }

    let records = flatten(&tree);
    if binary {
        disk_io::save_compressed(&records, &out_path)?;
    } else {
        disk_io::save_json(&records, &out_path)?;
    }

    log::info!(
        "Wrote {} node records ({} .. {}) to {}",
        records.node_count(),
        tree.world_min(),
        tree.world_max(),
        out_path.display()
    );
    Ok(())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// `Ok(None)` when the flag is absent; a missing or unparsable value is an error.
fn parse_f64_arg(args: &[String], flag: &str) -> std::result::Result<Option<f64>, String> {
    let Some(i) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    let value = args.get(i + 1).ok_or_else(|| format!("missing value for {}", flag))?;
    value
        .parse()
        .map(Some)
        .map_err(|_| format!("invalid {} value '{}'", flag, value))
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_grid_arg() {
        assert_eq!(parse_f64_arg(&args(&["build_tree", "--grid", "2.5"]), "--grid"), Ok(Some(2.5)));
        assert_eq!(parse_f64_arg(&args(&["build_tree", "--markers", "m.json"]), "--grid"), Ok(None));
    }

    #[test]
    fn test_bad_grid_arg_is_reported() {
        let err = parse_f64_arg(&args(&["build_tree", "--grid", "abc"]), "--grid").unwrap_err();
        assert!(err.contains("abc"), "{}", err);
        assert!(parse_f64_arg(&args(&["build_tree", "--grid"]), "--grid").is_err());
    }
}
