//! CLI entry point for `tileflow_core`.
//!
//! # Responsibility
//! - Print core version when run without a command.
//! - `validate <model.json>`: print integrity issues as JSON lines.
//! - `route <x1,y1> <x2,y2> [--grid <w>x<h>]`: print a grid route.
//!
//! # Invariants
//! - Exit code 0 on success, 1 when validation finds issues, 2 on usage or
//!   input errors.
//! - Output is deterministic for the same input.

use log::info;
use std::process::ExitCode;
use tileflow_core::{find_path, init_logging, model_from_json, validate_model, Coords, Size};

const USAGE: &str = "usage: tileflow_cli [--log-dir <abs-dir>] [--log-level <level>] \
[validate <model.json> | route <x1,y1> <x2,y2> [--grid <w>x<h>]]";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(args) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("{USAGE}");
            ExitCode::from(2)
        }
    }
}

fn run(args: Vec<String>) -> Result<ExitCode, String> {
    let mut log_dir = None;
    let mut log_level = tileflow_core::default_log_level().to_string();
    let mut grid = None;
    let mut positional = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--log-dir" => log_dir = Some(next_value(&mut iter, "--log-dir")?),
            "--log-level" => log_level = next_value(&mut iter, "--log-level")?,
            "--grid" => grid = Some(parse_grid(&next_value(&mut iter, "--grid")?)?),
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(ExitCode::SUCCESS);
            }
            _ => positional.push(arg),
        }
    }

    if let Some(dir) = log_dir {
        init_logging(&log_level, &dir)?;
    }

    match positional.first().map(String::as_str) {
        None => {
            println!("tileflow_core version={}", tileflow_core::core_version());
            Ok(ExitCode::SUCCESS)
        }
        Some("validate") => match positional.get(1) {
            Some(path) if positional.len() == 2 => validate(path),
            _ => Err("validate expects exactly one model path".to_string()),
        },
        Some("route") => match (positional.get(1), positional.get(2)) {
            (Some(from), Some(to)) if positional.len() == 3 => {
                route(parse_coords(from)?, parse_coords(to)?, grid)
            }
            _ => Err("route expects two tiles like 1,2".to_string()),
        },
        Some(other) => Err(format!("unknown command `{other}`")),
    }
}

fn validate(path: &str) -> Result<ExitCode, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read `{path}`: {err}"))?;
    let model = model_from_json(&json).map_err(|err| format!("invalid model `{path}`: {err}"))?;

    let issues = validate_model(&model);
    for issue in &issues {
        let line = serde_json::to_string(issue).map_err(|err| err.to_string())?;
        println!("{line}");
    }
    info!(
        "event=cli_validate module=cli status=ok views={} issues={}",
        model.views.len(),
        issues.len()
    );

    if issues.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn route(from: Coords, to: Coords, grid: Option<Size>) -> Result<ExitCode, String> {
    let grid = grid.unwrap_or_else(|| {
        Size::new(
            from.x.max(to.x).max(0).saturating_add(1),
            from.y.max(to.y).max(0).saturating_add(1),
        )
    });
    let path = find_path(grid, from, to);
    let line = serde_json::to_string(&path).map_err(|err| err.to_string())?;
    println!("{line}");
    Ok(ExitCode::SUCCESS)
}

fn next_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    iter.next()
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_coords(value: &str) -> Result<Coords, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("tile must look like x,y, got `{value}`"))?;
    Ok(Coords::new(parse_int(x, value)?, parse_int(y, value)?))
}

fn parse_grid(value: &str) -> Result<Size, String> {
    let (width, height) = value
        .split_once('x')
        .ok_or_else(|| format!("grid must look like <w>x<h>, got `{value}`"))?;
    Ok(Size::new(parse_int(width, value)?, parse_int(height, value)?))
}

fn parse_int(part: &str, whole: &str) -> Result<i32, String> {
    part.trim()
        .parse()
        .map_err(|_| format!("not an integer in `{whole}`"))
}

#[cfg(test)]
mod tests {
    use super::{parse_coords, parse_grid, route};
    use tileflow_core::{Coords, Size};

    #[test]
    fn parses_tiles_and_grid() {
        assert_eq!(parse_coords("3,-4").unwrap(), Coords::new(3, -4));
        assert_eq!(parse_coords(" 1 , 2 ").unwrap(), Coords::new(1, 2));
        assert!(parse_coords("3;4").is_err());
        assert_eq!(parse_grid("10x6").unwrap(), Size::new(10, 6));
        assert!(parse_grid("10").is_err());
    }

    #[test]
    fn route_at_the_i32_edge_succeeds() {
        let edge = Coords::new(i32::MAX, i32::MAX);
        assert!(route(edge, Coords::new(i32::MAX, i32::MAX - 1), None).is_ok());
    }
}
