use std::path::Path;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::error::ErrorKind;
use clap::{Arg, ArgMatches, Command};
use mimalloc::MiMalloc;
use tracing::{debug, info};

use pointdiff::config::{DiffOptions, Radius};
use pointdiff::diff::spatial_diff;
use pointdiff::io::{load_and_project, write_geojson};
use pointdiff::progress::LogProgress;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod build_info;

const ARG_A: &str = "A";
const ARG_B: &str = "B";
const ARG_RADIUS_KM: &str = "RADIUS_KM";
const ARG_OUTPUT: &str = "OUTPUT";

fn build_cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(build_info::version())
        .long_version(build_info::long_version())
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .override_usage(
            "pointdiff <a.(geojson|fgb|csv)> <b.(geojson|fgb|csv)> <radius_km> <a_minus_b.geojson>",
        )
        .arg(
            Arg::new(ARG_A)
                .help("dataset to remove points from (csv, geojson or flatgeobuf)")
                .required(true),
        )
        .arg(
            Arg::new(ARG_B)
                .help("dataset whose points define the areas to remove (csv, geojson or flatgeobuf)")
                .required(true),
        )
        .arg(
            Arg::new(ARG_RADIUS_KM)
                .help("radius around the points of B in kilometers")
                .allow_negative_numbers(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_OUTPUT)
                .help("geojson file to write the remaining points of A to")
                .required(true),
        )
}

/// exit status for a command line the parser did not accept
fn rejected_exit_status(e: &clap::Error) -> u8 {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn main() -> ExitCode {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );
    let mut app = build_cli();

    let matches = match app.try_get_matches_from_mut(std::env::args_os()) {
        Ok(matches) => matches,
        Err(e) => {
            let status = rejected_exit_status(&e);
            if status == 0 {
                let _ = e.print();
            } else {
                debug!("invalid command line: {}", e);
                println!("{}", app.render_usage());
            }
            return ExitCode::from(status);
        }
    };

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn required_arg<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing argument {}", id))
}

fn run(matches: &ArgMatches) -> Result<()> {
    let path_a = Path::new(required_arg(matches, ARG_A)?);
    let path_b = Path::new(required_arg(matches, ARG_B)?);
    let output = Path::new(required_arg(matches, ARG_OUTPUT)?);
    let radius: Radius = required_arg(matches, ARG_RADIUS_KM)?.parse()?;
    let options = DiffOptions::new(radius);

    info!("Loading inputs...");
    let a = load_and_project(path_a)
        .with_context(|| format!("loading dataset A from {}", path_a.display()))?
        .with_label("A");
    let b = load_and_project(path_b)
        .with_context(|| format!("loading dataset B from {}", path_b.display()))?
        .with_label("B");

    let (a_minus_b, summary) = spatial_diff(a, &b, &options, &LogProgress)
        .with_context(|| format!("buffering dataset B from {} by {}", path_b.display(), radius))?;
    info!("{}", summary);

    info!("Writing GeoJSON output...");
    write_geojson(a_minus_b, output)
        .with_context(|| format!("writing output to {}", output.display()))?;

    info!("Done! {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;
    use tempfile::tempdir;

    use super::{build_cli, rejected_exit_status, run};

    fn parse(args: &[&str]) -> Result<clap::ArgMatches, clap::Error> {
        build_cli().try_get_matches_from_mut(std::iter::once("pointdiff").chain(args.iter().copied()))
    }

    #[test]
    fn four_arguments_are_accepted() {
        let matches = parse(&["a.csv", "b.geojson", "1.5", "out.geojson"]).unwrap();
        assert_eq!(
            matches.get_one::<String>(super::ARG_RADIUS_KM).unwrap(),
            "1.5"
        );
    }

    #[test]
    fn wrong_argument_count_exits_with_1() {
        for args in [
            &["a.csv", "b.geojson", "1.5"][..],
            &["a.csv", "b.geojson", "1.5", "out.geojson", "extra"][..],
            &[][..],
        ] {
            let e = parse(args).unwrap_err();
            assert_eq!(rejected_exit_status(&e), 1);
        }
    }

    #[test]
    fn help_and_version_exit_with_0() {
        let e = parse(&["--help"]).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::DisplayHelp);
        assert_eq!(rejected_exit_status(&e), 0);
        let e = parse(&["--version"]).unwrap_err();
        assert_eq!(rejected_exit_status(&e), 0);
    }

    #[test]
    fn invalid_radius_fails() {
        for radius in ["abc", "-1", "NaN"] {
            let matches = parse(&["a.csv", "b.csv", radius, "out.geojson"]).unwrap();
            let e = run(&matches).unwrap_err();
            assert!(format!("{e:#}").contains("radius"), "{e:#}");
        }
    }

    #[test]
    fn missing_input_names_the_stage() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        let out = dir.path().join("out.geojson");
        let matches = parse(&[
            missing.to_str().unwrap(),
            missing.to_str().unwrap(),
            "1",
            out.to_str().unwrap(),
        ])
        .unwrap();
        let message = format!("{:#}", run(&matches).unwrap_err());
        assert!(message.starts_with("loading dataset A from"), "{message}");
        assert!(!out.exists());
    }

    #[test]
    fn successful_run_writes_output() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        let out = dir.path().join("a_minus_b.geojson");
        std::fs::write(&a, "lat,lon\n0.0,0.0\n10.0,10.0\n").unwrap();
        std::fs::write(&b, "LAT,LON\n0.0,0.0\n").unwrap();

        let matches = parse(&[
            a.to_str().unwrap(),
            b.to_str().unwrap(),
            "1",
            out.to_str().unwrap(),
        ])
        .unwrap();
        run(&matches).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["features"].as_array().unwrap().len(), 1);
    }
}
