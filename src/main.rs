#![warn(clippy::unwrap_used)]
//! `mandelbrot` renders a rectangle of the complex plane into a binary pixel map.

use std::env;
use std::path::PathBuf;
use std::process::exit;

use clap::{Arg, ArgMatches, Command};
use log::info;

use ppm_mandelbrot::colorings::ColorInfo;
use ppm_mandelbrot::errors::*;
use ppm_mandelbrot::presets::usage;
use ppm_mandelbrot::{MandelReq, DEFAULT_OUTPUT};

const PROGRAM: &str = "./mandelbrot";

/// Call `run()` and print any error that results, or exit silently if OK
fn main() {
    match run() {
        Err(Error(ErrorKind::Usage, _)) => {
            print!("{}", usage(PROGRAM));
            exit(1);
        }
        Err(ref e) => {
            eprintln!("{}", e);
            for e in e.iter().skip(1) {
                eprintln!("caused by: {}", e);
            }
            exit(1);
        }
        Ok(_) => exit(0),
    }
}

fn run() -> Result<()> {
    let (matches, positionals) = get_matches();

    init_logging(matches.get_one::<String>("verbosity").map(|s| s.as_str()));

    info!(
        "'{}' version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let coloring = matches
        .get_one::<String>("coloring")
        .map(|s| s.as_str())
        .unwrap_or("classic");
    let output = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let threads = matches.get_one::<usize>("threads").copied().unwrap_or(1);

    let request = MandelReq::parse(&positionals, coloring)?;
    let grid = request.render(threads);
    grid.save(&output)?;

    info!("'{}' has exited", env!("CARGO_PKG_NAME"));
    Ok(())
}

// An explicit verbosity level overrides RUST_LOG
fn init_logging(verbosity: Option<&str>) {
    match verbosity {
        Some(level) => env_logger::Builder::new().parse_filters(level).init(),
        None => env_logger::init(),
    }
}

// Parse the options using clap. The positionals are split off beforehand and
// returned as they are, so a bound such as `-.5` is never taken for a flag and
// a short command line can be answered with the usage text.
fn get_matches() -> (ArgMatches, Vec<String>) {
    let app = command();
    let (options, positionals) = split_args(&app, env::args().collect());
    match app.try_get_matches_from(options) {
        Ok(matches) => (matches, positionals),
        Err(e) => {
            let _ = e.print();
            exit(if e.use_stderr() { 1 } else { 0 });
        }
    }
}

fn command() -> Command {
    let app = Command::new(env!("CARGO_BIN_NAME")).version(env!("CARGO_PKG_VERSION"));
    let colorings = ColorInfo::new().names().join(", ");

    app.arg(
        Arg::new("output")
            .short('o')
            .long("output")
            .num_args(1)
            .value_parser(clap::value_parser!(PathBuf))
            .value_name("FILE")
            .help("File to write the image to (default: mandelbrot.ppm)"),
    )
    .arg(
        Arg::new("coloring")
            .short('c')
            .long("coloring")
            .num_args(1)
            .value_name("COLORING")
            .help(format!(
                "Coloring to paint escape counts with ({}; default: classic)",
                colorings
            )),
    )
    .arg(
        Arg::new("threads")
            .short('t')
            .long("threads")
            .num_args(1)
            .value_parser(clap::value_parser!(usize))
            .value_name("THREADS")
            .help("Set number of threads to render rows with (default: 1)"),
    )
    .arg(
        Arg::new("verbosity")
            .short('v')
            .long("verbosity")
            .num_args(1)
            .value_name("VERBOSITY_LEVEL")
            .help("Set verbosity level for output (trace, debug, info, warn, error)"),
    )
    .arg(
        Arg::new("bounds")
            .num_args(0..)
            .value_name("REAL_MIN REAL_MAX IMAG_MIN IMAG_MAX WIDTH")
            .help("Rectangle of the complex plane to render and the image width in pixels"),
    )
}

// Separate the tokens that name one of the command's options (with their
// values) from the positionals. The program name stays with the options.
fn split_args(app: &Command, args: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut args = args.into_iter();
    let mut options: Vec<String> = args.next().into_iter().collect();
    let mut positionals = Vec::new();
    while let Some(arg) = args.next() {
        if arg == "--" {
            positionals.extend(args.by_ref());
            break;
        }
        match match_option(app, &arg) {
            Some((takes_value, inline)) => {
                options.push(arg);
                if takes_value && !inline {
                    options.extend(args.next());
                }
            }
            None => positionals.push(arg),
        }
    }
    (options, positionals)
}

// When `token` names an option, return whether it takes a value and whether
// that value is already part of the token (`--output=x`, `-ox`)
fn match_option(app: &Command, token: &str) -> Option<(bool, bool)> {
    if ["-h", "--help", "-V", "--version"].contains(&token) {
        return Some((false, false));
    }
    let (arg, inline) = if let Some(long) = token.strip_prefix("--") {
        let name = long.split('=').next().unwrap_or(long);
        let arg = app.get_arguments().find(|a| a.get_long() == Some(name))?;
        (arg, long.contains('='))
    } else {
        let mut chars = token.strip_prefix('-')?.chars();
        let short = chars.next()?;
        let arg = app.get_arguments().find(|a| a.get_short() == Some(short))?;
        (arg, chars.next().is_some())
    };
    let takes_value = arg.get_num_args().map(|n| n.takes_values()).unwrap_or(false);
    Some((takes_value, inline))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(args: &[&str]) -> (Vec<String>, Vec<String>) {
        split_args(&command(), args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn hyphenated_bounds_are_positional() {
        let (options, positionals) = split(&["mandelbrot", "-.5", "0.5", "-.5", "0.5", "20"]);
        assert_eq!(options, vec!["mandelbrot"]);
        assert_eq!(positionals, vec!["-.5", "0.5", "-.5", "0.5", "20"]);
    }

    #[test]
    fn options_anywhere_take_their_values() {
        let (options, positionals) = split(&[
            "mandelbrot", "-t", "4", "-2.5", "1.5", "--output", "-x.ppm", "-2", "2", "-cgray",
            "--verbosity=debug", "100",
        ]);
        assert_eq!(
            options,
            vec!["mandelbrot", "-t", "4", "--output", "-x.ppm", "-cgray", "--verbosity=debug"]
        );
        assert_eq!(positionals, vec!["-2.5", "1.5", "-2", "2", "100"]);
    }

    #[test]
    fn double_dash_ends_options() {
        let (options, positionals) = split(&["mandelbrot", "--", "-t", "1", "2", "3", "4"]);
        assert_eq!(options, vec!["mandelbrot"]);
        assert_eq!(positionals, vec!["-t", "1", "2", "3", "4"]);
    }

    #[test]
    fn split_options_parse() {
        let (options, _) = split(&["mandelbrot", "-.5", "-o", "out.ppm", "--threads=3"]);
        let matches = command().try_get_matches_from(options).unwrap();
        assert_eq!(matches.get_one::<usize>("threads"), Some(&3));
        assert_eq!(
            matches.get_one::<PathBuf>("output"),
            Some(&PathBuf::from("out.ppm"))
        );
    }

    #[test]
    fn coloring_help_lists_every_coloring() {
        let app = command();
        let help = app
            .get_arguments()
            .find(|a| a.get_id() == "coloring")
            .and_then(|a| a.get_help())
            .map(|h| h.to_string())
            .unwrap_or_default();
        for name in ColorInfo::new().names() {
            assert!(help.contains(name), "{} missing from '{}'", name, help);
        }
    }
}
