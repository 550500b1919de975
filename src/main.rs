use clap::{App, Arg, ArgMatches};
use log::info;
use num::Complex;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process;
use std::str::FromStr;

use mandelbrot::blocks::STREAMS;
use mandelbrot::config::{Config, LIMIT, MAX_COLOR};
use mandelbrot::pgm;
use mandelbrot::render::{render_timed, BLOCKS};
use mandelbrot::{Error, Result, Strategy};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(
    s: &str,
    separator: char,
    err: &str,
) -> std::result::Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> std::result::Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const ITERATIONS: &str = "iterations";
const STRATEGY: &str = "strategy";
const BLOCKS_ARG: &str = "blocks";
const STREAMS_ARG: &str = "streams";
const THREADS: &str = "threads";
const COMMENT: &str = "comment";

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandelbrot")
        .version("0.1.0")
        .about("Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("image.pgm")
                .help("Output file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.0,-1.5")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the complex window"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1.0,1.5")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the complex window"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("255")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Iteration cap per pixel"),
        )
        .arg(
            Arg::with_name(STRATEGY)
                .long(STRATEGY)
                .takes_value(true)
                .possible_values(&["flat", "streamed"])
                .default_value("streamed")
                .help("Flat worker pool, or row-blocks on execution streams"),
        )
        .arg(
            Arg::with_name(BLOCKS_ARG)
                .long(BLOCKS_ARG)
                .short("b")
                .takes_value(true)
                .default_value("8")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        65_535,
                        "Could not parse block count",
                        "Block count must be between 1 and 65535",
                    )
                })
                .help("Row-blocks for the streamed strategy; must divide the height"),
        )
        .arg(
            Arg::with_name(STREAMS_ARG)
                .long(STREAMS_ARG)
                .takes_value(true)
                .default_value("3")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        64,
                        "Could not parse stream count",
                        "Stream count must be between 1 and 64",
                    )
                })
                .help("Execution streams for the streamed strategy"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1024,
                        "Could not parse thread count",
                        "Thread count must be between 1 and 1024",
                    )
                })
                .help("Worker threads (default: one per CPU)"),
        )
        .arg(
            Arg::with_name(COMMENT)
                .long(COMMENT)
                .takes_value(true)
                .default_value(pgm::COMMENT)
                .help("Comment line for the PGM header"),
        )
        .get_matches()
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str, default: T) -> Result<T> {
    match matches.value_of(name) {
        None => Ok(default),
        Some(s) => T::from_str(s).map_err(|_| Error::Argument(format!("bad {}: {}", name, s))),
    }
}

fn complex(matches: &ArgMatches, name: &str) -> Result<Complex<f64>> {
    let s = matches.value_of(name).unwrap_or_default();
    parse_complex(s).ok_or_else(|| Error::Argument(format!("bad {}: {}", name, s)))
}

fn configure(matches: &ArgMatches) -> Result<(Config, Strategy)> {
    let size = matches.value_of(SIZE).unwrap_or_default();
    let (width, height) = parse_pair::<usize>(size, 'x')
        .ok_or_else(|| Error::Argument(format!("bad size: {}", size)))?;
    let config = Config::new(
        width,
        height,
        MAX_COLOR,
        value(matches, ITERATIONS, LIMIT)?,
        complex(matches, LEFTLOWER)?,
        complex(matches, RIGHTUPPER)?,
    )?;

    let threads = value(matches, THREADS, num_cpus::get())?;
    let strategy = match matches.value_of(STRATEGY) {
        Some("flat") => Strategy::Flat { threads },
        _ => Strategy::Streamed {
            blocks: value(matches, BLOCKS_ARG, BLOCKS)?,
            streams: value(matches, STREAMS_ARG, STREAMS)?,
            threads,
        },
    };
    Ok((config, strategy))
}

fn render_to<W: Write>(
    out: &mut W,
    config: &Config,
    strategy: &Strategy,
    comment: &str,
) -> Result<()> {
    let (image, elapsed) = render_timed(config, strategy)?;
    println!("Time: {:.6} seconds.", elapsed.as_secs_f64());
    pgm::write_pgm(out, &image, config.max_color(), comment)
}

fn run(matches: &ArgMatches, output: &Path) -> Result<()> {
    let (config, strategy) = configure(matches)?;
    let comment = matches.value_of(COMMENT).unwrap_or(pgm::COMMENT);
    pgm::check_comment(comment)?;

    let mut out = pgm::create(output)?;
    let written = render_to(&mut out, &config, &strategy, comment);
    match written {
        Ok(()) => info!("wrote {}", output.display()),
        // Never leave a half-written image behind.
        Err(_) => {
            drop(out);
            let _ = fs::remove_file(output);
        }
    }
    written
}

fn main() {
    env_logger::init();
    let matches = args();
    let output = Path::new(matches.value_of(OUTPUT).unwrap_or("image.pgm"));

    if let Err(e) = run(&matches, output) {
        eprintln!("mandelbrot: {}", e);
        process::exit(1);
    }
}
