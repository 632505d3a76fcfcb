// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0
mod minimal_tracer;

use std::{env, error::Error, process::exit};

use chrono::{DateTime, NaiveDateTime};
use minimal_tracer::MinimalTracer;
use tracing::trace;
use tzkit_tz::{Instant, LocalInstant, Registry, Zone};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_TRANSITION_COUNT: usize = 5;

fn main() {
    if let Err(error) = MinimalTracer::register() {
        eprintln!("{error}");
    }
    trace!("Started tzkit");

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(error) = start_cli(&args) {
        eprintln!("{error}");
        exit(1);
    }
}

fn print_version() {
    println!("tzkit {VERSION}");
}

fn usage() {
    print_version();
    println!(
        r#"

Usage:
    tzkit ids
    tzkit offset <zone> <instant>
    tzkit local <zone> <instant>
    tzkit utc <zone> <local-date-time> [--strict]
    tzkit transitions <zone> <instant> [count]
    tzkit -v | --version
    tzkit -h | --help

Instants are RFC 3339 date-times or milliseconds since the epoch.
Local date-times are written YYYY-MM-DDTHH:MM[:SS[.fff]].

Options:
    -v, --version     Print version information
    -h, --help        Print this help message
    --strict          Report local times inside a daylight savings gap as errors
"#
    );
}

fn start_cli(args: &[String]) -> Result<(), Box<dyn Error>> {
    let registry = Registry::global();
    let (command, rest) = match args.split_first() {
        Some((command, rest)) => (command.as_str(), rest),
        None => {
            usage();
            return Ok(());
        },
    };

    match command {
        "-v" | "--version" => print_version(),
        "-h" | "--help" => usage(),
        "ids" => {
            for id in registry.available_ids() {
                println!("{id}");
            }
        },
        "offset" => {
            let [zone, instant] = positional(command, rest)?;
            let zone = registry.resolve(zone)?;
            let instant = parse_instant(instant)?;
            println!("offset: {}", zone.offset(instant));
            println!("standard: {}", zone.standard_offset(instant));
            println!("dst: {}", !zone.is_standard_offset(instant));
            println!("name: {}", registry.short_name(&zone, instant, ""));
        },
        "local" => {
            let [zone, instant] = positional(command, rest)?;
            let zone = registry.resolve(zone)?;
            let local = zone.convert_utc_to_local(parse_instant(instant)?)?;
            println!("{local}");
        },
        "utc" => {
            let strict = rest.iter().any(|arg| arg == "--strict");
            let rest: Vec<String> = rest.iter().filter(|arg| *arg != "--strict").cloned().collect();
            let [zone, local] = positional(command, &rest)?;
            let zone = registry.resolve(zone)?;
            let instant = zone.convert_local_to_utc(parse_local(local)?, strict)?;
            println!("{instant}");
        },
        "transitions" => {
            let (required, count) = rest.split_at(rest.len().min(2));
            let [zone, instant] = positional(command, required)?;
            let count = match count {
                [] => DEFAULT_TRANSITION_COUNT,
                [count] => count.parse()?,
                _ => return Err(format!("Too many arguments for {command}").into()),
            };
            let zone = registry.resolve(zone)?;
            for line in transitions(registry, &zone, parse_instant(instant)?, count) {
                println!("{line}");
            }
        },
        _ => {
            return Err(format!("Unknown command: {command}, see tzkit --help").into());
        },
    }
    Ok(())
}

fn positional<'a>(command: &str, args: &'a [String]) -> Result<[&'a str; 2], String> {
    match args {
        [first, second] => Ok([first.as_str(), second.as_str()]),
        _ => Err(format!("{command} expects <zone> and one date-time argument")),
    }
}

fn transitions(registry: &Registry, zone: &Zone, from: Instant, count: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(count);
    let mut at = from;
    for _ in 0..count {
        let next = zone.next_transition(at);
        if next == at {
            break;
        }
        lines.push(format!(
            "{next} {} {}",
            zone.offset(next),
            registry.short_name(zone, next, "")
        ));
        at = next;
    }
    lines
}

fn parse_instant(text: &str) -> Result<Instant, String> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
        return Ok(Instant::from_millis(date_time.timestamp_millis()));
    }
    text.parse::<i64>()
        .map(Instant::from_millis)
        .map_err(|_| format!("Invalid instant: {text}"))
}

fn parse_local(text: &str) -> Result<LocalInstant, String> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|local| LocalInstant::from_naive(&local))
        .ok_or_else(|| format!("Invalid local date-time: {text}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instant() {
        assert_eq!(
            parse_instant("2018-03-25T01:00:00Z").unwrap(),
            Instant::from_millis(1_521_939_600_000)
        );
        assert_eq!(
            parse_instant("2018-03-25T03:00:00+02:00").unwrap(),
            Instant::from_millis(1_521_939_600_000)
        );
        assert_eq!(parse_instant("-1000").unwrap(), Instant::from_millis(-1000));
        assert!(parse_instant("yesterday").is_err());
    }

    #[test]
    fn test_parse_local() {
        let expected = LocalInstant::from_millis(1_521_945_000_000);
        assert_eq!(parse_local("2018-03-25T02:30").unwrap(), expected);
        assert_eq!(parse_local("2018-03-25T02:30:00").unwrap(), expected);
        assert_eq!(
            parse_local("2018-03-25T02:30:00.250").unwrap(),
            LocalInstant::from_millis(1_521_945_000_250)
        );
        assert!(parse_local("2018-03-25").is_err());
    }

    #[test]
    fn test_positional() {
        let args = vec!["Europe/Paris".to_string(), "0".to_string()];
        assert_eq!(positional("local", &args).unwrap(), ["Europe/Paris", "0"]);
        assert!(positional("local", &args[..1]).is_err());
    }

    #[test]
    fn test_transitions() {
        let registry = Registry::new(Default::default());
        let paris = registry.resolve("Europe/Paris").unwrap();
        // 2018-01-01T00:00:00Z
        let lines = transitions(&registry, &paris, Instant::from_millis(1_514_764_800_000), 2);
        assert_eq!(
            lines,
            vec![
                "2018-03-25T01:00:00.000Z +02:00 CEST".to_string(),
                "2018-10-28T01:00:00.000Z +01:00 CET".to_string(),
            ]
        );

        let utc = registry.resolve("UTC").unwrap();
        assert!(transitions(&registry, &utc, Instant::EPOCH, 3).is_empty());
    }
}
