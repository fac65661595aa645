use std::fs;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use clap::Parser;
use indoc::indoc;

#[derive(Parser, Debug)]
#[command(
    name = "scroll-status",
    version = env!("CARGO_PKG_VERSION"),
    about = "Prints status lines for the scroll-wm bar",
    after_help = indoc! {"
        Each line holds the load average and the local time, coloured with
        `{#RRGGBB}` markers. Pipe it into the window manager:

            scroll-status | scroll-wm
    "}
)]
struct StatusCli {
    /// Seconds between lines.
    #[arg(short = 'i', long = "interval", value_name = "SECONDS", default_value_t = 10)]
    interval_seconds: u64,

    /// strftime-style pattern for the clock.
    #[arg(short = 'c', long = "clock", value_name = "FORMAT", default_value = "%a %d %b %H:%M")]
    clock_format: String,

    /// Colour of the load average, as RRGGBB.
    #[arg(long, value_name = "RRGGBB", default_value = "8fbcbb")]
    load_color: String,

    /// Colour of the clock, as RRGGBB.
    #[arg(long, value_name = "RRGGBB", default_value = "d8dee9")]
    clock_color: String,

    /// Print a single line and exit.
    #[arg(long)]
    once: bool,
}

struct StatusConfig {
    interval: Duration,
    clock_format: String,
    load_color: String,
    clock_color: String,
    once: bool,
}

impl TryFrom<&StatusCli> for StatusConfig {
    type Error = String;

    fn try_from(cli: &StatusCli) -> Result<Self, Self::Error> {
        if !(1..=3600).contains(&cli.interval_seconds) {
            return Err("interval must be between 1 and 3600 seconds".to_string());
        }
        let clock_format = parse_clock_format(&cli.clock_format)?;
        Ok(Self {
            interval: Duration::from_secs(cli.interval_seconds),
            clock_format,
            load_color: parse_color(&cli.load_color)?,
            clock_color: parse_color(&cli.clock_color)?,
            once: cli.once,
        })
    }
}

fn parse_color(value: &str) -> Result<String, String> {
    let hex = value.trim_start_matches('#');
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(hex.to_ascii_lowercase())
    } else {
        Err(format!("`{value}` is not an RRGGBB colour"))
    }
}

/// Rejects patterns chrono cannot render, so formatting never fails later.
fn parse_clock_format(value: &str) -> Result<String, String> {
    if StrftimeItems::new(value).any(|item| matches!(item, Item::Error)) {
        Err(format!("`{value}` is not a valid clock format"))
    } else {
        Ok(value.to_string())
    }
}

fn main() -> io::Result<()> {
    let args = StatusCli::parse();
    let config = StatusConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let mut stdout = io::stdout().lock();
    loop {
        let line = status_line(&config);
        // the reader went away; nothing left to do
        if writeln!(stdout, "{line}").and_then(|_| stdout.flush()).is_err() {
            return Ok(());
        }
        if config.once {
            return Ok(());
        }
        thread::sleep(config.interval);
    }
}

fn status_line(config: &StatusConfig) -> String {
    let load = fs::read_to_string("/proc/loadavg")
        .ok()
        .and_then(|raw| load_average(&raw))
        .unwrap_or_else(|| "?".to_string());
    let clock = chrono::Local::now().format(&config.clock_format).to_string();
    format!(
        "{{#{}}}load {}  {{#{}}}{}",
        config.load_color, load, config.clock_color, clock
    )
}

/// First three fields of `/proc/loadavg`.
fn load_average(raw: &str) -> Option<String> {
    let fields: Vec<&str> = raw.split_whitespace().take(3).collect();
    (fields.len() == 3).then(|| fields.join(" "))
}
