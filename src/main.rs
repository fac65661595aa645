use std::path::PathBuf;

use clap::Parser;
use indoc::indoc;
use tracing::Level;

use scroll_wm::config::Config;
use scroll_wm::drivers::WindowSystem;
use scroll_wm::drivers::x11::X11Driver;
use scroll_wm::keybindings::{ButtonBindings, KeyBindings};
use scroll_wm::process;
use scroll_wm::runner::{self, RunError};
use scroll_wm::status::StatusFeed;
use scroll_wm::tracing_sub;
use scroll_wm::window::WindowManager;

#[derive(Parser, Debug)]
#[command(
    name = "scroll-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "X11 window manager with one scrollable, zoomable canvas",
    after_help = indoc! {"
        The status shown on the right of the bar is read line by line from
        standard input, or from the output of STATUS_COMMAND when given.
        `{#RRGGBB}` inside a line switches the colour of the text after it.

        Example:
            scroll-status | scroll-wm
            scroll-wm 'scroll-status --interval 5'
    "}
)]
struct Cli {
    /// Command whose output feeds the status area instead of stdin.
    #[arg(value_name = "STATUS_COMMAND")]
    status_command: Option<String>,

    /// Jump straight to the target instead of animating pans.
    #[arg(long)]
    no_animations: bool,

    /// Focus whichever window the pointer enters.
    #[arg(long)]
    focus_follows_mouse: bool,

    /// Start with the bar hidden.
    #[arg(long)]
    no_bar: bool,

    /// Put the bar at the bottom of the screen.
    #[arg(long)]
    bottom_bar: bool,

    /// Gap between tiled windows, in pixels.
    #[arg(long, value_name = "PIXELS")]
    gap: Option<i32>,

    /// Window border width, in pixels.
    #[arg(long, value_name = "PIXELS")]
    border_width: Option<i32>,

    /// Core X font used by the bar.
    #[arg(long, value_name = "XLFD")]
    font: Option<String>,

    /// Comma separated tag names, at most 32.
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    tags: Option<Vec<String>>,

    /// Most verbose level that gets logged.
    #[arg(long, value_name = "LEVEL", default_value_t = Level::INFO)]
    log_level: Level,

    /// Append logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the key and button bindings and exit.
    #[arg(long)]
    list_bindings: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default();
        config.animations = !self.no_animations;
        config.focus_follows_mouse = self.focus_follows_mouse;
        config.show_bar = !self.no_bar;
        config.top_bar = !self.bottom_bar;
        if let Some(gap) = self.gap {
            config.gap = gap.max(0);
        }
        if let Some(width) = self.border_width {
            config.border_width = width.max(0);
        }
        if let Some(font) = &self.font {
            config.font = font.clone();
        }
        if let Some(tags) = &self.tags {
            let names: Vec<String> = tags
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .take(32)
                .collect();
            if !names.is_empty() {
                config.tag_names = names;
            }
        }
        config
    }
}

fn main() -> Result<(), RunError> {
    let cli = Cli::parse();
    let config = cli.config();
    let keys = KeyBindings::defaults(config.tag_count());
    let buttons = ButtonBindings::defaults();

    if cli.list_bindings {
        for (combo, action) in keys.help_entries().into_iter().chain(buttons.help_entries()) {
            println!("{combo:<24} {action}");
        }
        return Ok(());
    }

    tracing_sub::init(cli.log_level, cli.log_file.as_deref())?;
    process::ignore_child_exits()?;

    let driver = X11Driver::connect(&config)?;
    let status = match &cli.status_command {
        Some(command) => StatusFeed::from_command(command)?,
        None => StatusFeed::from_stdin(),
    };
    let mut wm = WindowManager::new(config, keys, buttons, driver.screen(), driver.bar_height());

    let result = runner::run(driver, &mut wm, Some(status));
    match &result {
        Ok(()) => tracing::info!("exiting"),
        Err(err) => tracing::error!(%err, "stopped"),
    }
    result
}
