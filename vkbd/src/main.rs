mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ratatui::crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};
use vkbd_core::{
    config::{self, Config},
    layout::{self, DEFAULT_LAYOUT},
    state::{AppState, FieldValue},
};
use vkbd_tui::Theme;

#[derive(Parser)]
#[command(version, about = "On-screen virtual keyboard for terminal text fields")]
struct Cli {
    /// Override path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Level written to the log file (off, error, warn, info, debug, trace)
    #[arg(long, default_value = logging::DEFAULT_LOG_LEVEL)]
    log_level: log::LevelFilter,

    /// Print the final field values as JSON on exit
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the on-screen key layout
    Layout {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(Commands::Layout { json }) = cli.command {
        return print_layout(json);
    }

    let config = config::load_config(cli.config.as_deref())?;
    logging::setup_logging(cli.log_level)?;

    let values = run_tui(&config)?;
    write_values(&mut io::stdout().lock(), &values, cli.json)
}

fn run_tui(config: &Config) -> Result<Vec<FieldValue>> {
    let mut state = AppState::from_config(config);
    let theme = Theme::from_config(&config.theme);

    let mut terminal = ratatui::init();
    let result = execute!(io::stdout(), EnableMouseCapture)
        .map_err(anyhow::Error::from)
        .and_then(|()| {
            vkbd_tui::run(
                &mut terminal,
                &mut state,
                &theme,
                &config.keys,
                &config.keyboard.marker_class,
            )
        });
    let _ = execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result?;
    Ok(state.field_values())
}

/// One `label: value` line per field, newlines inside a value written as `\n`.
/// JSON output carries the values untouched.
fn write_values(out: &mut impl Write, values: &[FieldValue], json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(values)?)?;
    } else {
        for field in values {
            writeln!(out, "{}: {}", field.label, field.value.replace('\n', "\\n"))?;
        }
    }
    Ok(())
}

fn print_layout(json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&layout::listing(DEFAULT_LAYOUT))?
        );
    } else {
        for row in layout::rows(DEFAULT_LAYOUT) {
            let symbols: Vec<&str> = row.iter().map(|&i| DEFAULT_LAYOUT[i].symbol).collect();
            println!("{}", symbols.join(" "));
        }
    }
    Ok(())
}
