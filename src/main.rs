mod common;
mod ui;
mod welcome;

use clap::Parser;
use std::path::PathBuf;

use crate::common::paths::AppPaths;
use crate::ui::prelude::*;

/// Welcome screen for Manjaro Linux
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Activate debug mode
    #[arg(short, long)]
    debug: bool,

    /// Emit events as JSON lines instead of text
    #[arg(long)]
    json: bool,

    /// Directory holding pages, the window definition and the desktop entry
    /// (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    ui::init(format, !cli.json);
    ui::set_debug_mode(cli.debug);

    let result =
        AppPaths::resolve(cli.data_dir.as_deref()).and_then(|paths| welcome::run_welcome(&paths));

    if let Err(e) = result {
        emit(Level::Error, "hello.error", &format!("Error: {e:#}"), None);
        std::process::exit(1);
    }
}
