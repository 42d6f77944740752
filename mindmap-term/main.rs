//! Terminal mind-map editor for heading-only markdown outlines.

mod ctx;
mod input;
mod keymap;
mod logging;
mod prompt;
mod render;
mod terminal;
mod theme;

use std::{
  path::PathBuf,
  time::Duration,
};

use clap::{
  ArgAction,
  Parser,
};
use crossterm::event::{
  self,
  Event,
};
use eyre::Result;
use mindmap_lib::Editor;
use mindmap_loader::Config;

use crate::ctx::Ctx;

#[derive(Debug, Parser)]
#[command(name = "mindmap", about = "Terminal mind-map editor for markdown outlines", version)]
struct Cli {
  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  verbosity: u8,

  /// Save logs to a specific file
  #[arg(long = "log", value_name = "FILE")]
  log_file: Option<PathBuf>,

  /// Load configuration from a specific file
  #[arg(short = 'c', long = "config", value_name = "FILE")]
  config_file: Option<PathBuf>,

  /// Markdown outline to open (created on first save)
  file: Option<PathBuf>,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  mindmap_loader::initialize_config_file(cli.config_file);
  mindmap_loader::initialize_log_file(cli.log_file);
  logging::setup_logging(cli.verbosity)?;

  let config = Config::load_default()?;
  let path = cli
    .file
    .unwrap_or_else(|| PathBuf::from(&config.editor.default_file));
  let editor = Editor::open(path)?;

  let mut ctx = Ctx::new(editor, &config);
  let mut terminal = terminal::Terminal::new()?;
  terminal.enter_raw_mode()?;

  let result = run(&mut ctx, &mut terminal);
  terminal.leave_raw_mode()?;
  result
}

fn run(ctx: &mut Ctx, terminal: &mut terminal::Terminal) -> Result<()> {
  render::render(ctx, terminal)?;

  loop {
    if ctx.should_quit {
      break;
    }

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) => input::handle_key(ctx, key),
        Event::Resize(..) => ctx.needs_render = true,
        _ => {},
      }
    }

    if ctx.needs_render {
      render::render(ctx, terminal)?;
      ctx.needs_render = false;
    }
  }

  log::info!("quitting");
  Ok(())
}
