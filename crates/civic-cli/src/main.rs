//! `civic`: terminal client for the civic engagement API.
//!
//! # Usage
//!
//! ```
//! civic --url http://localhost:3000
//! civic --config ~/.config/civic/config.toml --open /sos --lat 28.6139 --lng 77.209
//! ```

mod app;
mod browse;
mod client;
mod form;
mod platform;
mod ui;

use std::{
  fs::OpenOptions,
  io,
  num::NonZeroU32,
  path::PathBuf,
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::{App, Screen};
use civic_core::{emergency::Coordinates, event::CivicEvent};
use civic_sos::{DEFAULT_COUNTDOWN_SECS, scheduler::Cycle};
use clap::Parser;
use client::ApiClient;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "civic", about = "Terminal client for the civic engagement API")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the civic server (default: http://localhost:3000).
  #[arg(long, env = "CIVIC_URL")]
  url: Option<String>,

  /// Seconds between arming SOS and sending the alert.
  #[arg(long, env = "CIVIC_COUNTDOWN")]
  countdown: Option<NonZeroU32>,

  /// Latitude reported as this device's location.
  #[arg(long, env = "CIVIC_LAT", allow_hyphen_values = true)]
  lat: Option<f64>,

  /// Longitude reported as this device's location.
  #[arg(long, env = "CIVIC_LNG", allow_hyphen_values = true)]
  lng: Option<f64>,

  /// Write logs to this file. Nothing is logged otherwise.
  #[arg(long, env = "CIVIC_LOG", value_name = "FILE")]
  log_file: Option<PathBuf>,

  /// Screen to start on, by route path (`/sos`, `/admin`, ...).
  #[arg(long, default_value = "/")]
  open: String,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
  url:       Option<String>,
  countdown: Option<NonZeroU32>,
  latitude:  Option<f64>,
  longitude: Option<f64>,
  log_file:  Option<PathBuf>,
}

/// Settings after flags, file and defaults are merged.
struct Settings {
  url:       String,
  countdown: NonZeroU32,
  position:  Option<Coordinates>,
  log_file:  Option<PathBuf>,
}

impl Settings {
  /// CLI flags override the config file, which overrides defaults.
  fn merge(args: &Args, file: ConfigFile) -> Self {
    let latitude = args.lat.or(file.latitude);
    let longitude = args.lng.or(file.longitude);
    Self {
      url:       args
        .url
        .clone()
        .or(file.url)
        .unwrap_or_else(|| "http://localhost:3000".to_string()),
      countdown: args
        .countdown
        .or(file.countdown)
        .or(NonZeroU32::new(DEFAULT_COUNTDOWN_SECS))
        .unwrap_or(NonZeroU32::MIN),
      position:  latitude.zip(longitude).map(|(lat, lng)| Coordinates::new(lat, lng)),
      log_file:  args.log_file.clone().or(file.log_file),
    }
  }
}

/// Log to `path` if given. The terminal is busy drawing, so logs never go
/// to stdout or stderr.
fn init_logging(path: Option<&PathBuf>) -> Result<()> {
  let Some(path) = path else {
    return Ok(());
  };
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };
  let settings = Settings::merge(&args, file_cfg);
  init_logging(settings.log_file.as_ref())?;
  tracing::info!(url = %settings.url, countdown = settings.countdown.get(), "starting civic client");

  let client = ApiClient::new(settings.url)?;
  let events = client.watch_events();
  let (mut app, ticks) = App::new(client, settings.position, settings.countdown);
  app.screen = Screen::from_path(&args.open);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // A failed initial load is shown in the status bar; `r` retries.
  let _ = app.refresh().await;

  let run_result = run_event_loop(&mut terminal, &mut app, ticks, events).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  mut ticks: UnboundedReceiver<Cycle>,
  mut events: UnboundedReceiver<CivicEvent>,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Countdown ticks and server events are delivered between frames.
    while let Ok(cycle) = ticks.try_recv() {
      app.sos_tick(cycle).await;
    }
    while let Ok(event) = events.try_recv() {
      app.apply_event(event);
    }

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && key.kind == KeyEventKind::Press
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn args(extra: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("civic").chain(extra.iter().copied())).unwrap()
  }

  #[test]
  fn flags_override_file_which_overrides_defaults() {
    let file: ConfigFile = toml::from_str(
      r#"
        url = "http://civic.example:8080"
        countdown = 5
        latitude = 19.076
        longitude = 72.8777
      "#,
    )
    .unwrap();
    let settings = Settings::merge(&args(&["--countdown", "3"]), file);
    assert_eq!(settings.url, "http://civic.example:8080");
    assert_eq!(settings.countdown.get(), 3);
    assert_eq!(settings.position, Some(Coordinates::new(19.076, 72.8777)));
  }

  #[test]
  fn defaults_without_file() {
    let settings = Settings::merge(&args(&[]), ConfigFile::default());
    assert_eq!(settings.countdown.get(), DEFAULT_COUNTDOWN_SECS);
    assert!(settings.position.is_none());
    assert!(settings.log_file.is_none());
  }

  #[test]
  fn half_a_position_is_no_position() {
    let settings = Settings::merge(&args(&["--lat", "-33.86"]), ConfigFile::default());
    assert!(settings.position.is_none());
  }

  #[test]
  fn zero_countdown_is_rejected() {
    assert!(Args::try_parse_from(["civic", "--countdown", "0"]).is_err());
  }
}
