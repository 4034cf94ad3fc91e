//! TUI rendering: header tabs, the current screen, overlays and status bar.

pub mod form;
pub mod listing;
pub mod sos;

use chrono::Local;
use civic_sos::capability::NoticeLevel;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);

  if let Some(overlay) = &app.overlay {
    let popup = centered(rows[1], 64, 16);
    f.render_widget(Clear, popup);
    form::draw(f, popup, overlay.form());
  }
}

/// A `width` x `height` rectangle centred in `area`, clipped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
    .flex(Flex::Center)
    .areas(area);
  let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
    .flex(Flex::Center)
    .areas(row);
  rect
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let mut spans = vec![Span::styled(
    " civic ",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  )];
  for (i, screen) in Screen::ALL.iter().enumerate() {
    let style = if *screen == app.screen {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else if *screen == Screen::Sos {
      Style::default().fg(Color::LightRed)
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::styled(format!(" {} {} ", i + 1, screen.title()), style));
  }

  let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
  let right = format!("{date} ");
  let pad = (area.width as usize)
    .saturating_sub(used)
    .saturating_sub(right.len());
  spans.push(Span::raw(" ".repeat(pad)));
  spans.push(Span::styled(right, Style::default().fg(Color::Gray)));

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  // The assistant takes a right-hand column when open.
  let area = if app.chat.open {
    let cols = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
      .split(area);
    draw_chat(f, cols[1], app);
    cols[0]
  } else {
    area
  };

  match app.screen {
    Screen::Home => listing::draw_home(f, area, app),
    Screen::SubmitIssue => form::draw(f, area, &app.issue_form),
    Screen::BloodRequests => listing::draw_blood_requests(f, area, app),
    Screen::Fundraisers => listing::draw_fundraisers(f, area, app),
    Screen::Sos => sos::draw(f, area, app),
    Screen::Admin => listing::draw_admin(f, area, app),
  }
}

fn draw_chat(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" First-aid assistant ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(0), Constraint::Length(1)])
    .split(inner);

  let mut lines = Vec::new();
  for (from_user, text) in &app.chat.history {
    let (who, color) = if *from_user {
      ("you", Color::Cyan)
    } else {
      ("bot", Color::Green)
    };
    lines.push(Line::from(vec![
      Span::styled(format!("{who}: "), Style::default().fg(color).add_modifier(Modifier::BOLD)),
      Span::raw(text.as_str()),
    ]));
    lines.push(Line::from(""));
  }
  // Keep the newest exchange in view.
  let height = rows[0].height as usize;
  let scroll = lines.len().saturating_sub(height) as u16;
  f.render_widget(
    Paragraph::new(lines).wrap(Wrap { trim: false }).scroll((scroll, 0)),
    rows[0],
  );
  f.render_widget(
    Paragraph::new(format!("> {}▏", app.chat.input)),
    rows[1],
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn notice_color(level: NoticeLevel) -> Color {
  match level {
    NoticeLevel::Success => Color::Green,
    NoticeLevel::Info => Color::Gray,
    NoticeLevel::Warning => Color::Yellow,
    NoticeLevel::Error => Color::LightRed,
  }
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let searching = app.current_list().is_some_and(|v| v.searching);

  let (mode_label, hints) = if app.overlay.is_some() {
    ("FORM", "Tab next  ←→ choose  Enter submit  Esc close")
  } else if app.chat.open {
    ("CHAT", "Type a question  Enter send  Esc close")
  } else if app.editing_note {
    ("NOTE", "Describe the emergency  Enter/Esc done")
  } else if searching {
    ("SEARCH", "Type to filter  Esc clear  Enter keep")
  } else {
    match app.screen {
      Screen::Home => ("NORMAL", "↑↓ move  / search  s status  p priority  g category  ? assistant  q quit"),
      Screen::SubmitIssue => ("FORM", "Tab next  ←→ choose  Enter submit  Esc back"),
      Screen::BloodRequests => ("NORMAL", "/ search  b blood type  p urgency  n new  Enter call"),
      Screen::Fundraisers => ("NORMAL", "/ search  p urgency  n new  d donate"),
      Screen::Sos => ("SOS", "Space activate  Esc cancel  t type  e note  l locate  s share  Enter call"),
      Screen::Admin => ("ADMIN", "/ search  s status  v verify  x resolve  u pending  r refresh"),
    }
  };

  let (status, color) = match &app.status {
    Some(notice) => (notice.message.as_str(), notice_color(notice.level)),
    None => (hints, Color::DarkGray),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let status_span = Span::styled(format!("  {status}"), Style::default().fg(color));

  let line = Line::from(vec![mode_span, status_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

#[cfg(test)]
mod tests {
  use std::num::NonZeroU32;

  use civic_core::{seed, stats::DashboardStats};
  use ratatui::{Terminal, backend::TestBackend};

  use super::*;
  use crate::{app::Overlay, client::ApiClient, form::FormState};

  fn render(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
    terminal.draw(|f| draw(f, app)).unwrap();
    terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect()
  }

  fn app() -> App {
    let client = ApiClient::new("http://127.0.0.1:9").unwrap();
    let (mut app, _ticks) = App::new(client, None, NonZeroU32::new(10).unwrap());
    app.complaints = seed::complaints();
    app.blood_requests = seed::blood_requests();
    app.fundraisers = seed::fundraisers();
    app.stats = Some(DashboardStats::compute(
      &app.complaints,
      &app.blood_requests,
      &app.fundraisers,
      seed::at(2024, 1, 16, 0, 0, 0),
    ));
    app
  }

  #[test]
  fn every_screen_renders() {
    let mut app = app();
    for screen in Screen::ALL {
      app.screen = screen;
      let text = render(&app);
      assert!(text.contains(screen.title()), "{screen:?}");
    }
  }

  #[test]
  fn blood_screen_lists_patients() {
    let mut app = app();
    app.screen = Screen::BloodRequests;
    assert!(render(&app).contains("Ravi Mehta"));
  }

  #[test]
  fn sos_screen_lists_recent_notices() {
    use civic_sos::capability::Notice;

    let mut app = app();
    app.screen = Screen::Sos;
    app.notices.push_back(Notice::success("Location detected"));
    app.notices.push_back(Notice::info("Location copied to clipboard"));
    let text = render(&app);
    assert!(text.contains("Recent"));
    assert!(text.contains("Location detected"));
    assert!(text.contains("Location copied to clipboard"));
  }

  #[test]
  fn overlay_and_chat_render_on_top() {
    let mut app = app();
    app.screen = Screen::Fundraisers;
    app.overlay = Some(Overlay::NewFundraiser(FormState::fundraiser()));
    app.chat.open = true;
    let text = render(&app);
    assert!(text.contains("Start a Fundraiser"));
    assert!(text.contains("First-aid assistant"));
  }
}
