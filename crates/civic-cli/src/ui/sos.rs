//! SOS screen.

use chrono::Local;
use civic_core::emergency::{EMERGENCY_CONTACTS, LocationFix};
use civic_sos::SosState;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
    .split(area);

  draw_controller(f, cols[0], app);
  draw_contacts(f, cols[1], app);
}

fn draw_controller(f: &mut Frame, area: Rect, app: &App) {
  let sos = &app.sos;
  let armed = sos.state().is_armed();
  let block = Block::default()
    .title(" Emergency SOS ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(if armed { Color::LightRed } else { Color::DarkGray }));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let label = Style::default().fg(Color::Gray);
  let mut lines = Vec::new();

  let headline = match sos.state() {
    SosState::Idle => Span::styled(
      "Press Space to send an emergency alert",
      Style::default().add_modifier(Modifier::BOLD),
    ),
    SosState::Arming => Span::styled("Getting your location…", Style::default().fg(Color::Yellow)),
    SosState::Countdown { remaining } => Span::styled(
      format!("Sending alert in {remaining}s. Press Esc to cancel."),
      Style::default()
        .fg(Color::White)
        .bg(Color::Red)
        .add_modifier(Modifier::BOLD),
    ),
    SosState::Dispatching => Span::styled(
      "Sending alert…",
      Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
    ),
  };
  lines.push(Line::from(headline));
  lines.push(Line::from(""));

  let kind = sos
    .kind()
    .map(|k| k.to_string())
    .unwrap_or_else(|| "(not specified)".to_owned());
  lines.push(Line::from(vec![Span::styled("Type       ", label), Span::raw(kind)]));

  let note = if app.editing_note {
    format!("{}▏", sos.note())
  } else if sos.note().is_empty() {
    "(none)".to_owned()
  } else {
    sos.note().to_owned()
  };
  lines.push(Line::from(vec![Span::styled("Details    ", label), Span::raw(note)]));

  let location = LocationFix::from(sos.location()).to_string();
  lines.push(Line::from(vec![Span::styled("Location   ", label), Span::raw(location)]));

  if let Some(copied) = sos.platform().clipboard() {
    lines.push(Line::from(vec![
      Span::styled("Clipboard  ", label),
      Span::styled(copied, Style::default().fg(Color::Cyan)),
    ]));
  }

  if let Some(report) = sos.last_dispatch() {
    let (outcome, color) = if report.delivered {
      ("delivered", Color::Green)
    } else {
      ("NOT delivered, call manually", Color::LightRed)
    };
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
      Span::styled("Last alert ", label),
      Span::raw(format!(
        "{} at {} · ",
        report.request.kind,
        report.request.created_at.with_timezone(&Local).format("%H:%M:%S")
      )),
      Span::styled(outcome, Style::default().fg(color)),
    ]));
  }

  if !app.notices.is_empty() {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Recent", label)));
    for notice in &app.notices {
      lines.push(Line::from(Span::styled(
        format!("  {}", notice.message),
        Style::default().fg(super::notice_color(notice.level)),
      )));
    }
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_contacts(f: &mut Frame, area: Rect, app: &App) {
  let items: Vec<ListItem> = EMERGENCY_CONTACTS
    .iter()
    .map(|c| {
      ListItem::new(Line::from(vec![
        Span::raw(format!("{:<12}", c.name)),
        Span::styled(c.number, Style::default().add_modifier(Modifier::BOLD)),
      ]))
    })
    .collect();

  let list = List::new(items)
    .block(
      Block::default()
        .title(" Quick dial ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray)),
    )
    .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
  let mut state = ListState::default().with_selected(Some(app.contact_cursor));
  f.render_stateful_widget(list, area, &mut state);
}
