//! List screens: dashboard, blood requests, fundraisers and the admin table.

use chrono::{Local, Utc};
use civic_core::{
  complaint::{Complaint, ComplaintStatus, Priority},
  donation::Urgency,
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
};

use crate::{app::App, browse::ListView};

// ─── Shared pieces ────────────────────────────────────────────────────────────

fn priority_color(priority: Priority) -> Color {
  match priority {
    Priority::Critical => Color::LightRed,
    Priority::High => Color::Yellow,
    Priority::Medium => Color::Cyan,
    Priority::Low => Color::Gray,
  }
}

fn urgency_color(urgency: Urgency) -> Color {
  match urgency {
    Urgency::Critical => Color::LightRed,
    Urgency::Urgent => Color::Yellow,
    Urgency::Normal => Color::Gray,
  }
}

fn status_color(status: ComplaintStatus) -> Color {
  match status {
    ComplaintStatus::Pending => Color::Yellow,
    ComplaintStatus::Verified => Color::Cyan,
    ComplaintStatus::Resolved => Color::Green,
  }
}

fn badge(label: impl AsRef<str>, color: Color) -> Span<'static> {
  Span::styled(
    format!("[{}] ", label.as_ref()),
    Style::default().fg(color).add_modifier(Modifier::BOLD),
  )
}

/// Title with counts, plus the search text and active facets.
fn list_title(name: &str, view: &ListView, shown: usize, total: usize) -> String {
  let mut title = if shown == total {
    format!(" {name} ({total})")
  } else {
    format!(" {name} ({shown}/{total})")
  };
  if view.searching || !view.search_text().is_empty() {
    title.push_str(&format!("  /{}", view.search_text()));
  }
  for (facet, value) in view.facet_summary() {
    title.push_str(&format!("  {facet}={value}"));
  }
  title.push(' ');
  title
}

/// Render `items` as a bordered list with `cursor` highlighted.
fn draw_list(f: &mut Frame, area: Rect, title: String, items: Vec<ListItem>, cursor: usize) {
  let empty = items.is_empty();
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if empty {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new(Span::styled(
        "Nothing matches.",
        Style::default().fg(Color::DarkGray),
      )),
      inner,
    );
    return;
  }

  let list = List::new(items).block(block).highlight_style(
    Style::default()
      .bg(Color::Blue)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let mut state = ListState::default().with_selected(Some(cursor));
  f.render_stateful_widget(list, area, &mut state);
}

fn complaint_item(c: &Complaint) -> ListItem<'static> {
  ListItem::new(vec![
    Line::from(vec![
      badge(c.priority, priority_color(c.priority)),
      Span::raw(c.title.clone()),
    ]),
    Line::from(vec![
      Span::raw("    "),
      badge(c.status, status_color(c.status)),
      Span::styled(
        format!(
          "{} · {} · {}",
          c.category,
          c.location,
          c.created_at.with_timezone(&Local).format("%Y-%m-%d")
        ),
        Style::default().fg(Color::DarkGray),
      ),
    ]),
  ])
}

// ─── Home ─────────────────────────────────────────────────────────────────────

pub fn draw_home(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3), Constraint::Min(0)])
    .split(area);

  let figures = match &app.stats {
    Some(s) => vec![
      ("Issues", s.total_issues, Color::White),
      ("Pending", s.pending_issues, Color::Yellow),
      ("Resolved", s.resolved_issues, Color::Green),
      ("Blood requests", s.active_blood_requests, Color::LightRed),
      ("Fundraisers", s.active_fundraisers, Color::Cyan),
    ],
    None => Vec::new(),
  };
  let mut spans = Vec::new();
  for (label, value, color) in figures {
    spans.push(Span::styled(
      format!(" {value} "),
      Style::default().fg(color).add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(format!("{label}   "), Style::default().fg(Color::Gray)));
  }
  f.render_widget(
    Paragraph::new(Line::from(spans)).block(
      Block::default()
        .title(" Community ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray)),
    ),
    rows[0],
  );

  let visible = app.home.visible(&app.complaints);
  let title = list_title("Recent issues", &app.home, visible.len(), app.complaints.len());
  let items = visible.into_iter().map(complaint_item).collect();
  draw_list(f, rows[1], title, items, app.home.cursor);
}

// ─── Blood requests ───────────────────────────────────────────────────────────

pub fn draw_blood_requests(f: &mut Frame, area: Rect, app: &App) {
  let now = Utc::now();
  let visible = app.blood.visible(&app.blood_requests);
  let title = list_title(
    "Blood requests",
    &app.blood,
    visible.len(),
    app.blood_requests.len(),
  );
  let items = visible
    .into_iter()
    .map(|r| {
      let closed = if r.is_active(now) { "" } else { "  (closed)" };
      ListItem::new(vec![
        Line::from(vec![
          badge(r.blood_type, Color::LightRed),
          badge(r.urgency, urgency_color(r.urgency)),
          Span::raw(format!("{}{closed}", r.patient_name)),
        ]),
        Line::from(Span::styled(
          format!(
            "    {} · {} · {}/{} units · {} {}",
            r.hospital,
            r.location,
            r.units_collected,
            r.units_needed,
            r.contact_person,
            r.contact_phone
          ),
          Style::default().fg(Color::DarkGray),
        )),
      ])
    })
    .collect();
  draw_list(f, area, title, items, app.blood.cursor);
}

// ─── Fundraisers ──────────────────────────────────────────────────────────────

pub fn draw_fundraisers(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(0), Constraint::Length(3)])
    .split(area);

  let visible = app.fundraising.visible(&app.fundraisers);
  let title = list_title(
    "Fundraisers",
    &app.fundraising,
    visible.len(),
    app.fundraisers.len(),
  );
  let items = visible
    .into_iter()
    .map(|c| {
      ListItem::new(vec![
        Line::from(vec![
          badge(c.urgency, urgency_color(c.urgency)),
          Span::raw(c.title.clone()),
        ]),
        Line::from(Span::styled(
          format!(
            "    ₹{:.0} of ₹{:.0} · {} · {}",
            c.raised_amount, c.target_amount, c.organizer, c.hospital
          ),
          Style::default().fg(Color::DarkGray),
        )),
      ])
    })
    .collect();
  draw_list(f, cols[0], title, items, app.fundraising.cursor);

  // Progress of the selected campaign.
  if let Some(selected) = app.fundraising.selected(&app.fundraisers) {
    let label = if selected.goal_reached() {
      "Goal reached".to_owned()
    } else {
      format!(
        "{:.0}% · ₹{:.0} to go",
        selected.progress() * 100.0,
        selected.remaining()
      )
    };
    let gauge = Gauge::default()
      .block(Block::default().borders(Borders::ALL).title(" Progress "))
      .gauge_style(Style::default().fg(Color::Green))
      .ratio(selected.progress().clamp(0.0, 1.0))
      .label(label);
    f.render_widget(gauge, cols[1]);
  }
}

// ─── Admin ────────────────────────────────────────────────────────────────────

pub fn draw_admin(f: &mut Frame, area: Rect, app: &App) {
  let visible = app.admin.visible(&app.complaints);
  let title = list_title("All complaints", &app.admin, visible.len(), app.complaints.len());
  let items = visible
    .into_iter()
    .map(|c| {
      ListItem::new(Line::from(vec![
        badge(c.status, status_color(c.status)),
        badge(c.priority, priority_color(c.priority)),
        Span::raw(format!("{}  ", c.title)),
        Span::styled(
          format!(
            "{} · {}",
            c.reported_by,
            c.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
          ),
          Style::default().fg(Color::DarkGray),
        ),
      ]))
    })
    .collect();
  draw_list(f, area, title, items, app.admin.cursor);
}
