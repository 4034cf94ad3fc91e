//! Form pane, used for the issue report screen and the modal overlays.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::form::{FieldKind, FormState};

/// Render `form` into `area`, with inline errors under each field.
pub fn draw(f: &mut Frame, area: Rect, form: &FormState) {
  let block = Block::default()
    .title(format!(" {} ", form.title))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = Vec::new();
  for (i, field) in form.fields.iter().enumerate() {
    let focused = i == form.cursor;
    let label_style = if focused {
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };

    let value = match &field.kind {
      FieldKind::Choice(_) if field.value.is_empty() => "‹ select ›".to_owned(),
      FieldKind::Choice(_) => format!("‹ {} ›", field.value),
      FieldKind::Text | FieldKind::Number if focused => format!("{}▏", field.value),
      FieldKind::Text | FieldKind::Number => field.value.clone(),
    };

    lines.push(Line::from(vec![
      Span::styled(format!("{:<16}", field.label), label_style),
      Span::raw(value),
    ]));
    if let Some(message) = form.error_for(field.key) {
      lines.push(Line::from(Span::styled(
        format!("{:<16}{message}", ""),
        Style::default().fg(Color::LightRed),
      )));
    }
  }

  // Errors not tied to a visible field.
  if let Some(errors) = &form.errors {
    for e in &errors.fields {
      if !form.fields.iter().any(|field| field.key == e.field) {
        lines.push(Line::from(Span::styled(
          e.message.clone(),
          Style::default().fg(Color::LightRed),
        )));
      }
    }
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
