//! Active step rendering: body block, subtitle and fields

use super::drop_zone::draw_drop_zone;
use super::field_renderer::draw_field;
use crate::app::App;
use crate::state::FieldKind;
use crate::ui::layout::FormLayout;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;

/// Columns the fields slide in from during the entrance transition
const ENTRANCE_SHIFT: f32 = 8.0;

pub fn draw_step(frame: &mut Frame, layout: &FormLayout, app: &App, now: Instant) {
    let session = &app.session;
    let step = session.active_step();
    let progress = session.entrance_progress(now);

    let title_style = if progress < 1.0 {
        Style::default().fg(Color::Gray)
    } else {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    };
    let block = Block::default()
        .title(Span::styled(format!(" {} ", step.title), title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));
    frame.render_widget(block, layout.body);

    if let (Some(area), Some(subtitle)) = (layout.subtitle, &step.subtitle) {
        let line = Line::from(Span::styled(
            subtitle.as_str(),
            Style::default().fg(Color::Gray),
        ));
        frame.render_widget(Paragraph::new(line), area);
    }

    let shift = ((1.0 - progress) * ENTRANCE_SHIFT).round() as u16;
    let active = session.active_field_index();

    for (index, (field, rect)) in step.fields.iter().zip(&layout.fields).enumerate() {
        let Some(rect) = rect else {
            continue;
        };
        let area = slide(*rect, shift);
        let is_active = index == active;
        let error = app.field_error(&field.name);

        if field.kind == FieldKind::File {
            draw_drop_zone(frame, area, field, app.upload(&field.name), is_active, error);
        } else {
            draw_field(frame, area, field, is_active, error);
        }
    }
}

fn slide(rect: Rect, shift: u16) -> Rect {
    let shift = shift.min(rect.width.saturating_sub(1));
    Rect {
        x: rect.x + shift,
        width: rect.width - shift,
        ..rect
    }
}
