//! Field rendering utilities for forms

use crate::state::{FieldKind, FormField};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const CURSOR: &str = "▌";

/// Border color for a field: errors win over focus
pub fn border_color(is_active: bool, has_error: bool) -> Color {
    if has_error {
        Color::Red
    } else if is_active {
        Color::Cyan
    } else {
        Color::DarkGray
    }
}

/// Field label as shown in the border, with a marker for required fields
pub fn field_title(field: &FormField) -> String {
    if field.required {
        format!(" {} * ", field.label)
    } else {
        format!(" {} ", field.label)
    }
}

/// Split off the bottom row for the error message when there is one
pub fn split_error_row(area: Rect, error: Option<&str>) -> (Rect, Option<Rect>) {
    match error {
        Some(_) if area.height > 1 => {
            let body = Rect {
                height: area.height - 1,
                ..area
            };
            let row = Rect {
                y: area.y + area.height - 1,
                height: 1,
                ..area
            };
            (body, Some(row))
        }
        _ => (area, None),
    }
}

pub fn draw_error_row(frame: &mut Frame, area: Rect, message: &str) {
    let line = Line::from(Span::styled(
        format!(" {message}"),
        Style::default().fg(Color::Red),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw a text, choice or select field with its error line
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &FormField,
    is_active: bool,
    error: Option<&str>,
) {
    let (body, error_row) = split_error_row(area, error);
    let block = Block::default()
        .title(field_title(field))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(is_active, error.is_some())));

    let content = match field.kind {
        FieldKind::Checkbox | FieldKind::Radio => option_lines(field, is_active),
        FieldKind::Select => select_line(field, is_active),
        _ => text_lines(field, is_active),
    };
    frame.render_widget(
        Paragraph::new(content)
            .wrap(Wrap { trim: false })
            .block(block),
        body,
    );

    if let (Some(row), Some(message)) = (error_row, error) {
        draw_error_row(frame, row, message);
    }
}

fn text_lines(field: &FormField, is_active: bool) -> Vec<Line<'static>> {
    let value = field.as_text();
    if value.is_empty() && !is_active {
        let placeholder = field.placeholder.clone().unwrap_or_default();
        return vec![Line::from(Span::styled(
            placeholder,
            Style::default().fg(Color::DarkGray),
        ))];
    }

    let mut lines: Vec<Line> = value
        .split('\n')
        .map(|l| Line::from(l.to_string()))
        .collect();
    if is_active {
        let cursor = Span::styled(CURSOR, Style::default().fg(Color::Cyan));
        match lines.last_mut() {
            Some(last) => last.spans.push(cursor),
            None => lines.push(Line::from(cursor)),
        }
    }
    lines
}

fn select_line(field: &FormField, is_active: bool) -> Vec<Line<'static>> {
    let (text, style) = match field.choices().first() {
        Some(_) => (field.display_value(), Style::default()),
        None => (
            field
                .placeholder
                .clone()
                .unwrap_or_else(|| "Select an option".to_string()),
            Style::default().fg(Color::DarkGray),
        ),
    };
    if is_active {
        let arrow = Style::default().fg(Color::Cyan);
        vec![Line::from(vec![
            Span::styled("◀ ", arrow),
            Span::styled(text, style),
            Span::styled(" ▶", arrow),
        ])]
    } else {
        vec![Line::from(Span::styled(text, style))]
    }
}

fn option_lines(field: &FormField, is_active: bool) -> Vec<Line<'static>> {
    let checked = field.choices();
    field
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let is_checked = checked.contains(&option.value);
            let marker = match (field.kind, is_checked) {
                (FieldKind::Radio, true) => "(•)",
                (FieldKind::Radio, false) => "( )",
                (_, true) => "[x]",
                (_, false) => "[ ]",
            };
            let mut style = Style::default();
            if is_checked {
                style = style.fg(Color::Green);
            }
            if is_active && i == field.option_cursor {
                style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
            }
            Line::from(Span::styled(format!("{marker} {}", option.label), style))
        })
        .collect()
}
