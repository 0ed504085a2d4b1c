//! Drop zone for file fields: upload prompt or preview

use super::field_renderer::{draw_error_row, field_title, split_error_row};
use crate::state::{FormField, UploadHandler, ZoneStyle};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// Characters of the data URL shown in the preview
const DATA_URL_PREVIEW: usize = 48;

pub fn draw_drop_zone(
    frame: &mut Frame,
    area: Rect,
    field: &FormField,
    upload: Option<&UploadHandler>,
    is_active: bool,
    error: Option<&str>,
) {
    let (body, error_row) = split_error_row(area, error);

    let zone = upload.map(|u| u.zone).unwrap_or_default();
    let hover = upload.is_some_and(|u| u.hover);
    let color = match zone {
        ZoneStyle::Error => Color::Red,
        ZoneStyle::Success => Color::Green,
        ZoneStyle::Idle if hover => Color::Yellow,
        ZoneStyle::Idle if is_active => Color::Cyan,
        ZoneStyle::Idle => Color::DarkGray,
    };
    let block = Block::default()
        .title(field_title(field))
        .borders(Borders::ALL)
        .border_type(if hover {
            BorderType::Double
        } else {
            BorderType::Plain
        })
        .border_style(Style::default().fg(color));

    let lines = match (upload.and_then(|u| u.preview.as_ref()), field.attached_file()) {
        (Some(preview), _) => vec![
            Line::from(Span::styled(
                format!("✔ {}", preview.file.file_name),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "{} · {}",
                format_size(preview.file.size),
                preview.file.mime
            )),
            Line::from(Span::styled(
                truncate(&preview.data_url, DATA_URL_PREVIEW),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                "Ctrl+X to remove",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        (None, Some(file)) => vec![Line::from(format!("Reading {}...", file.file_name))],
        (None, None) => prompt_lines(field, is_active),
    };

    frame.render_widget(Paragraph::new(lines).block(block), body);

    if let (Some(row), Some(message)) = (error_row, error) {
        draw_error_row(frame, row, message);
    }
}

fn prompt_lines(field: &FormField, is_active: bool) -> Vec<Line<'static>> {
    let hint = Style::default().fg(Color::DarkGray);
    let mut path = vec![Span::raw("> "), Span::raw(field.as_text().to_string())];
    if is_active {
        path.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
    }
    vec![
        Line::from("Drop an image here, or type its path and press Enter"),
        Line::from(path),
        Line::from(Span::styled("JPG, PNG or SVG, up to 5MB", hint)),
    ]
}

/// Human-readable file size
pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f >= KIB * KIB {
        format!("{:.1} MB", bytes_f / (KIB * KIB))
    } else if bytes_f >= KIB {
        format!("{:.1} KB", bytes_f / KIB)
    } else {
        format!("{bytes} B")
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}…")
    }
}
