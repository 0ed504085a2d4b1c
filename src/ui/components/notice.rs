//! Notice banner component

use crate::state::{Banner, BannerKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render a bordered notice, wrapped to the lines the area has room for
pub fn render_notice(frame: &mut Frame, area: Rect, banner: &Banner) {
    let color = match banner.kind {
        BannerKind::Error => Color::Red,
        BannerKind::Info => Color::Green,
    };
    let max_width = area.width.saturating_sub(4) as usize;
    let max_lines = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = wrap_text(&banner.message, max_width)
        .into_iter()
        .take(max_lines)
        .map(|l| Line::from(Span::styled(format!(" {l}"), Style::default().fg(color))))
        .collect();

    let hint = Line::from(Span::styled(
        " Esc to dismiss ",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    ))
    .right_aligned();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title_bottom(hint);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Wrap text to fit within a maximum width
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in paragraph.split_whitespace() {
            if current_line.len() + word.len() + 1 > max_width && !current_line.is_empty() {
                lines.push(current_line);
                current_line = String::new();
            }
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
