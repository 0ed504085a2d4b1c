//! Confirmation panel shown after a successful submission

use crate::ui::components::wrap_text;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

const HEADING: &str = "Thank You!";
const BODY: &str = "Your project request has been submitted successfully. Our team will review your information and get back to you within 24 hours.";
const NEXT_STEPS: &str =
    "What's next? We'll analyze your requirements and prepare a custom proposal for your project.";
const MAX_WIDTH: u16 = 64;

pub fn draw_success(frame: &mut Frame, area: Rect) {
    let width = MAX_WIDTH.min(area.width);
    let text_width = width.saturating_sub(6) as usize;
    let green = Style::default().fg(Color::Green);

    let mut lines = vec![
        Line::from(Span::styled("✔", green.add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(HEADING, green.add_modifier(Modifier::BOLD))),
        Line::from(""),
    ];
    lines.extend(wrap_text(BODY, text_width).into_iter().map(Line::from));
    lines.push(Line::from(""));
    lines.extend(
        wrap_text(NEXT_STEPS, text_width)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, green))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter to exit",
        Style::default().fg(Color::DarkGray),
    )));

    let height = (lines.len() as u16 + 2).min(area.height);
    let panel = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, panel);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(green);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        panel,
    );
}
