//! Layout components (header, step body, navigation, status bar)
//!
//! `FormLayout` is computed from the terminal area and the app state alone, so
//! the same rectangles are used for drawing and for mouse hit-testing.

use super::components::{render_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::platform::{NEXT_SHORTCUT, PREV_SHORTCUT, REMOVE_FILE_SHORTCUT, SUBMIT_SHORTCUT};
use crate::state::{FieldKind, FormField};
use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};

/// Title line + step label + progress gauge
pub const HEADER_HEIGHT: u16 = 3;
/// Bordered notice with room for two lines
pub const NOTICE_HEIGHT: u16 = 4;
pub const STATUS_HEIGHT: u16 = 1;
/// Width of the Previous / Next / Submit buttons
pub const NAV_BUTTON_WIDTH: u16 = 16;

/// Rows a field takes, including its error line
pub fn field_height(field: &FormField, has_error: bool) -> u16 {
    let body = match field.kind {
        FieldKind::Textarea => 5,
        FieldKind::Checkbox | FieldKind::Radio => 2 + field.options.len() as u16,
        FieldKind::File => 6,
        _ => 3,
    };
    body + u16::from(has_error)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLayout {
    pub header: Rect,
    pub notice: Option<Rect>,
    /// Bordered step body
    pub body: Rect,
    pub subtitle: Option<Rect>,
    /// One entry per field of the active step; `None` when scrolled out of view
    pub fields: Vec<Option<Rect>>,
    pub prev_button: Option<Rect>,
    pub next_button: Rect,
    pub status: Rect,
}

impl FormLayout {
    pub fn compute(area: Rect, app: &App) -> Self {
        let notice_height = if app.notice.is_some() { NOTICE_HEIGHT } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT), // Title, step, gauge
                Constraint::Length(notice_height), // Notice
                Constraint::Min(0),                // Step body
                Constraint::Length(BUTTON_HEIGHT), // Navigation
                Constraint::Length(STATUS_HEIGHT), // Status bar
            ])
            .split(area);

        let body = chunks[2];
        let nav = chunks[3];
        let inner = body.inner(Margin::new(1, 1));

        let step = app.session.active_step();
        let mut top = inner.y;
        let subtitle = match &step.subtitle {
            Some(_) if inner.height > 1 => {
                let rect = Rect::new(inner.x, inner.y, inner.width, 1);
                top += 2;
                Some(rect)
            }
            _ => None,
        };
        let fields_area = Rect::new(
            inner.x,
            top.min(inner.bottom()),
            inner.width,
            inner.bottom().saturating_sub(top),
        );
        let heights: Vec<u16> = step
            .fields
            .iter()
            .map(|f| field_height(f, app.field_error(&f.name).is_some()))
            .collect();
        let fields = stack_fields(fields_area, &heights, app.session.active_field_index());

        let view = app.session.view();
        let width = NAV_BUTTON_WIDTH.min(nav.width);
        let prev_button = view
            .show_prev
            .then(|| Rect::new(nav.x, nav.y, width, nav.height));
        let next_button = Rect::new(
            nav.right().saturating_sub(width),
            nav.y,
            width,
            nav.height,
        );

        Self {
            header: chunks[0],
            notice: app.notice.as_ref().map(|_| chunks[1]),
            body,
            subtitle,
            fields,
            prev_button,
            next_button,
            status: chunks[4],
        }
    }

    /// Index of the field under a screen position
    pub fn field_at(&self, position: Position) -> Option<usize> {
        self.fields
            .iter()
            .position(|rect| rect.is_some_and(|r| r.contains(position)))
    }
}

/// Stack fields top to bottom, scrolled just enough to keep the active one visible
fn stack_fields(area: Rect, heights: &[u16], active: usize) -> Vec<Option<Rect>> {
    let offsets: Vec<u16> = heights
        .iter()
        .scan(0u16, |acc, h| {
            let start = *acc;
            *acc = acc.saturating_add(*h);
            Some(start)
        })
        .collect();

    let active_bottom = match (offsets.get(active), heights.get(active)) {
        (Some(offset), Some(height)) => offset + height,
        _ => 0,
    };
    let scroll = active_bottom.saturating_sub(area.height);

    offsets
        .iter()
        .zip(heights)
        .map(|(&offset, &height)| {
            if offset < scroll {
                return None;
            }
            let y = offset - scroll;
            if y + height > area.height {
                return None;
            }
            Some(Rect::new(area.x, area.y + y, area.width, height))
        })
        .collect()
}

/// Draw the form title, step label and progress gauge
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let view = app.session.view();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 3])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        format!(" {}", app.session.title()),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, rows[0]);

    let step = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" Step {} of {}", view.index + 1, view.total),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!(" · {}", app.session.active_step().title),
            Style::default().fg(Color::Gray),
        ),
    ]));
    frame.render_widget(step, rows[1]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(view.progress.clamp(0.0, 1.0))
        .label(format!("{:.0}%", view.progress * 100.0));
    frame.render_widget(gauge, rows[2]);
}

/// Draw the Previous and Next/Submit buttons
pub fn draw_navigation(frame: &mut Frame, layout: &FormLayout, app: &App) {
    let view = app.session.view();

    if let Some(area) = layout.prev_button {
        render_button(frame, area, "← Previous", false, !app.is_busy());
    }

    if view.show_submit {
        let label = if app.is_busy() {
            "Submitting..."
        } else {
            "Submit"
        };
        render_button(frame, layout.next_button, label, true, !app.is_busy());
    } else {
        render_button(frame, layout.next_button, "Next →", true, true);
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!(" {} ", get_field_hints(app)),
        Style::default().fg(Color::Gray),
    )];

    if app.is_busy() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled("Sending...", Style::default().fg(Color::Yellow)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    // Quit hint on the right
    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.right().saturating_sub(quit_hint.len() as u16),
        width: (quit_hint.len() as u16).min(area.width),
        ..area
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the focused field
fn get_field_hints(app: &App) -> String {
    let session = &app.session;
    let advance = if session.is_last_step() {
        format!("{SUBMIT_SHORTCUT}:submit")
    } else {
        format!("{NEXT_SHORTCUT}:next")
    };
    let back = if session.step_index() > 0 {
        format!("  {PREV_SHORTCUT}:back")
    } else {
        String::new()
    };

    let field = match session.active_field_kind() {
        Some(FieldKind::Checkbox) => "Space:toggle  ↑/↓:move",
        Some(FieldKind::Radio) => "Space:choose  ↑/↓:move",
        Some(FieldKind::Select) => "←/→:change",
        Some(FieldKind::Textarea) => "Enter:newline",
        Some(FieldKind::File) => "Enter:attach  paste:drop",
        _ => "Enter:continue",
    };
    let remove = if session.active_field_kind() == Some(FieldKind::File) {
        format!("  {REMOVE_FILE_SHORTCUT}:remove")
    } else {
        String::new()
    };

    format!("Tab:field  {field}{remove}  {advance}{back}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_heights() {
        let text = FormField::new("a", "A", FieldKind::Text);
        assert_eq!(field_height(&text, false), 3);
        assert_eq!(field_height(&text, true), 4);
        let file = FormField::new("f", "F", FieldKind::File);
        assert_eq!(field_height(&file, false), 6);
    }

    #[test]
    fn test_stack_fits_without_scroll() {
        let area = Rect::new(0, 5, 40, 20);
        let rects = stack_fields(area, &[3, 3, 5], 0);
        assert_eq!(rects[0], Some(Rect::new(0, 5, 40, 3)));
        assert_eq!(rects[1], Some(Rect::new(0, 8, 40, 3)));
        assert_eq!(rects[2], Some(Rect::new(0, 11, 40, 5)));
    }

    #[test]
    fn test_stack_scrolls_to_active() {
        let area = Rect::new(0, 0, 40, 6);
        let rects = stack_fields(area, &[3, 3, 3], 2);
        assert_eq!(rects[0], None);
        assert_eq!(rects[1], Some(Rect::new(0, 0, 40, 3)));
        assert_eq!(rects[2], Some(Rect::new(0, 3, 40, 3)));
    }

    #[test]
    fn test_fields_below_view_hidden() {
        let area = Rect::new(0, 0, 40, 4);
        let rects = stack_fields(area, &[3, 3], 0);
        assert!(rects[0].is_some());
        assert_eq!(rects[1], None);
    }
}
