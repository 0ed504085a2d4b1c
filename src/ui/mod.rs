//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;

pub use layout::FormLayout;

use crate::app::{App, SubmissionState};
use components::render_notice;
use ratatui::Frame;
use std::time::Instant;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();

    if app.submission == SubmissionState::Succeeded {
        forms::draw_success(frame, area);
        return;
    }

    let areas = FormLayout::compute(area, app);

    layout::draw_header(frame, areas.header, app);

    if let (Some(notice_area), Some(notice)) = (areas.notice, &app.notice) {
        render_notice(frame, notice_area, notice);
    }

    forms::draw_step(frame, &areas, app, now);
    layout::draw_navigation(frame, &areas, app);

    // Draw status bar
    layout::draw_status_bar(frame, areas.status, app);
}
