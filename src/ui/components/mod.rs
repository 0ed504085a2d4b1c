//! Reusable UI components

mod button;
mod notice;

pub use button::{render_button, BUTTON_HEIGHT};
pub use notice::{render_notice, wrap_text};
