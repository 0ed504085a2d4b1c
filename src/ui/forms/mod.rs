//! Form rendering module
//!
//! This module contains UI components for rendering the form:
//! - `field_renderer`: Text, select and option-group fields
//! - `drop_zone`: File fields with upload prompt and preview
//! - `step_form`: The active step and its fields
//! - `success`: Confirmation panel after submission

mod drop_zone;
mod field_renderer;
mod step_form;
mod success;

pub use step_form::draw_step;
pub use success::draw_success;
