//! Application state module

mod banner;
mod debounce;
mod draft;
mod forms;
mod upload;

pub use banner::*;
pub use debounce::*;
pub use draft::*;
pub use forms::*;
pub use upload::*;

#[cfg(test)]
pub(crate) use forms::test_support;
