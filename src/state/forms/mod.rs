//! Form domain layer
//!
//! Field value objects, validation, the declarative form definition and the
//! session that drives step navigation.

mod definition;
mod field;
mod session;
mod validation;

pub use definition::FormDefinition;
pub use field::{AttachedFile, FieldKind, FieldValue, FormField};
pub use session::{FormSession, StepChange};

#[cfg(test)]
pub use field::ChoiceOption;
#[cfg(test)]
pub(crate) use session::test_support;
