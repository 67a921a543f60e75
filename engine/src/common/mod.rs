pub mod errors;

pub use errors::{ErrorContext, ProcessError, ThemeError};
