/// Core validation trait that all validators implement.
///
/// Validators check user input (command-line arguments, configuration
/// values) before it reaches the engine. Each validator has its own error
/// type carrying a `user_message()` and converting into
/// [`crate::error::AppError`].
///
/// # Examples
///
/// ```
/// use matyou::validation::Validator;
///
/// struct NonEmpty;
/// impl Validator<str> for NonEmpty {
///     type Error = String;
///
///     fn validate(&self, input: &str) -> Result<(), Self::Error> {
///         if input.is_empty() {
///             Err("Input cannot be empty".to_string())
///         } else {
///             Ok(())
///         }
///     }
/// }
/// ```
pub trait Validator<T: ?Sized> {
    type Error;

    /// Validate the input and return Ok(()) if valid, or Err with validation error
    fn validate(&self, input: &T) -> Result<(), Self::Error>;
}
