//! Environment-variable lookups with typed errors.

use thiserror::Error;

/// Errors raised while reading process environment variables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// The variable is set but its value is not valid unicode.
    #[error("Environment variable {0} is not valid unicode")]
    NotUnicode(String),

    /// The variable is set but holds only whitespace.
    #[error("Environment variable {0} is empty")]
    Empty(String),
}

/// Reads an optional environment variable, trimmed.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
///
/// Returns `Ok(None)` when the variable is unset, so callers can layer it over
/// file or default configuration. A present-but-blank value is an error rather
/// than a silent fallback.
pub fn get_env_var_opt(name: &str) -> Result<Option<String>, EnvError> {
    match std::env::var(name) {
        Ok(v) => {
            let v = v.trim();
            if v.is_empty() {
                Err(EnvError::Empty(name.to_string()))
            } else {
                Ok(Some(v.to_string()))
            }
        }
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(EnvError::NotUnicode(name.to_string())),
    }
}
