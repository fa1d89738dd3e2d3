//! Path expansion for configuration values.
//!
//! Supports:
//! - `~` / `~/...` - expands to the home directory
//! - `${VAR}` and `$VAR` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand `~` and environment variable references in a string.
///
/// Variables are resolved through `lookup` rather than the process environment
/// so that configuration can be built from an injected source.
///
/// Returns the original string unchanged if no `~` or `$` is present.
pub(crate) fn expand_path<F>(value: &str, field: &str, lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Fast path: no expansion needed
    if !value.contains('$') && !value.starts_with('~') {
        return Ok(value.to_owned());
    }

    shellexpand::full_with_context(
        value,
        || lookup("HOME"),
        |var| -> Result<Option<String>, UnsetVar> {
            lookup(var).map(Some).ok_or(UnsetVar)
        },
    )
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.var_name),
    })
}

/// Error returned when an environment variable lookup fails.
#[derive(Debug)]
struct UnsetVar;
