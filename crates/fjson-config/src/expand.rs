//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("FJSON_TEST_SIMPLE", "_build");
        }
        let result = expand_env("${FJSON_TEST_SIMPLE}", "build.html_dir").unwrap();
        assert_eq!(result, "_build");
        unsafe {
            std::env::remove_var("FJSON_TEST_SIMPLE");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FJSON_TEST_UNSET");
        }
        let result = expand_env("${FJSON_TEST_UNSET:-html}", "build.html_dir").unwrap();
        assert_eq!(result, "html");
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("FJSON_TEST_VERSION", "6.4");
        }
        let result = expand_env("_build/${FJSON_TEST_VERSION}/html", "build.html_dir").unwrap();
        assert_eq!(result, "_build/6.4/html");
        unsafe {
            std::env::remove_var("FJSON_TEST_VERSION");
        }
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FJSON_TEST_MISSING");
        }
        let err = expand_env("${FJSON_TEST_MISSING}", "build.meta_file").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("FJSON_TEST_MISSING"));
        assert!(err.to_string().contains("build.meta_file"));
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("$VAR/html", "build.html_dir").unwrap();
        assert_eq!(result, "$VAR/html");
    }
}
