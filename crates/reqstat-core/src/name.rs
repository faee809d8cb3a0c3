//! Metric name rules.

use crate::error::{ReqstatError, Result};

/// Reject names the statsd line format cannot carry.
pub fn validate(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ReqstatError::InvalidMetricName("empty name".into()));
    }
    if name.starts_with('.') || name.ends_with('.') || name.contains("..") {
        return Err(ReqstatError::InvalidMetricName(format!(
            "{name:?} has an empty dot segment"
        )));
    }
    if name
        .chars()
        .any(|c| matches!(c, ':' | '|' | '@' | '#' | ',') || c.is_whitespace())
    {
        return Err(ReqstatError::InvalidMetricName(format!(
            "{name:?} contains a reserved character"
        )));
    }
    Ok(())
}

/// `prefix.suffix`, or just `suffix` when there is no prefix.
pub fn join(prefix: Option<&str>, suffix: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}.{suffix}"),
        _ => suffix.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_characters_rejected() {
        assert!(validate("myapp.users.id").is_ok());
        assert!(validate("").is_err());
        assert!(validate("a:b").is_err());
        assert!(validate("a b").is_err());
        assert!(validate("a..b").is_err());
        assert!(validate(".a").is_err());
    }

    #[test]
    fn join_with_and_without_prefix() {
        assert_eq!(join(Some("myapp"), "test"), "myapp.test");
        assert_eq!(join(Some(""), "test"), "test");
        assert_eq!(join(None, "test"), "test");
    }
}
