//! Configuration access port trait.

use crate::domain::error::EngineError;

/// Read access to sectioned key/value configuration.
///
/// Typed getters return `Ok(None)` for a missing key and `ConfigInvalid`
/// for a value that is present but does not parse.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, EngineError> {
        parse_value(self.get_string(section, key), section, key, "a number")
    }

    fn get_u64(&self, section: &str, key: &str) -> Result<Option<u64>, EngineError> {
        parse_value(self.get_string(section, key), section, key, "a non-negative integer")
    }
}

fn parse_value<T: std::str::FromStr>(
    raw: Option<String>,
    section: &str,
    key: &str,
    expected: &str,
) -> Result<Option<T>, EngineError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| EngineError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("expected {}, got '{}'", expected, trimmed),
        })
}
