//! Setting and argument validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_LOGIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{1,25}$").unwrap());
static RE_CLIENT_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9]{1,64}$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "CLIENT_ID" => {
            if !RE_CLIENT_ID.is_match(value) {
                return Err("must be a lowercase alphanumeric Twitch client ID".into());
            }
        }
        "POLL_INTERVAL_SECS" => validate_int_range(value, 10, 86_400)?,
        "NOTIFICATION_TIMEOUT_MS" => validate_int_range(value, 1_000, 600_000)?,
        "HTTP_TIMEOUT_SECS" => validate_int_range(value, 1, 300)?,
        "OPENER" => {
            if value.trim().is_empty() {
                return Err("must name a program".into());
            }
        }
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

/// Check that a handle looks like a Twitch login name.
pub fn validate_handle(handle: &str) -> Result<(), String> {
    if RE_LOGIN.is_match(handle) {
        Ok(())
    } else {
        Err(format!(
            "invalid handle {handle:?}: expected 1-25 letters, digits or underscores"
        ))
    }
}

fn validate_int_range(value: &str, min: u64, max: u64) -> Result<(), String> {
    let v: u64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "NOTIFY_ON_START")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_boolean() {
        assert!(validate_setting("NOTIFY_ON_START", "true").is_ok());
        assert!(validate_setting("NOTIFY_ON_START", "false").is_ok());
        assert!(validate_setting("NOTIFY_ON_START", "yes").is_err());
    }

    #[test]
    fn test_poll_interval_range() {
        assert!(validate_setting("POLL_INTERVAL_SECS", "120").is_ok());
        assert!(validate_setting("POLL_INTERVAL_SECS", "5").is_err());
        assert!(validate_setting("POLL_INTERVAL_SECS", "-1").is_err());
        assert!(validate_setting("POLL_INTERVAL_SECS", "soon").is_err());
    }

    #[test]
    fn test_client_id() {
        assert!(validate_setting("CLIENT_ID", "454q3qk5jh0rzgps78fnxrwc5u1i8t").is_ok());
        assert!(validate_setting("CLIENT_ID", "has space").is_err());
        assert!(validate_setting("CLIENT_ID", "").is_err());
    }

    #[test]
    fn test_handles() {
        assert!(validate_handle("some_streamer42").is_ok());
        assert!(validate_handle("").is_err());
        assert!(validate_handle("x'; rm -rf ~").is_err());
        assert!(validate_handle(&"a".repeat(26)).is_err());
    }
}
