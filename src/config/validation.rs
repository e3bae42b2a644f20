//! Configuration validation logic.

use regex::Regex;
use url::Url;

use crate::config::loader::Config;
use crate::config::modes::GroupingStrategy;
use crate::error::{Error, Result};

/// Maximum creator id length.
const MAX_CREATOR_ID_LENGTH: usize = 100;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_cookie(&config.my_account.cookie)?;
    validate_user_agent(&config.my_account.user_agent)?;

    match config.targeted_creator.creator_id.as_deref() {
        Some(id) => {
            parse_creator_id(id)?;
        }
        None => {
            return Err(Error::MissingConfig(
                "creator_id (pass --creator or set targeted_creator.creator_id)".to_string(),
            ))
        }
    }

    config.options.grouping.parse::<GroupingStrategy>()?;

    if config.options.concurrency == 0 {
        return Err(Error::ConfigValidation {
            field: "concurrency".to_string(),
            message: "Concurrency must be at least 1".to_string(),
        });
    }

    let threshold = config.options.warning_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(Error::ConfigValidation {
            field: "warning_threshold".to_string(),
            message: format!("Threshold must be between 0 and 1 (got {})", threshold),
        });
    }

    Ok(())
}

/// Validate the session cookie.
pub fn validate_cookie(cookie: &str) -> Result<()> {
    if cookie.trim().is_empty() {
        return Err(Error::MissingConfig("cookie".to_string()));
    }

    let lower = cookie.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_cookie") {
        return Err(Error::ConfigValidation {
            field: "cookie".to_string(),
            message: "Cookie appears to be a placeholder. Copy the Cookie header from a logged-in browser session."
                .to_string(),
        });
    }

    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.trim().is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }

    Ok(())
}

/// Extract a creator id from a vanity name or a creator page URL.
///
/// Accepts `name`, `https://www.patreon.com/name` and
/// `https://www.patreon.com/c/name`.
pub fn parse_creator_id(input: &str) -> Result<String> {
    let input = input.trim();

    let candidate = if input.starts_with("http://") || input.starts_with("https://") {
        let url = Url::parse(input)?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            ["c", name, ..] => name.to_string(),
            [name, ..] => name.to_string(),
            [] => {
                return Err(Error::ConfigValidation {
                    field: "creator_id".to_string(),
                    message: format!("Could not extract creator from URL: {}", input),
                })
            }
        }
    } else {
        input.trim_start_matches('@').to_string()
    };

    let pattern = Regex::new(&format!(r"^[A-Za-z0-9_-]{{1,{}}}$", MAX_CREATOR_ID_LENGTH))
        .map_err(|e| Error::Config(e.to_string()))?;

    if !pattern.is_match(&candidate) {
        return Err(Error::ConfigValidation {
            field: "creator_id".to_string(),
            message: format!(
                "Invalid creator id '{}'. Only alphanumeric, hyphens, and underscores allowed.",
                input
            ),
        });
    }

    let lower = candidate.to_lowercase();
    if lower == "replaceme" || lower == "creator" {
        return Err(Error::ConfigValidation {
            field: "creator_id".to_string(),
            message: format!(
                "Creator id '{}' appears to be a placeholder. Please provide an actual creator.",
                candidate
            ),
        });
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.my_account.cookie = "session_id=abcdef".to_string();
        config.targeted_creator.creator_id = Some("somecreator".to_string());
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_cookie() {
        let mut config = valid_config();
        config.my_account.cookie = "  ".to_string();
        assert!(matches!(validate_config(&config), Err(Error::MissingConfig(_))));
    }

    #[test]
    fn test_placeholder_cookie() {
        assert!(validate_cookie("session_id=REPLACEME").is_err());
    }

    #[test]
    fn test_missing_creator() {
        let mut config = valid_config();
        config.targeted_creator.creator_id = None;
        assert!(matches!(validate_config(&config), Err(Error::MissingConfig(_))));
    }

    #[test]
    fn test_invalid_grouping_is_policy_error() {
        let mut config = valid_config();
        config.options.grouping = "by-year".to_string();
        assert!(matches!(validate_config(&config), Err(Error::Policy(_))));
    }

    #[test]
    fn test_invalid_concurrency_and_threshold() {
        let mut config = valid_config();
        config.options.concurrency = 0;
        assert!(validate_config(&config).is_err());

        let mut config = valid_config();
        config.options.warning_threshold = 1.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_parse_creator_id_direct() {
        assert_eq!(parse_creator_id("somecreator").unwrap(), "somecreator");
        assert_eq!(parse_creator_id(" @some_creator-2 ").unwrap(), "some_creator-2");
    }

    #[test]
    fn test_parse_creator_id_url() {
        assert_eq!(
            parse_creator_id("https://www.patreon.com/somecreator").unwrap(),
            "somecreator"
        );
        assert_eq!(
            parse_creator_id("https://www.patreon.com/c/somecreator/posts").unwrap(),
            "somecreator"
        );
    }

    #[test]
    fn test_parse_creator_id_invalid() {
        assert!(parse_creator_id("").is_err());
        assert!(parse_creator_id("has space").is_err());
        assert!(parse_creator_id("https://www.patreon.com/").is_err());
        assert!(parse_creator_id("replaceme").is_err());
        assert!(parse_creator_id(&"a".repeat(101)).is_err());
    }
}
