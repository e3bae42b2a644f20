//! Grouping strategy definitions.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How posts map onto output directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupingStrategy {
    /// Every media file goes straight into the creator directory (default).
    #[default]
    None,
    /// One subdirectory per post, named after the post title.
    ByPost,
}

impl fmt::Display for GroupingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupingStrategy::None => write!(f, "none"),
            GroupingStrategy::ByPost => write!(f, "by-post"),
        }
    }
}

impl FromStr for GroupingStrategy {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "none" => Ok(GroupingStrategy::None),
            "by-post" => Ok(GroupingStrategy::ByPost),
            _ => Err(Error::Policy(format!(
                "unknown grouping strategy '{}', must be one of: none, by-post",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grouping() {
        assert_eq!("none".parse::<GroupingStrategy>().unwrap(), GroupingStrategy::None);
        assert_eq!("".parse::<GroupingStrategy>().unwrap(), GroupingStrategy::None);
        assert_eq!("By-Post".parse::<GroupingStrategy>().unwrap(), GroupingStrategy::ByPost);
    }

    #[test]
    fn test_parse_grouping_invalid() {
        assert!(matches!(
            "by-month".parse::<GroupingStrategy>(),
            Err(Error::Policy(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for strategy in [GroupingStrategy::None, GroupingStrategy::ByPost] {
            assert_eq!(strategy.to_string().parse::<GroupingStrategy>().unwrap(), strategy);
        }
    }
}
