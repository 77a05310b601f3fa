//! Options controlling how messages are grouped.

use serde::{Deserialize, Serialize};

/// What to do with replies whose parent is not a top-level message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Keep them out of the flat view and report them in `orphans`
    #[default]
    Drop,
    /// Show them as top-level comments without replies
    Promote,
}

/// How to order messages that share a timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the relative input order (stable sort)
    #[default]
    InputOrder,
    /// Order by message id ascending
    MessageId,
}

/// Options for [`build_groups_with`](super::build_groups_with).
///
/// The default reproduces the plain [`build_groups`](super::build_groups)
/// behavior. Deserializes with missing fields filled from the default, so it
/// can sit inside a host application's config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingOptions {
    /// Handling of replies with a dangling parent
    pub orphans: OrphanPolicy,
    /// Ordering of messages with equal timestamps
    pub tie_break: TieBreak,
}

impl GroupingOptions {
    /// Options that surface every message, including orphaned replies.
    pub fn surface_orphans() -> Self {
        Self {
            orphans: OrphanPolicy::Promote,
            ..Self::default()
        }
    }

    /// Options whose output does not depend on input order.
    pub fn deterministic() -> Self {
        Self {
            tie_break: TieBreak::MessageId,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = GroupingOptions::default();
        assert_eq!(options.orphans, OrphanPolicy::Drop);
        assert_eq!(options.tie_break, TieBreak::InputOrder);
    }

    #[test]
    fn test_presets() {
        assert_eq!(GroupingOptions::surface_orphans().orphans, OrphanPolicy::Promote);
        assert_eq!(GroupingOptions::surface_orphans().tie_break, TieBreak::InputOrder);
        assert_eq!(GroupingOptions::deterministic().tie_break, TieBreak::MessageId);
        assert_eq!(GroupingOptions::deterministic().orphans, OrphanPolicy::Drop);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let options: GroupingOptions = serde_json::from_str(r#"{"orphans": "promote"}"#).unwrap();
        assert_eq!(options.orphans, OrphanPolicy::Promote);
        assert_eq!(options.tie_break, TieBreak::InputOrder);

        let options: GroupingOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, GroupingOptions::default());
    }
}
