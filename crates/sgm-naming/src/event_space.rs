//! Name templates for ad-hoc event spaces

use std::fmt;

/// An ad-hoc event space, keyed by an arbitrary event name
///
/// Structurally a miniature cohort: one role, one category, two channels
/// (a forum-style log and a role-assignment channel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSpace {
    name: String,
}

impl EventSpace {
    /// Prefix of the role-assignment channel name
    pub const ASSIGN_PREFIX: &'static str = "ロール付与-";

    /// Prefix of the forum log channel name
    pub const LOG_PREFIX: &'static str = "ログ-";

    /// Event space for the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The raw event name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Event role, e.g. `🎯 文化祭`
    #[must_use]
    pub fn role_name(&self) -> String {
        format!("🎯 {}", self.name)
    }

    /// Event category carries the bare event name
    #[must_use]
    pub fn category_name(&self) -> String {
        self.name.clone()
    }

    /// Forum log channel, e.g. `ログ-文化祭`
    #[must_use]
    pub fn log_channel(&self) -> String {
        format!("{}{}", Self::LOG_PREFIX, self.name)
    }

    /// Role-assignment channel, e.g. `ロール付与-文化祭`
    #[must_use]
    pub fn assign_channel(&self) -> String {
        format!("{}{}", Self::ASSIGN_PREFIX, self.name)
    }

    /// Recover the event name from a role-assignment channel name
    #[must_use]
    pub fn from_assign_channel(channel_name: &str) -> Option<Self> {
        channel_name
            .strip_prefix(Self::ASSIGN_PREFIX)
            .map(Self::new)
    }
}

impl fmt::Display for EventSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates() {
        let event = EventSpace::new("文化祭");
        assert_eq!(event.role_name(), "🎯 文化祭");
        assert_eq!(event.category_name(), "文化祭");
        assert_eq!(event.log_channel(), "ログ-文化祭");
        assert_eq!(event.assign_channel(), "ロール付与-文化祭");
    }

    #[test]
    fn assign_channel_round_trip() {
        let event = EventSpace::from_assign_channel("ロール付与-合宿").unwrap();
        assert_eq!(event.name(), "合宿");
        assert!(EventSpace::from_assign_channel("ログ-合宿").is_none());
    }
}
