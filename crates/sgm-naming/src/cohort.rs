//! Name templates for a cohort and its classes
//!
//! A cohort is addressed everywhere by its semester number; every role,
//! category and channel name is derived from it through these templates.
//! Derivation is pure: the remote store is consulted only at lookup time.

use crate::emoji::{STAFF_EMOJI, STUDENT_EMOJI};
use std::fmt;

/// Leading glyph of an active cohort's channels
pub const ACTIVE_GLYPH: &str = "📗";

/// Leading glyph channels are renamed to when the cohort retires
pub const RETIRED_GLYPH: &str = "📙";

/// A cohort, identified by its semester number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cohort(pub u32);

impl Cohort {
    /// Semester number
    #[inline]
    #[must_use]
    pub fn number(self) -> u32 {
        self.0
    }

    /// Cohort-wide student role, e.g. `5期生`
    #[must_use]
    pub fn student_role(self) -> String {
        format!("{}期生", self.0)
    }

    /// Cohort-wide staff role, e.g. `5期職員`
    #[must_use]
    pub fn staff_role(self) -> String {
        format!("{}期職員", self.0)
    }

    /// Per-class student role, e.g. `5-1生徒`
    #[must_use]
    pub fn class_student_role(self, class_index: u32) -> String {
        format!("{}-{}生徒", self.0, class_index)
    }

    /// Per-class staff role, e.g. `5-1職員`
    #[must_use]
    pub fn class_staff_role(self, class_index: u32) -> String {
        format!("{}-{}職員", self.0, class_index)
    }

    /// Staff category, e.g. `👨‍🏫 5期職員`
    #[must_use]
    pub fn staff_category(self) -> String {
        format!("{STAFF_EMOJI} {}期職員", self.0)
    }

    /// Student category, e.g. `👨‍🎓 5期生徒`
    #[must_use]
    pub fn student_category(self) -> String {
        format!("{STUDENT_EMOJI} {}期生徒", self.0)
    }

    /// Cohort-wide announcement channel, e.g. `📗📢｜5期連絡`
    #[must_use]
    pub fn announce_channel(self) -> String {
        format!("{ACTIVE_GLYPH}📢｜{}期連絡", self.0)
    }

    /// Per-class staff channel, e.g. `📗📝｜5-1教員`
    #[must_use]
    pub fn class_staff_channel(self, class_index: u32) -> String {
        format!("{ACTIVE_GLYPH}📝｜{}-{}教員", self.0, class_index)
    }

    /// Per-class chat channel, e.g. `📗💬｜5-1雑談`
    #[must_use]
    pub fn class_chat_channel(self, class_index: u32) -> String {
        format!("{ACTIVE_GLYPH}💬｜{}-{}雑談", self.0, class_index)
    }

    /// Per-class photo channel, e.g. `📗📸｜5-1写真`
    #[must_use]
    pub fn class_photo_channel(self, class_index: u32) -> String {
        format!("{ACTIVE_GLYPH}📸｜{}-{}写真", self.0, class_index)
    }

    /// Per-class announcement channel, e.g. `📗📢｜5-1連絡`
    #[must_use]
    pub fn class_announce_channel(self, class_index: u32) -> String {
        format!("{ACTIVE_GLYPH}📢｜{}-{}連絡", self.0, class_index)
    }

    /// The three per-class student channels in creation order
    #[must_use]
    pub fn class_student_channels(self, class_index: u32) -> [String; 3] {
        [
            self.class_chat_channel(class_index),
            self.class_photo_channel(class_index),
            self.class_announce_channel(class_index),
        ]
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}期", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_templates() {
        let cohort = Cohort(5);
        assert_eq!(cohort.student_role(), "5期生");
        assert_eq!(cohort.staff_role(), "5期職員");
        assert_eq!(cohort.class_student_role(2), "5-2生徒");
        assert_eq!(cohort.class_staff_role(2), "5-2職員");
    }

    #[test]
    fn category_templates_use_joined_emoji() {
        let cohort = Cohort(3);
        assert_eq!(
            cohort.staff_category(),
            "\u{1F468}\u{200D}\u{1F3EB} 3期職員"
        );
        assert_eq!(
            cohort.student_category(),
            "\u{1F468}\u{200D}\u{1F393} 3期生徒"
        );
    }

    #[test]
    fn channel_templates_lead_with_active_glyph() {
        let cohort = Cohort(5);
        assert_eq!(cohort.announce_channel(), "📗📢｜5期連絡");
        assert_eq!(cohort.class_staff_channel(1), "📗📝｜5-1教員");
        let [chat, photo, announce] = cohort.class_student_channels(1);
        assert_eq!(chat, "📗💬｜5-1雑談");
        assert_eq!(photo, "📗📸｜5-1写真");
        assert_eq!(announce, "📗📢｜5-1連絡");
    }
}
