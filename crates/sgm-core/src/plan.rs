//! Pre-execution deletion plans
//!
//! Destructive workflows first materialize the full list of objects they
//! would remove, render it for the operator, and only then engage the
//! confirmation gate.

use sgm_directory::{Category, Channel, ChannelId, MessageId, Role};
use std::fmt;

/// A reaction-menu message slated for deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuMessageRef {
    pub channel: ChannelId,
    pub channel_name: String,
    pub message: MessageId,
}

/// Everything one destructive workflow intends to remove
#[derive(Debug, Default)]
pub struct DeletionPlan {
    pub categories: Vec<Category>,
    pub channels: Vec<Channel>,
    pub roles: Vec<Role>,
    pub messages: Vec<MenuMessageRef>,
}

impl DeletionPlan {
    /// Whether the plan would remove nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.channels.is_empty()
            && self.roles.is_empty()
            && self.messages.is_empty()
    }

    /// Total number of objects in the plan
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len() + self.channels.len() + self.roles.len() + self.messages.len()
    }
}

impl fmt::Display for DeletionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "以下の削除を実行します：")?;
        if !self.categories.is_empty() {
            writeln!(f, "\n📁 カテゴリ")?;
            for category in &self.categories {
                writeln!(f, "  └ {}", category.name)?;
            }
        }
        if !self.channels.is_empty() {
            writeln!(f, "\n💬 チャンネル")?;
            for channel in &self.channels {
                writeln!(f, "  └ {}", channel.name)?;
            }
        }
        if !self.roles.is_empty() {
            writeln!(f, "\n👥 ロール")?;
            for role in &self.roles {
                writeln!(f, "  └ {}", role.name)?;
            }
        }
        if !self.messages.is_empty() {
            writeln!(f, "\n🎯 リアクションロールメッセージ")?;
            for message in &self.messages {
                writeln!(f, "  └ {}のメッセージ", message.channel_name)?;
            }
        }
        write!(f, "\n⚠️ この操作は取り消せません。実行してよろしいですか？")
    }
}
