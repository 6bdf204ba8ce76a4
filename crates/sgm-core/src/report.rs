//! Consolidated workflow reports
//!
//! Every workflow ends with exactly one operator-visible message. Remote
//! failures are never swallowed: each failed object appears by name with
//! the error text.

use sgm_naming::Cohort;
use std::fmt;

/// Stages of the cohort create workflow, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Roles,
    Categories,
    Channels,
    Menus,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: [Stage; 4] = [Stage::Roles, Stage::Categories, Stage::Channels, Stage::Menus];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Roles => "ロール",
            Stage::Categories => "カテゴリ",
            Stage::Channels => "チャンネル",
            Stage::Menus => "リアクションロール",
        };
        f.write_str(label)
    }
}

/// Outcome of the sequential cohort create workflow
///
/// A stage failure halts the workflow; completed stages stay in place (no
/// automatic compensation), which the rendered report makes explicit so the
/// operator can resolve the inconsistency window manually.
#[derive(Debug)]
pub struct CohortCreateReport {
    pub cohort: Cohort,
    pub class_count: u32,
    pub completed: Vec<Stage>,
    pub failed: Option<(Stage, String)>,
}

impl CohortCreateReport {
    /// Whether every stage completed
    #[inline]
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.failed.is_none()
    }
}

impl fmt::Display for CohortCreateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.succeeded() {
            writeln!(f, "✅ {}の設定が完了しました：", self.cohort)?;
        } else {
            writeln!(f, "❌ {}の設定は途中で失敗しました：", self.cohort)?;
        }
        for stage in Stage::ALL {
            if self.completed.contains(&stage) {
                writeln!(f, "  ✅ {stage}")?;
            } else if let Some((failed_stage, error)) = &self.failed {
                if *failed_stage == stage {
                    writeln!(f, "  ❌ {stage}: {error}")?;
                } else {
                    writeln!(f, "  ⏭ {stage}（未実行）")?;
                }
            }
        }
        if !self.succeeded() {
            write!(f, "完了済みの項目はそのまま残っています。手動で整理してください。")?;
        }
        Ok(())
    }
}

/// Outcome of an independent-batch workflow (retire, delete)
///
/// Objects are attempted independently; a failure is recorded and the batch
/// continues.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub title: String,
    pub successes: Vec<String>,
    pub failures: Vec<(String, String)>,
}

impl BatchReport {
    /// Empty report with a title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Record a per-object success
    pub fn success(&mut self, label: impl Into<String>) {
        self.successes.push(label.into());
    }

    /// Record a per-object failure with its error text
    pub fn failure(&mut self, label: impl Into<String>, error: impl fmt::Display) {
        self.failures.push((label.into(), error.to_string()));
    }

    /// Whether no object failed
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for label in &self.successes {
            writeln!(f, "  ✅ {label}")?;
        }
        for (label, error) in &self.failures {
            writeln!(f, "  ❌ {label}: {error}")?;
        }
        if self.successes.is_empty() && self.failures.is_empty() {
            writeln!(f, "  （対象はありませんでした）")?;
        }
        Ok(())
    }
}
