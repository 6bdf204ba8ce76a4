//! Operator-configurable settings
//!
//! Loaded from a TOML file when one exists; every field has a default so a
//! missing file (or a partial one) still yields a working configuration.

use serde::Deserialize;
use sgm_directory::ActorId;
use sgm_registry::RegistryConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for the orchestrator and its collaborators
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Channel-name prefix operator commands are restricted to
    pub admin_channel: String,
    /// Guild-wide staff role required for operator commands
    pub staff_role: String,
    /// Marker role for members who have not picked a class yet
    pub unassigned_role: String,
    /// Alumni role granted by the retire workflow
    pub alumni_role: String,
    /// Name fragment of the channel staff menus are posted to
    pub staff_menu_channel: String,
    /// Name fragment of the channel class-selection menus are posted to
    pub student_menu_channel: String,
    /// Name fragment of the audit channel
    pub audit_channel: String,
    /// Path of the reaction-role snapshot file
    pub snapshot_path: PathBuf,
    /// Bounded wait before a destructive proposal expires, in seconds
    pub confirm_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            admin_channel: "botテスト場".to_string(),
            staff_role: "管理者テスト".to_string(),
            unassigned_role: "ロール未付与テスト".to_string(),
            alumni_role: "OB".to_string(),
            staff_menu_channel: "職員todoリスト".to_string(),
            student_menu_channel: "総合受付".to_string(),
            audit_channel: "管理bot".to_string(),
            snapshot_path: PathBuf::from("reaction_roles.json"),
            confirm_timeout_secs: 60,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file; an absent file yields the defaults
    ///
    /// # Errors
    /// Io failures other than absence, and TOML parse failures.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no settings file; using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Bounded confirmation wait as a duration
    #[inline]
    #[must_use]
    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }

    /// Registry configuration derived from these settings
    #[must_use]
    pub fn registry_config(&self, self_id: ActorId) -> RegistryConfig {
        RegistryConfig {
            self_id,
            unassigned_role: Some(self.unassigned_role.clone()),
            audit_channel: Some(self.audit_channel.clone()),
        }
    }
}

/// Failure loading the settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings io: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings parse: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_configuration() {
        let settings = Settings::default();
        assert_eq!(settings.admin_channel, "botテスト場");
        assert_eq!(settings.alumni_role, "OB");
        assert_eq!(settings.confirm_timeout_secs, 60);
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sgm.toml");
        std::fs::write(&path, "staff_role = \"職員\"\nconfirm_timeout_secs = 5\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.staff_role, "職員");
        assert_eq!(settings.confirm_timeout_secs, 5);
        assert_eq!(settings.alumni_role, "OB");
    }

    #[test]
    fn absent_file_is_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/sgm.toml")).unwrap();
        assert_eq!(settings.audit_channel, "管理bot");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sgm.toml");
        std::fs::write(&path, "staff_roel = \"typo\"\n").unwrap();
        assert!(Settings::load(&path).is_err());
    }
}
