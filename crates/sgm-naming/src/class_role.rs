//! Parsing class-role names back to their cohort
//!
//! Parent-role propagation needs the inverse of the class-role templates:
//! given `5-1生徒`, recover cohort 5 and the student kind.

use crate::cohort::Cohort;
use once_cell::sync::Lazy;
use regex::Regex;

static CLASS_ROLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)-(\d+)(生徒|職員)$").expect("class role pattern"));

/// Whether a class role is the student or staff variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassRoleKind {
    Student,
    Staff,
}

/// A parsed class role name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassRole {
    pub cohort: Cohort,
    pub class_index: u32,
    pub kind: ClassRoleKind,
}

impl ClassRole {
    /// Name of the cohort-wide parent role this class role propagates to
    #[must_use]
    pub fn parent_role_name(&self) -> String {
        match self.kind {
            ClassRoleKind::Student => self.cohort.student_role(),
            ClassRoleKind::Staff => self.cohort.staff_role(),
        }
    }
}

/// Parse a role name against the class-role templates
///
/// Returns `None` for anything that is not exactly `{n}-{i}生徒` or
/// `{n}-{i}職員`.
#[must_use]
pub fn parse_class_role(name: &str) -> Option<ClassRole> {
    let captures = CLASS_ROLE.captures(name)?;
    let cohort: u32 = captures[1].parse().ok()?;
    let class_index: u32 = captures[2].parse().ok()?;
    let kind = match &captures[3] {
        "生徒" => ClassRoleKind::Student,
        _ => ClassRoleKind::Staff,
    };
    Some(ClassRole {
        cohort: Cohort(cohort),
        class_index,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_student_and_staff() {
        let student = parse_class_role("5-1生徒").unwrap();
        assert_eq!(student.cohort, Cohort(5));
        assert_eq!(student.class_index, 1);
        assert_eq!(student.kind, ClassRoleKind::Student);
        assert_eq!(student.parent_role_name(), "5期生");

        let staff = parse_class_role("12-3職員").unwrap();
        assert_eq!(staff.cohort, Cohort(12));
        assert_eq!(staff.parent_role_name(), "12期職員");
    }

    #[test]
    fn rejects_non_class_names() {
        assert!(parse_class_role("5期生").is_none());
        assert!(parse_class_role("5-1教員").is_none());
        assert!(parse_class_role("x-1生徒").is_none());
        assert!(parse_class_role("5-1生徒です").is_none());
    }
}
