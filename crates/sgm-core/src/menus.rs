//! Reaction-menu construction: bindings and message text
//!
//! Two menus per cohort: a staff menu in the staff menu channel and a
//! class-selection menu in the student menu channel. Trigger emoji are the
//! digit keycaps of the class indices; bindings are declared in class
//! order.

use sgm_directory::Role;
use sgm_naming::{keycap, Cohort};
use sgm_registry::RoleBinding;
use std::fmt::Write as _;

/// Bindings for the class-selection menu: one per class student role
#[must_use]
pub(crate) fn class_selection_bindings(roles: &[(u32, Role)]) -> Vec<RoleBinding> {
    roles
        .iter()
        .map(|(class_index, role)| RoleBinding::new(role, keycap(*class_index)))
        .collect()
}

/// Bindings for the staff menu: one per class staff role
#[must_use]
pub(crate) fn staff_bindings(roles: &[(u32, Role)]) -> Vec<RoleBinding> {
    class_selection_bindings(roles)
}

/// Text of the class-selection menu, mentioning the unassigned marker role
#[must_use]
pub(crate) fn render_class_menu(
    cohort: Cohort,
    unassigned: &Role,
    bindings: &[RoleBinding],
) -> String {
    let mut content = format!("## {}期のクラス選択\n", cohort.number());
    let _ = writeln!(
        content,
        "<@&{}> 以下のリアクションをクリックして、あなたのクラスを選択してください：\n",
        unassigned.id
    );
    append_binding_lines(&mut content, bindings);
    content
}

/// Text of the staff menu, mentioning the guild staff role
#[must_use]
pub(crate) fn render_staff_menu(
    cohort: Cohort,
    staff_role: &Role,
    bindings: &[RoleBinding],
) -> String {
    let mut content = format!(
        "## <@&{}> 各位。{}期のロールを選択してください。\n",
        staff_role.id,
        cohort.number()
    );
    content.push_str("以下のリアクションをクリックして、あなたの担当クラスを選択してください：\n\n");
    append_binding_lines(&mut content, bindings);
    content
}

fn append_binding_lines(content: &mut String, bindings: &[RoleBinding]) {
    for binding in bindings {
        let _ = writeln!(content, "{} - {}", binding.emoji, binding.role_name);
    }
}
