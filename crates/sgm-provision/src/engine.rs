//! The provisioning engine

use crate::error::ProvisionError;
use sgm_directory::{
    Category, CategorySpec, Channel, ChannelSpec, Directory, EntityKind, PermissionOverwrite,
    Principal, Role, RoleColor, RoleSpec,
};
use sgm_naming::{Cohort, EventSpace, NameResolver};
use std::sync::Arc;

/// Objects created for one event space, in creation order
#[derive(Debug, Clone)]
pub struct EventSpaceObjects {
    pub role: Role,
    pub category: Category,
    pub log_channel: Channel,
    pub assign_channel: Channel,
}

/// Executes ordered creation sequences against the remote directory
///
/// All mutations within one call are issued sequentially; ordering (role
/// before category before channel) is a correctness requirement because
/// later objects reference earlier ones in permission overwrites.
pub struct Engine {
    directory: Arc<dyn Directory>,
}

impl Engine {
    /// Engine over the given directory
    #[must_use]
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }

    /// Create the guild-wide staff and alumni roles
    ///
    /// These are one-time prerequisites: the staff role gates every
    /// operator command and the alumni role is granted by the retire
    /// workflow.
    ///
    /// # Errors
    /// `AlreadyExists` if either role already resolves.
    pub async fn create_base_roles(
        &self,
        staff_role_name: &str,
        alumni_role_name: &str,
    ) -> Result<Vec<Role>, ProvisionError> {
        for name in [staff_role_name, alumni_role_name] {
            if NameResolver::role(self.directory.as_ref(), name)
                .await?
                .is_some()
            {
                return Err(ProvisionError::already_exists(EntityKind::Role, name));
            }
        }

        let staff = self
            .directory
            .create_role(
                RoleSpec::new(staff_role_name)
                    .color(RoleColor::Red)
                    .hoisted(),
            )
            .await?;
        let alumni = self
            .directory
            .create_role(RoleSpec::new(alumni_role_name).color(RoleColor::Blue))
            .await?;
        tracing::info!(staff = %staff.name, alumni = %alumni.name, "created base roles");
        Ok(vec![staff, alumni])
    }

    /// Create the cohort-wide and per-class roles for a cohort
    ///
    /// Fan-out for `class_count = k`: the cohort student and staff roles
    /// plus `k` class student roles (hoisted) and `k` class staff roles,
    /// `2 + 2k` in total.
    ///
    /// # Errors
    /// `AlreadyExists` if either cohort-wide role already resolves.
    pub async fn create_cohort_roles(
        &self,
        cohort: Cohort,
        class_count: u32,
    ) -> Result<Vec<Role>, ProvisionError> {
        for name in [cohort.student_role(), cohort.staff_role()] {
            if NameResolver::role(self.directory.as_ref(), &name)
                .await?
                .is_some()
            {
                return Err(ProvisionError::already_exists(EntityKind::Role, name));
            }
        }

        let mut created = Vec::with_capacity(2 + 2 * class_count as usize);
        created.push(
            self.directory
                .create_role(RoleSpec::new(cohort.student_role()).color(RoleColor::Blue))
                .await?,
        );
        created.push(
            self.directory
                .create_role(RoleSpec::new(cohort.staff_role()).color(RoleColor::Green))
                .await?,
        );
        for class_index in 1..=class_count {
            created.push(
                self.directory
                    .create_role(
                        RoleSpec::new(cohort.class_student_role(class_index))
                            .color(RoleColor::Blue)
                            .hoisted(),
                    )
                    .await?,
            );
            created.push(
                self.directory
                    .create_role(
                        RoleSpec::new(cohort.class_staff_role(class_index))
                            .color(RoleColor::Green),
                    )
                    .await?,
            );
        }
        tracing::info!(%cohort, count = created.len(), "created cohort roles");
        Ok(created)
    }

    /// Create the staff and student categories for a cohort
    ///
    /// The staff category is hidden from the everyone principal and visible
    /// only to the cohort staff role, so the staff role must already exist.
    ///
    /// # Errors
    /// - `AlreadyExists` if either category already resolves (either
    ///   normalization form)
    /// - `MissingDependency` if the cohort staff role does not resolve
    pub async fn create_cohort_categories(
        &self,
        cohort: Cohort,
    ) -> Result<Vec<Category>, ProvisionError> {
        for name in [cohort.staff_category(), cohort.student_category()] {
            if NameResolver::category(self.directory.as_ref(), &name)
                .await?
                .is_some()
            {
                return Err(ProvisionError::already_exists(EntityKind::Category, name));
            }
        }
        let staff_role = NameResolver::role(self.directory.as_ref(), &cohort.staff_role())
            .await?
            .ok_or_else(|| {
                ProvisionError::missing(cohort.staff_role(), cohort.staff_category())
            })?;

        let mut created = Vec::with_capacity(2);
        created.push(
            self.directory
                .create_category(CategorySpec::new(cohort.staff_category()).overwrites(vec![
                    PermissionOverwrite::deny_view(Principal::Everyone),
                    PermissionOverwrite::allow_view(Principal::Role(staff_role.id)),
                ]))
                .await?,
        );
        created.push(
            self.directory
                .create_category(CategorySpec::new(cohort.student_category()))
                .await?,
        );
        tracing::info!(%cohort, "created cohort categories");
        Ok(created)
    }

    /// Create the channels for a cohort
    ///
    /// Fan-out for `class_count = k`: one cohort-wide announcement channel,
    /// `k` staff channels and `3k` student channels. Every student-facing
    /// channel denies view to the everyone principal and grants it to
    /// exactly the roles of its scope; the three student channels of one
    /// class share a single overwrite set.
    ///
    /// # Errors
    /// `MissingDependency` if a category, a cohort role, or a class student
    /// role does not resolve.
    pub async fn create_cohort_channels(
        &self,
        cohort: Cohort,
        class_count: u32,
    ) -> Result<Vec<Channel>, ProvisionError> {
        let directory = self.directory.as_ref();
        let staff_category = NameResolver::category(directory, &cohort.staff_category())
            .await?
            .ok_or_else(|| {
                ProvisionError::missing(cohort.staff_category(), "cohort channels")
            })?;
        let student_category = NameResolver::category(directory, &cohort.student_category())
            .await?
            .ok_or_else(|| {
                ProvisionError::missing(cohort.student_category(), "cohort channels")
            })?;
        let student_role = NameResolver::role(directory, &cohort.student_role())
            .await?
            .ok_or_else(|| ProvisionError::missing(cohort.student_role(), "cohort channels"))?;
        let staff_role = NameResolver::role(directory, &cohort.staff_role())
            .await?
            .ok_or_else(|| ProvisionError::missing(cohort.staff_role(), "cohort channels"))?;

        let mut created = Vec::new();
        created.push(
            self.directory
                .create_channel(
                    ChannelSpec::text(cohort.announce_channel())
                        .in_category(student_category.id)
                        .overwrites(vec![
                            PermissionOverwrite::deny_view(Principal::Everyone),
                            PermissionOverwrite::allow_view(Principal::Role(student_role.id)),
                            PermissionOverwrite::allow_view(Principal::Role(staff_role.id)),
                        ]),
                )
                .await?,
        );

        for class_index in 1..=class_count {
            created.push(
                self.directory
                    .create_channel(
                        ChannelSpec::text(cohort.class_staff_channel(class_index))
                            .in_category(staff_category.id),
                    )
                    .await?,
            );
        }

        for class_index in 1..=class_count {
            let class_role_name = cohort.class_student_role(class_index);
            let class_role = NameResolver::role(directory, &class_role_name)
                .await?
                .ok_or_else(|| ProvisionError::missing(class_role_name, "class channels"))?;
            // One overwrite set shared by the class's three channels.
            let overwrites = vec![
                PermissionOverwrite::deny_view(Principal::Everyone),
                PermissionOverwrite::allow_view_and_send(Principal::Role(class_role.id)),
                PermissionOverwrite::allow_view_and_send(Principal::Role(staff_role.id)),
            ];
            for name in cohort.class_student_channels(class_index) {
                created.push(
                    self.directory
                        .create_channel(
                            ChannelSpec::text(name)
                                .in_category(student_category.id)
                                .overwrites(overwrites.clone()),
                        )
                        .await?,
                );
            }
        }
        tracing::info!(%cohort, count = created.len(), "created cohort channels");
        Ok(created)
    }

    /// Create an event space: role, hidden category, log forum and
    /// role-assignment channel
    ///
    /// # Errors
    /// `AlreadyExists` if the event role or category already resolves.
    pub async fn create_event_space(
        &self,
        event: &EventSpace,
    ) -> Result<EventSpaceObjects, ProvisionError> {
        let directory = self.directory.as_ref();
        if NameResolver::role(directory, &event.role_name())
            .await?
            .is_some()
        {
            return Err(ProvisionError::already_exists(
                EntityKind::Role,
                event.role_name(),
            ));
        }
        if NameResolver::category(directory, &event.category_name())
            .await?
            .is_some()
        {
            return Err(ProvisionError::already_exists(
                EntityKind::Category,
                event.category_name(),
            ));
        }

        let role = self
            .directory
            .create_role(
                RoleSpec::new(event.role_name())
                    .color(RoleColor::Purple)
                    .hoisted(),
            )
            .await?;
        let category = self
            .directory
            .create_category(CategorySpec::new(event.category_name()).overwrites(vec![
                PermissionOverwrite::deny_view(Principal::Everyone),
                PermissionOverwrite::allow_view(Principal::Role(role.id)),
            ]))
            .await?;
        let log_channel = self
            .directory
            .create_channel(ChannelSpec::forum(event.log_channel()).in_category(category.id))
            .await?;
        let assign_channel = self
            .directory
            .create_channel(ChannelSpec::text(event.assign_channel()).in_category(category.id))
            .await?;
        tracing::info!(event = %event.name(), "created event space");
        Ok(EventSpaceObjects {
            role,
            category,
            log_channel,
            assign_channel,
        })
    }
}
