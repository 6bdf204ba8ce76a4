//! Cohort and event lifecycle workflows

use crate::error::WorkflowError;
use crate::menus;
use crate::plan::{DeletionPlan, MenuMessageRef};
use crate::report::{BatchReport, CohortCreateReport, Stage};
use crate::settings::Settings;
use sgm_confirm::{Confirmation, ConfirmationSignal, Outcome};
use sgm_directory::{ActorId, Directory, Role};
use sgm_naming::{Cohort, EventSpace, NameResolver, ACTIVE_GLYPH, RETIRED_GLYPH};
use sgm_provision::{Engine, EventSpaceObjects, ProvisionError};
use sgm_registry::{ReactionMenu, Registry};
use std::collections::HashSet;
use std::sync::Arc;

/// Recent-message window scanned per menu channel when collecting menu
/// messages for deletion
const MENU_SCAN_LIMIT: usize = 100;

/// Highest class index probed when collecting class roles for deletion
const MAX_PROBED_CLASSES: u32 = 9;

/// Composes the engine, registry and confirmation gate into workflows
///
/// Holds direct references to its collaborators, resolved at startup. All
/// directory mutations within one workflow are issued sequentially; only
/// the proposing workflow blocks on a confirmation gate.
pub struct Orchestrator {
    directory: Arc<dyn Directory>,
    engine: Engine,
    registry: Arc<Registry>,
    settings: Settings,
}

impl Orchestrator {
    /// Orchestrator over the given directory and registry
    #[must_use]
    pub fn new(directory: Arc<dyn Directory>, registry: Arc<Registry>, settings: Settings) -> Self {
        let engine = Engine::new(directory.clone());
        Self {
            directory,
            engine,
            registry,
            settings,
        }
    }

    /// The active settings
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The reaction-role registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Create the guild-wide staff and alumni roles
    ///
    /// # Errors
    /// `AlreadyExists` when either role already resolves.
    pub async fn create_base_roles(&self) -> Result<Vec<Role>, WorkflowError> {
        Ok(self
            .engine
            .create_base_roles(&self.settings.staff_role, &self.settings.alumni_role)
            .await?)
    }

    /// The full cohort create workflow
    ///
    /// Stages run strictly sequentially: roles, categories, channels,
    /// reaction menus. A stage failure halts the workflow; completed stages
    /// are left in place and the report says which ran and which did not.
    pub async fn create_cohort(&self, cohort: Cohort, class_count: u32) -> CohortCreateReport {
        tracing::info!(%cohort, class_count, "cohort create workflow started");
        let mut completed = Vec::new();

        if let Err(err) = self.engine.create_cohort_roles(cohort, class_count).await {
            return self.halted(cohort, class_count, completed, Stage::Roles, &err);
        }
        completed.push(Stage::Roles);

        if let Err(err) = self.engine.create_cohort_categories(cohort).await {
            return self.halted(cohort, class_count, completed, Stage::Categories, &err);
        }
        completed.push(Stage::Categories);

        if let Err(err) = self.engine.create_cohort_channels(cohort, class_count).await {
            return self.halted(cohort, class_count, completed, Stage::Channels, &err);
        }
        completed.push(Stage::Channels);

        if let Err(err) = self.create_cohort_menus(cohort, class_count).await {
            return self.halted(cohort, class_count, completed, Stage::Menus, &err);
        }
        completed.push(Stage::Menus);

        tracing::info!(%cohort, "cohort create workflow completed");
        CohortCreateReport {
            cohort,
            class_count,
            completed,
            failed: None,
        }
    }

    fn halted(
        &self,
        cohort: Cohort,
        class_count: u32,
        completed: Vec<Stage>,
        stage: Stage,
        error: &dyn std::fmt::Display,
    ) -> CohortCreateReport {
        tracing::error!(%cohort, %stage, %error, "cohort create workflow halted");
        CohortCreateReport {
            cohort,
            class_count,
            completed,
            failed: Some((stage, error.to_string())),
        }
    }

    /// Post the staff and class-selection reaction menus for a cohort
    ///
    /// The staff menu collects the class staff roles that resolve; the
    /// class-selection menu requires every class student role. Both menus
    /// are posted to their configured channels, located by name fragment.
    ///
    /// # Errors
    /// `NotFound` for a missing menu channel or mentioned role,
    /// `MissingDependency` for missing cohort or class roles.
    pub async fn create_cohort_menus(
        &self,
        cohort: Cohort,
        class_count: u32,
    ) -> Result<Vec<ReactionMenu>, WorkflowError> {
        let directory = self.directory.as_ref();
        for name in [cohort.student_role(), cohort.staff_role()] {
            if NameResolver::role(directory, &name).await?.is_none() {
                return Err(WorkflowError::Provision(ProvisionError::MissingDependency {
                    name,
                    required_for: "リアクションロール".to_string(),
                }));
            }
        }

        let staff_channel =
            NameResolver::channel_containing(directory, &self.settings.staff_menu_channel)
                .await?
                .ok_or_else(|| {
                    WorkflowError::not_found(format!(
                        "職員用リアクションロールチャンネル（{}）",
                        self.settings.staff_menu_channel
                    ))
                })?;
        let guild_staff_role = NameResolver::role(directory, &self.settings.staff_role)
            .await?
            .ok_or_else(|| WorkflowError::not_found(self.settings.staff_role.clone()))?;
        let mut staff_roles = Vec::new();
        for class_index in 1..=class_count {
            if let Some(role) =
                NameResolver::role(directory, &cohort.class_staff_role(class_index)).await?
            {
                staff_roles.push((class_index, role));
            }
        }
        let staff_bindings = menus::staff_bindings(&staff_roles);
        let staff_content = menus::render_staff_menu(cohort, &guild_staff_role, &staff_bindings);
        let staff_menu = self
            .registry
            .create_menu(
                staff_channel.id,
                cohort.number(),
                staff_bindings,
                &staff_content,
            )
            .await?;

        let student_channel =
            NameResolver::channel_containing(directory, &self.settings.student_menu_channel)
                .await?
                .ok_or_else(|| {
                    WorkflowError::not_found(format!(
                        "生徒用リアクションロールチャンネル（{}）",
                        self.settings.student_menu_channel
                    ))
                })?;
        let unassigned = NameResolver::role(directory, &self.settings.unassigned_role)
            .await?
            .ok_or_else(|| WorkflowError::not_found(self.settings.unassigned_role.clone()))?;
        let mut class_roles = Vec::new();
        for class_index in 1..=class_count {
            let name = cohort.class_student_role(class_index);
            let role = NameResolver::role(directory, &name).await?.ok_or_else(|| {
                WorkflowError::Provision(ProvisionError::MissingDependency {
                    name,
                    required_for: "クラス選択メニュー".to_string(),
                })
            })?;
            class_roles.push((class_index, role));
        }
        let class_bindings = menus::class_selection_bindings(&class_roles);
        let class_content = menus::render_class_menu(cohort, &unassigned, &class_bindings);
        let class_menu = self
            .registry
            .create_menu(
                student_channel.id,
                cohort.number(),
                class_bindings,
                &class_content,
            )
            .await?;

        Ok(vec![staff_menu, class_menu])
    }

    /// The retire workflow: alumni grants plus channel glyph renames
    ///
    /// Grants the alumni role to every holder of the cohort student role
    /// (already-alumni members are skipped) and renames each channel that
    /// starts with the active glyph and contains the cohort number, swapping
    /// the leading glyph to the retired form. Grant and rename failures are
    /// isolated per object; the batch continues.
    ///
    /// # Errors
    /// `NotFound` when the cohort student role or the alumni role does not
    /// resolve, `AlreadyRetired` for the first-cohort guard.
    pub async fn retire_cohort(&self, cohort: Cohort) -> Result<BatchReport, WorkflowError> {
        let directory = self.directory.as_ref();
        let student_role = NameResolver::role(directory, &cohort.student_role())
            .await?
            .ok_or_else(|| WorkflowError::not_found(cohort.student_role()))?;
        let alumni = NameResolver::role(directory, &self.settings.alumni_role)
            .await?
            .ok_or_else(|| WorkflowError::not_found(self.settings.alumni_role.clone()))?;

        let members = directory.members_with_role(student_role.id).await?;
        if cohort.number() == 1 {
            // Alumni already present among first-cohort members means the
            // workflow ran before.
            for member in &members {
                if directory.member_roles(*member).await?.contains(&alumni.id) {
                    return Err(WorkflowError::AlreadyRetired { cohort: 1 });
                }
            }
        }

        tracing::info!(%cohort, members = members.len(), "retire workflow started");
        let mut report = BatchReport::new(format!("{cohort}の引退処理結果："));
        for member in members {
            let name = directory
                .member_name(member)
                .await
                .unwrap_or_else(|_| member.to_string());
            let held = match directory.member_roles(member).await {
                Ok(held) => held,
                Err(err) => {
                    report.failure(format!("OB付与: {name}"), err);
                    continue;
                }
            };
            if held.contains(&alumni.id) {
                continue;
            }
            match directory.add_member_role(member, alumni.id).await {
                Ok(()) => report.success(format!("OB付与: {name}")),
                Err(err) => report.failure(format!("OB付与: {name}"), err),
            }
        }

        // Cohort digits match by containment, so cohort 1 also catches
        // names like 10-1. See DESIGN.md.
        let digits = cohort.number().to_string();
        for channel in directory.channels().await? {
            if !channel.name.starts_with(ACTIVE_GLYPH) || !channel.name.contains(&digits) {
                continue;
            }
            let renamed = channel.name.replacen(ACTIVE_GLYPH, RETIRED_GLYPH, 1);
            match directory.rename_channel(channel.id, &renamed).await {
                Ok(()) => report.success(format!("名称変更: {} → {renamed}", channel.name)),
                Err(err) => report.failure(format!("名称変更: {}", channel.name), err),
            }
        }
        Ok(report)
    }

    /// Resolve everything a semester-range deletion would remove
    ///
    /// The range is inclusive and normalized (a reversed range is swapped).
    /// Menu messages are collected from a bounded recent-message window of
    /// the configured menu channels; channels match by cohort-number
    /// containment; class roles are probed up to index 9.
    ///
    /// # Errors
    /// `NothingToDelete` when the plan comes out empty.
    pub async fn plan_cohort_deletion(
        &self,
        start: u32,
        end: u32,
    ) -> Result<DeletionPlan, WorkflowError> {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let directory = self.directory.as_ref();
        let mut plan = DeletionPlan::default();

        let mut seen_messages = HashSet::new();
        for fragment in [
            &self.settings.staff_menu_channel,
            &self.settings.student_menu_channel,
        ] {
            let Some(channel) = NameResolver::channel_containing(directory, fragment).await? else {
                continue;
            };
            for message in directory.recent_messages(channel.id, MENU_SCAN_LIMIT).await? {
                let mentions_cohort = (start..=end)
                    .any(|semester| message.content.contains(&format!("{semester}期")));
                if mentions_cohort && seen_messages.insert(message.id) {
                    plan.messages.push(MenuMessageRef {
                        channel: channel.id,
                        channel_name: channel.name.clone(),
                        message: message.id,
                    });
                }
            }
        }

        let all_channels = directory.channels().await?;
        let mut seen_channels = HashSet::new();
        for semester in start..=end {
            let cohort = Cohort(semester);
            for name in [cohort.staff_category(), cohort.student_category()] {
                if let Some(category) = NameResolver::category(directory, &name).await? {
                    plan.categories.push(category);
                }
            }
            let digits = semester.to_string();
            for channel in &all_channels {
                if channel.name.contains(&digits) && seen_channels.insert(channel.id) {
                    plan.channels.push(channel.clone());
                }
            }
            for name in [cohort.student_role(), cohort.staff_role()] {
                if let Some(role) = NameResolver::role(directory, &name).await? {
                    plan.roles.push(role);
                }
            }
            for class_index in 1..=MAX_PROBED_CLASSES {
                for name in [
                    cohort.class_student_role(class_index),
                    cohort.class_staff_role(class_index),
                ] {
                    if let Some(role) = NameResolver::role(directory, &name).await? {
                        plan.roles.push(role);
                    }
                }
            }
        }

        if plan.is_empty() {
            return Err(WorkflowError::NothingToDelete { start, end });
        }
        Ok(plan)
    }

    /// Propose a semester-range deletion, gated on the requester's
    /// confirmation
    ///
    /// # Errors
    /// Plan resolution failures, including `NothingToDelete`.
    pub async fn propose_cohort_deletion(
        &self,
        start: u32,
        end: u32,
        requester: ActorId,
    ) -> Result<PendingDeletion<'_>, WorkflowError> {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let plan = self.plan_cohort_deletion(start, end).await?;
        tracing::info!(start, end, objects = plan.len(), "cohort deletion proposed");
        Ok(self.pending(plan, format!("削除結果（{start}期〜{end}期）："), requester))
    }

    /// Create an event space
    ///
    /// # Errors
    /// `AlreadyExists` when the event role or category already resolves.
    pub async fn create_event(&self, name: &str) -> Result<EventSpaceObjects, WorkflowError> {
        Ok(self.engine.create_event_space(&EventSpace::new(name)).await?)
    }

    /// Propose deletion of an event space, gated on the requester's
    /// confirmation
    ///
    /// The plan covers the category's channels, the category, and the event
    /// role if it still resolves.
    ///
    /// # Errors
    /// `NotFound` when the event category does not resolve.
    pub async fn propose_event_deletion(
        &self,
        name: &str,
        requester: ActorId,
    ) -> Result<PendingDeletion<'_>, WorkflowError> {
        let event = EventSpace::new(name);
        let directory = self.directory.as_ref();
        let category = NameResolver::category(directory, &event.category_name())
            .await?
            .ok_or_else(|| WorkflowError::not_found(format!("{name}のカテゴリ")))?;

        let mut plan = DeletionPlan::default();
        plan.channels = directory
            .channels()
            .await?
            .into_iter()
            .filter(|channel| channel.category == Some(category.id))
            .collect();
        plan.categories.push(category);
        if let Some(role) = NameResolver::role(directory, &event.role_name()).await? {
            plan.roles.push(role);
        }
        tracing::info!(event = name, objects = plan.len(), "event deletion proposed");
        Ok(self.pending(plan, format!("{name}イベントの削除結果："), requester))
    }

    /// Grant the event role to a member, from the event's role-assignment
    /// channel
    ///
    /// Returns the event name on success.
    ///
    /// # Errors
    /// `NotAssignChannel` outside a role-assignment channel, `NotFound` for
    /// a missing event role, `RoleAlreadyHeld` for a redundant grant.
    pub async fn grant_event_role(
        &self,
        channel_name: &str,
        member: ActorId,
    ) -> Result<String, WorkflowError> {
        let (event, role) = self.event_role_for(channel_name).await?;
        let held = self.directory.member_roles(member).await?;
        if held.contains(&role.id) {
            return Err(WorkflowError::RoleAlreadyHeld {
                role: event.name().to_string(),
            });
        }
        self.directory.add_member_role(member, role.id).await?;
        Ok(event.name().to_string())
    }

    /// Revoke the event role from a member, from the event's
    /// role-assignment channel
    ///
    /// Returns the event name on success.
    ///
    /// # Errors
    /// Same as [`Orchestrator::grant_event_role`], with `RoleNotHeld` for a
    /// redundant revoke.
    pub async fn revoke_event_role(
        &self,
        channel_name: &str,
        member: ActorId,
    ) -> Result<String, WorkflowError> {
        let (event, role) = self.event_role_for(channel_name).await?;
        let held = self.directory.member_roles(member).await?;
        if !held.contains(&role.id) {
            return Err(WorkflowError::RoleNotHeld {
                role: event.name().to_string(),
            });
        }
        self.directory.remove_member_role(member, role.id).await?;
        Ok(event.name().to_string())
    }

    async fn event_role_for(
        &self,
        channel_name: &str,
    ) -> Result<(EventSpace, Role), WorkflowError> {
        let event = EventSpace::from_assign_channel(channel_name).ok_or_else(|| {
            WorkflowError::NotAssignChannel {
                prefix: EventSpace::ASSIGN_PREFIX.to_string(),
            }
        })?;
        let role = NameResolver::role(self.directory.as_ref(), &event.role_name())
            .await?
            .ok_or_else(|| {
                WorkflowError::not_found(format!("{}のイベントロール", event.name()))
            })?;
        Ok((event, role))
    }

    fn pending(
        &self,
        plan: DeletionPlan,
        title: String,
        requester: ActorId,
    ) -> PendingDeletion<'_> {
        let (confirmation, signal) =
            Confirmation::propose(requester, self.settings.confirm_timeout());
        PendingDeletion {
            orchestrator: self,
            plan,
            confirmation,
            signal,
            title,
        }
    }

    /// Best-effort batch delete: messages, then channels, then categories,
    /// then roles
    ///
    /// Roles go last so no overwrite on a surviving channel references a
    /// deleted role. Each deletion is attempted independently.
    async fn execute_deletion(&self, plan: DeletionPlan, title: String) -> BatchReport {
        let directory = self.directory.as_ref();
        let mut report = BatchReport::new(title);

        for menu_message in plan.messages {
            let label = format!("{}のメッセージ", menu_message.channel_name);
            match directory
                .delete_message(menu_message.channel, menu_message.message)
                .await
            {
                Ok(()) => match self.registry.purge(menu_message.message).await {
                    Ok(_) => report.success(label),
                    Err(err) => report.failure(label, err),
                },
                Err(err) => report.failure(label, err),
            }
        }
        for channel in plan.channels {
            match directory.delete_channel(channel.id).await {
                Ok(()) => report.success(format!("チャンネル {}", channel.name)),
                Err(err) => report.failure(format!("チャンネル {}", channel.name), err),
            }
        }
        for category in plan.categories {
            match directory.delete_category(category.id).await {
                Ok(()) => report.success(format!("カテゴリ {}", category.name)),
                Err(err) => report.failure(format!("カテゴリ {}", category.name), err),
            }
        }
        for role in plan.roles {
            match directory.delete_role(role.id).await {
                Ok(()) => report.success(format!("ロール {}", role.name)),
                Err(err) => report.failure(format!("ロール {}", role.name), err),
            }
        }
        tracing::info!(
            ok = report.successes.len(),
            failed = report.failures.len(),
            "batch deletion finished"
        );
        report
    }
}

/// A destructive proposal awaiting its requester's decision
///
/// The operator surface renders [`PendingDeletion::plan`] and wires its
/// confirm/cancel controls to [`PendingDeletion::signal`]; the proposing
/// workflow blocks in [`PendingDeletion::execute`].
pub struct PendingDeletion<'a> {
    orchestrator: &'a Orchestrator,
    plan: DeletionPlan,
    confirmation: Confirmation,
    signal: ConfirmationSignal,
    title: String,
}

impl PendingDeletion<'_> {
    /// The pre-execution plan
    #[inline]
    #[must_use]
    pub fn plan(&self) -> &DeletionPlan {
        &self.plan
    }

    /// Signal handle for the operator surface
    #[must_use]
    pub fn signal(&self) -> ConfirmationSignal {
        self.signal.clone()
    }

    /// Await the gate and, on confirmation, run the batch delete
    ///
    /// # Errors
    /// `Cancelled` or `Expired` when the gate resolves without
    /// confirmation; no object is touched in either case.
    pub async fn execute(self) -> Result<BatchReport, WorkflowError> {
        match self.confirmation.wait().await {
            Outcome::Confirmed => Ok(self
                .orchestrator
                .execute_deletion(self.plan, self.title)
                .await),
            Outcome::Cancelled => Err(WorkflowError::Cancelled),
            Outcome::Expired => Err(WorkflowError::Expired),
        }
    }
}
