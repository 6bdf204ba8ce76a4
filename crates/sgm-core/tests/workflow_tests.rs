use sgm_core::{Orchestrator, Settings, WorkflowError};
use sgm_directory::{ChannelSpec, Directory, RoleSpec};
use sgm_naming::Cohort;
use sgm_registry::Registry;
use sgm_testkit::MemoryDirectory;
use std::sync::Arc;

struct World {
    directory: Arc<MemoryDirectory>,
    orchestrator: Orchestrator,
    _tmp: tempfile::TempDir,
}

fn world_with(tweak: impl FnOnce(&mut Settings)) -> World {
    let tmp = tempfile::tempdir().unwrap();
    let directory = Arc::new(MemoryDirectory::new());
    let mut settings = Settings {
        snapshot_path: tmp.path().join("reaction_roles.json"),
        ..Settings::default()
    };
    tweak(&mut settings);
    let registry = Arc::new(Registry::new(
        directory.clone(),
        settings.registry_config(directory.bot_id()),
        &settings.snapshot_path,
    ));
    let orchestrator = Orchestrator::new(directory.clone(), registry, settings);
    World {
        directory,
        orchestrator,
        _tmp: tmp,
    }
}

fn world() -> World {
    world_with(|_| {})
}

/// Base roles, marker role and the channels every cohort workflow expects.
async fn seed_infrastructure(world: &World) {
    world.orchestrator.create_base_roles().await.unwrap();
    world
        .directory
        .create_role(RoleSpec::new("ロール未付与テスト"))
        .await
        .unwrap();
    for channel in ["職員todoリスト", "総合受付", "botテスト場"] {
        world
            .directory
            .create_channel(ChannelSpec::text(channel))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn end_to_end_cohort_five_with_two_classes() {
    let world = world();
    seed_infrastructure(&world).await;

    let report = world.orchestrator.create_cohort(Cohort(5), 2).await;
    assert!(report.succeeded(), "{report}");

    for role in [
        "5期生", "5期職員", "5-1生徒", "5-1職員", "5-2生徒", "5-2職員",
    ] {
        assert!(world.directory.role_named(role).is_some(), "missing {role}");
    }
    assert!(world
        .directory
        .category_named("\u{1F468}\u{200D}\u{1F3EB} 5期職員")
        .is_some());
    assert!(world
        .directory
        .category_named("\u{1F468}\u{200D}\u{1F393} 5期生徒")
        .is_some());

    // 1 announce + 2 staff + 6 student channels on top of the 3 seeded ones.
    let channels = world.directory.channels().await.unwrap();
    assert_eq!(channels.len(), 3 + 9);

    // Both menus registered, posted, and pre-reacted in class order.
    let menus = world.orchestrator.registry().menus();
    assert_eq!(menus.len(), 2);
    let student_channel = world.directory.channel_named("総合受付").unwrap();
    let posted = world.directory.messages_in(student_channel.id);
    assert_eq!(posted.len(), 1);
    assert_eq!(
        posted[0].reactions,
        vec!["1\u{FE0F}\u{20E3}", "2\u{FE0F}\u{20E3}"]
    );
    assert!(posted[0].content.contains("5期のクラス選択"));
}

#[tokio::test]
async fn create_halts_at_failed_stage_and_reports_it() {
    let world = world();
    seed_infrastructure(&world).await;
    world.directory.inject_failure("5期連絡");

    let report = world.orchestrator.create_cohort(Cohort(5), 1).await;
    assert!(!report.succeeded());
    assert_eq!(
        report.completed,
        vec![sgm_core::Stage::Roles, sgm_core::Stage::Categories]
    );
    let (stage, error) = report.failed.as_ref().unwrap();
    assert_eq!(*stage, sgm_core::Stage::Channels);
    assert!(error.contains("network failure"), "{error}");
    // Earlier stages stay in place, the menu stage never ran.
    assert!(world.directory.role_named("5期生").is_some());
    assert!(world.orchestrator.registry().menus().is_empty());

    let rendered = report.to_string();
    assert!(rendered.contains("❌ チャンネル"));
    assert!(rendered.contains("⏭ リアクションロール（未実行）"));
}

#[tokio::test]
async fn creating_same_cohort_twice_fails_on_roles_stage() {
    let world = world();
    seed_infrastructure(&world).await;
    assert!(world.orchestrator.create_cohort(Cohort(4), 1).await.succeeded());

    let roles_before = world.directory.roles().await.unwrap().len();
    let report = world.orchestrator.create_cohort(Cohort(4), 1).await;
    assert!(!report.succeeded());
    assert_eq!(report.failed.as_ref().unwrap().0, sgm_core::Stage::Roles);
    assert_eq!(world.directory.roles().await.unwrap().len(), roles_before);
}

#[tokio::test]
async fn menus_stage_requires_staff_menu_channel() {
    let world = world();
    world.orchestrator.create_base_roles().await.unwrap();
    world
        .directory
        .create_role(RoleSpec::new("ロール未付与テスト"))
        .await
        .unwrap();
    // Student menu channel exists, staff menu channel does not.
    world
        .directory
        .create_channel(ChannelSpec::text("総合受付"))
        .await
        .unwrap();

    let report = world.orchestrator.create_cohort(Cohort(5), 1).await;
    assert_eq!(report.failed.as_ref().unwrap().0, sgm_core::Stage::Menus);
    assert!(report
        .failed
        .as_ref()
        .unwrap()
        .1
        .contains("職員用リアクションロールチャンネル"));
    assert!(world.orchestrator.registry().menus().is_empty());
}

#[tokio::test]
async fn retire_grants_alumni_and_swaps_channel_glyphs() {
    let world = world();
    seed_infrastructure(&world).await;
    assert!(world.orchestrator.create_cohort(Cohort(5), 1).await.succeeded());

    let student_role = world.directory.role_named("5期生").unwrap();
    let alumni = world.directory.role_named("OB").unwrap();
    let graduating = world.directory.add_member("田中");
    let veteran = world.directory.add_member("佐藤");
    for member in [graduating, veteran] {
        world
            .directory
            .add_member_role(member, student_role.id)
            .await
            .unwrap();
    }
    // One member is already an alumnus; the grant must skip them.
    world
        .directory
        .add_member_role(veteran, alumni.id)
        .await
        .unwrap();

    let report = world.orchestrator.retire_cohort(Cohort(5)).await.unwrap();
    assert!(report.is_clean(), "{report}");
    assert!(report.successes.iter().any(|s| s == "OB付与: 田中"));
    assert!(!report.successes.iter().any(|s| s.contains("佐藤")));
    assert!(world
        .directory
        .member_role_names(graduating)
        .contains(&"OB".to_string()));

    // Active glyph swapped to the retired one, rest of the name untouched.
    assert!(world.directory.channel_named("📙📢｜5期連絡").is_some());
    assert!(world.directory.channel_named("📙💬｜5-1雑談").is_some());
    assert!(world.directory.channel_named("📗📢｜5期連絡").is_none());
}

#[tokio::test]
async fn retire_requires_cohort_and_alumni_roles() {
    let world = world();
    let err = world.orchestrator.retire_cohort(Cohort(5)).await.unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound { .. }));
}

#[tokio::test]
async fn first_cohort_retire_guard() {
    let world = world();
    seed_infrastructure(&world).await;
    assert!(world.orchestrator.create_cohort(Cohort(1), 1).await.succeeded());

    let student_role = world.directory.role_named("1期生").unwrap();
    let alumni = world.directory.role_named("OB").unwrap();
    let member = world.directory.add_member("田中");
    world
        .directory
        .add_member_role(member, student_role.id)
        .await
        .unwrap();
    world
        .directory
        .add_member_role(member, alumni.id)
        .await
        .unwrap();

    let err = world.orchestrator.retire_cohort(Cohort(1)).await.unwrap_err();
    assert!(matches!(err, WorkflowError::AlreadyRetired { cohort: 1 }));
}

#[tokio::test]
async fn retire_rename_matches_cohort_digits_by_containment() {
    let world = world();
    seed_infrastructure(&world).await;
    assert!(world.orchestrator.create_cohort(Cohort(1), 1).await.succeeded());
    assert!(world.orchestrator.create_cohort(Cohort(10), 1).await.succeeded());

    world.orchestrator.retire_cohort(Cohort(1)).await.unwrap();

    // Pinned: "10" contains "1", so cohort 10's channels are renamed too.
    assert!(world.directory.channel_named("📙💬｜10-1雑談").is_some());
}

#[tokio::test]
async fn retire_isolates_rename_failures() {
    let world = world();
    seed_infrastructure(&world).await;
    assert!(world.orchestrator.create_cohort(Cohort(5), 1).await.succeeded());
    world.directory.inject_failure("5-1雑談");

    let report = world.orchestrator.retire_cohort(Cohort(5)).await.unwrap();
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].0.contains("5-1雑談"));
    // The rest of the batch still ran.
    assert!(world.directory.channel_named("📙📸｜5-1写真").is_some());
}

#[tokio::test]
async fn confirmed_deletion_removes_everything_and_purges_menus() {
    let world = world();
    seed_infrastructure(&world).await;
    assert!(world.orchestrator.create_cohort(Cohort(5), 2).await.succeeded());
    let requester = world.directory.add_member("管理者");

    // Unrelated chatter in a menu channel must not enter the plan.
    let student_channel = world.directory.channel_named("総合受付").unwrap();
    world
        .directory
        .seed_message(student_channel.id, requester, "こんにちは");

    let pending = world
        .orchestrator
        .propose_cohort_deletion(5, 5, requester)
        .await
        .unwrap();
    let plan = pending.plan();
    assert_eq!(plan.categories.len(), 2);
    assert_eq!(plan.channels.len(), 9);
    assert_eq!(plan.roles.len(), 6);
    assert_eq!(plan.messages.len(), 2);
    assert!(plan.to_string().contains("⚠️ この操作は取り消せません"));

    pending.signal().confirm(requester).unwrap();
    let report = pending.execute().await.unwrap();
    assert!(report.is_clean(), "{report}");

    assert!(world.directory.role_named("5期生").is_none());
    assert!(world.directory.role_named("5-2職員").is_none());
    assert!(world.directory.channel_named("📗📢｜5期連絡").is_none());
    assert!(world
        .directory
        .category_named("\u{1F468}\u{200D}\u{1F393} 5期生徒")
        .is_none());
    assert!(world.orchestrator.registry().menus().is_empty());
    // Infrastructure outside the cohort survives.
    assert!(world.directory.role_named("OB").is_some());
    assert!(world.directory.channel_named("総合受付").is_some());
}

#[tokio::test]
async fn cancelled_deletion_touches_nothing() {
    let world = world();
    seed_infrastructure(&world).await;
    assert!(world.orchestrator.create_cohort(Cohort(5), 1).await.succeeded());
    let requester = world.directory.add_member("管理者");

    let pending = world
        .orchestrator
        .propose_cohort_deletion(5, 5, requester)
        .await
        .unwrap();
    pending.signal().cancel(requester).unwrap();
    let err = pending.execute().await.unwrap_err();
    assert!(matches!(err, WorkflowError::Cancelled));

    assert!(world.directory.role_named("5期生").is_some());
    assert_eq!(world.orchestrator.registry().menus().len(), 2);
}

#[tokio::test]
async fn expired_deletion_touches_nothing() {
    let world = world_with(|settings| settings.confirm_timeout_secs = 0);
    seed_infrastructure(&world).await;
    assert!(world.orchestrator.create_cohort(Cohort(5), 1).await.succeeded());
    let requester = world.directory.add_member("管理者");

    let pending = world
        .orchestrator
        .propose_cohort_deletion(5, 5, requester)
        .await
        .unwrap();
    let err = pending.execute().await.unwrap_err();
    assert!(matches!(err, WorkflowError::Expired));
    assert!(world.directory.role_named("5期生").is_some());
}

#[tokio::test]
async fn reversed_range_is_normalized() {
    let world = world();
    seed_infrastructure(&world).await;
    assert!(world.orchestrator.create_cohort(Cohort(3), 1).await.succeeded());
    assert!(world.orchestrator.create_cohort(Cohort(5), 1).await.succeeded());

    let plan = world.orchestrator.plan_cohort_deletion(5, 3).await.unwrap();
    let role_names: Vec<&str> = plan.roles.iter().map(|r| r.name.as_str()).collect();
    assert!(role_names.contains(&"3期生"));
    assert!(role_names.contains(&"5期生"));
}

#[tokio::test]
async fn empty_deletion_range_is_an_error() {
    let world = world();
    seed_infrastructure(&world).await;
    let err = world
        .orchestrator
        .plan_cohort_deletion(7, 8)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::NothingToDelete { start: 7, end: 8 }
    ));
}

#[tokio::test]
async fn deletion_batch_isolates_per_object_failures() {
    let world = world();
    seed_infrastructure(&world).await;
    assert!(world.orchestrator.create_cohort(Cohort(5), 1).await.succeeded());
    let requester = world.directory.add_member("管理者");
    world.directory.inject_failure("5期生徒");

    let pending = world
        .orchestrator
        .propose_cohort_deletion(5, 5, requester)
        .await
        .unwrap();
    pending.signal().confirm(requester).unwrap();
    let report = pending.execute().await.unwrap();

    // The student category failed, everything else still went through.
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].0.contains("5期生徒"));
    assert!(world.directory.role_named("5期生").is_none());
    assert!(world.directory.channel_named("📗📢｜5期連絡").is_none());
}

#[tokio::test]
async fn event_lifecycle_with_member_roles() {
    let world = world();
    seed_infrastructure(&world).await;
    let requester = world.directory.add_member("管理者");
    let member = world.directory.add_member("田中");

    world.orchestrator.create_event("文化祭").await.unwrap();
    assert!(world.directory.role_named("🎯 文化祭").is_some());
    assert!(world.directory.channel_named("ログ-文化祭").is_some());

    // Grant and revoke from the assignment channel, rejecting redundancy.
    let event = world
        .orchestrator
        .grant_event_role("ロール付与-文化祭", member)
        .await
        .unwrap();
    assert_eq!(event, "文化祭");
    assert!(world
        .directory
        .member_role_names(member)
        .contains(&"🎯 文化祭".to_string()));
    let err = world
        .orchestrator
        .grant_event_role("ロール付与-文化祭", member)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::RoleAlreadyHeld { .. }));

    world
        .orchestrator
        .revoke_event_role("ロール付与-文化祭", member)
        .await
        .unwrap();
    let err = world
        .orchestrator
        .revoke_event_role("ロール付与-文化祭", member)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::RoleNotHeld { .. }));

    let err = world
        .orchestrator
        .grant_event_role("雑談", member)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NotAssignChannel { .. }));

    // Delete through the gate.
    let pending = world
        .orchestrator
        .propose_event_deletion("文化祭", requester)
        .await
        .unwrap();
    assert_eq!(pending.plan().channels.len(), 2);
    pending.signal().confirm(requester).unwrap();
    let report = pending.execute().await.unwrap();
    assert!(report.is_clean(), "{report}");
    assert!(world.directory.role_named("🎯 文化祭").is_none());
    assert!(world.directory.category_named("文化祭").is_none());
}

#[tokio::test]
async fn duplicate_event_creation_is_rejected() {
    let world = world();
    seed_infrastructure(&world).await;
    world.orchestrator.create_event("合宿").await.unwrap();
    let err = world.orchestrator.create_event("合宿").await.unwrap_err();
    assert!(matches!(err, WorkflowError::Provision(_)));
}

#[tokio::test]
async fn reaction_events_flow_through_registered_menus() {
    let world = world();
    seed_infrastructure(&world).await;
    assert!(world.orchestrator.create_cohort(Cohort(5), 1).await.succeeded());
    let member = world.directory.add_member("田中");
    let unassigned = world.directory.role_named("ロール未付与テスト").unwrap();
    world
        .directory
        .add_member_role(member, unassigned.id)
        .await
        .unwrap();

    let student_channel = world.directory.channel_named("総合受付").unwrap();
    let menu_message = world.directory.messages_in(student_channel.id)[0].id;
    let event = sgm_directory::ReactionEvent::new(
        menu_message,
        "1\u{FE0F}\u{20E3}",
        member,
        sgm_directory::GuildId(1),
    );
    world
        .orchestrator
        .registry()
        .handle_reaction_added(&event)
        .await
        .unwrap();

    let held = world.directory.member_role_names(member);
    assert!(held.contains(&"5-1生徒".to_string()));
    assert!(held.contains(&"5期生".to_string()));
    assert!(!held.contains(&"ロール未付与テスト".to_string()));
}
