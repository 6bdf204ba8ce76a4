//! Scripted end-to-end scenario against the in-memory directory
//!
//! Runs the whole cohort lifecycle (bootstrap, create, react, retire,
//! delete) and prints each consolidated report. Useful for eyeballing the
//! operator-facing output without a live guild.

use clap::{value_parser, Arg, Command};
use sgm_core::{Orchestrator, Settings};
use sgm_directory::{ChannelSpec, Directory, GuildId, ReactionEvent, RoleSpec};
use sgm_naming::Cohort;
use sgm_registry::Registry;
use sgm_testkit::MemoryDirectory;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let matches = Command::new("sgm-demo")
        .about("SGM lifecycle walkthrough on an in-memory guild")
        .arg(
            Arg::new("semester")
                .long("semester")
                .default_value("5")
                .value_parser(value_parser!(u32))
                .help("Semester number to provision"),
        )
        .arg(
            Arg::new("classes")
                .long("classes")
                .default_value("2")
                .value_parser(value_parser!(u32))
                .help("Number of classes in the cohort"),
        )
        .get_matches();
    let semester = *matches.get_one::<u32>("semester").expect("defaulted");
    let classes = *matches.get_one::<u32>("classes").expect("defaulted");

    let directory = Arc::new(MemoryDirectory::new());
    let settings = Settings {
        snapshot_path: std::env::temp_dir().join("sgm-demo-reaction-roles.json"),
        ..Settings::default()
    };
    let registry = Arc::new(Registry::new(
        directory.clone(),
        settings.registry_config(directory.bot_id()),
        &settings.snapshot_path,
    ));
    let orchestrator = Orchestrator::new(directory.clone(), registry, settings);

    // Bootstrap: base roles, marker role, and the fixed channels.
    orchestrator.create_base_roles().await?;
    directory
        .create_role(RoleSpec::new("ロール未付与テスト"))
        .await?;
    for name in ["botテスト場", "職員todoリスト", "総合受付", "管理bot連絡"] {
        directory.create_channel(ChannelSpec::text(name)).await?;
    }

    let cohort = Cohort(semester);
    println!("== create_cohort ==");
    let report = orchestrator.create_cohort(cohort, classes).await;
    println!("{report}");

    // A member picks class 1 on the posted menu.
    let member = directory.add_member("田中");
    let unassigned = directory.role_named("ロール未付与テスト").expect("seeded");
    directory.add_member_role(member, unassigned.id).await?;
    let menu_channel = directory.channel_named("総合受付").expect("seeded");
    let menu_message = directory.messages_in(menu_channel.id)[0].id;
    orchestrator
        .registry()
        .handle_reaction_added(&ReactionEvent::new(
            menu_message,
            "1\u{FE0F}\u{20E3}",
            member,
            GuildId(1),
        ))
        .await?;
    println!("\n== member roles after reaction ==");
    println!("{:?}", directory.member_role_names(member));

    println!("\n== retire_cohort ==");
    let report = orchestrator.retire_cohort(cohort).await?;
    println!("{report}");

    println!("\n== delete_cohorts ==");
    let requester = directory.add_member("管理者");
    let pending = orchestrator
        .propose_cohort_deletion(semester, semester, requester)
        .await?;
    println!("{}", pending.plan());
    pending.signal().confirm(requester)?;
    let report = pending.execute().await?;
    println!("\n{report}");

    Ok(())
}
