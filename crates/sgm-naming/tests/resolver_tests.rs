use sgm_directory::{CategorySpec, Directory, RoleSpec};
use sgm_naming::NameResolver;
use sgm_testkit::MemoryDirectory;

const JOINED: &str = "\u{1F468}\u{200D}\u{1F3EB} 3期職員";
const DECOMPOSED: &str = "\u{1F468}\u{1F3EB} 3期職員";

#[tokio::test]
async fn joined_category_resolves_from_decomposed_query() {
    let directory = MemoryDirectory::new();
    directory
        .create_category(CategorySpec::new(JOINED))
        .await
        .unwrap();

    let found = NameResolver::category(&directory, DECOMPOSED)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, JOINED);
}

#[tokio::test]
async fn decomposed_category_resolves_from_joined_query() {
    let directory = MemoryDirectory::new();
    directory
        .create_category(CategorySpec::new(DECOMPOSED))
        .await
        .unwrap();

    let found = NameResolver::category(&directory, JOINED)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, DECOMPOSED);
}

#[tokio::test]
async fn exact_form_wins_when_both_exist() {
    let directory = MemoryDirectory::new();
    directory
        .create_category(CategorySpec::new(DECOMPOSED))
        .await
        .unwrap();
    directory
        .create_category(CategorySpec::new(JOINED))
        .await
        .unwrap();

    let found = NameResolver::category(&directory, JOINED)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, JOINED);
}

#[tokio::test]
async fn missing_name_is_none_not_error() {
    let directory = MemoryDirectory::new();
    assert!(NameResolver::role(&directory, "5期生")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn plain_names_resolve_exactly() {
    let directory = MemoryDirectory::new();
    directory
        .create_role(RoleSpec::new("5期生"))
        .await
        .unwrap();
    let found = NameResolver::role(&directory, "5期生").await.unwrap();
    assert_eq!(found.unwrap().name, "5期生");
}

#[tokio::test]
async fn channel_containing_finds_by_fragment() {
    let directory = MemoryDirectory::new();
    directory
        .create_channel(sgm_directory::ChannelSpec::text("第1総合受付"))
        .await
        .unwrap();

    let found = NameResolver::channel_containing(&directory, "総合受付")
        .await
        .unwrap();
    assert_eq!(found.unwrap().name, "第1総合受付");
    assert!(NameResolver::channel_containing(&directory, "職員todo")
        .await
        .unwrap()
        .is_none());
}
