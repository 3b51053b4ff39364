use git_autoupdate::test_utils::{TestGit, UpdateFixture};
use git_autoupdate::updater::{GitUpdater, UpdateMechanism, Updater};

#[tokio::test]
async fn test_info_describes_clean_installation() {
    let fixture = UpdateFixture::new().unwrap();
    let head = fixture.install.rev_parse_head().unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());
    let info = updater.get_info().await.unwrap();

    assert_eq!(info.install_path, fixture.install_path());
    assert_eq!(info.current_version.as_deref(), Some(head.as_str()));
    assert!(head.starts_with(info.current_version_short.as_deref().unwrap()));
    assert_eq!(info.current_branch.as_deref(), Some("main"));
    assert!(!info.has_local_changes);
    assert_eq!(info.source_url, fixture.config().upstream_url);
    assert!(info.auto_update_enabled);
    assert_eq!(info.check_interval_minutes, 15);
}

#[tokio::test]
async fn test_info_reports_local_changes() {
    let fixture = UpdateFixture::new().unwrap();
    fixture.install.write_file("README.md", "# changed\n").unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());
    assert!(updater.get_info().await.unwrap().has_local_changes);
}

#[tokio::test]
async fn test_info_detached_head_has_no_branch() {
    let fixture = UpdateFixture::new().unwrap();
    let head = fixture.install.rev_parse_head().unwrap();
    fixture.install.checkout(&head).unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());
    let info = updater.get_info().await.unwrap();
    assert_eq!(info.current_version.as_deref(), Some(head.as_str()));
    assert!(info.current_branch.is_none());
}

/// Info on a plain directory succeeds with revision fields absent
#[tokio::test]
async fn test_info_outside_repository() {
    let temp = tempfile::TempDir::new().unwrap();
    let fixture = UpdateFixture::new().unwrap();

    let updater = GitUpdater::new(temp.path(), fixture.config());
    let response = updater.info_response().await;

    assert!(response.success);
    let info = response.result.unwrap();
    assert!(info.current_version.is_none());
    assert!(info.current_branch.is_none());
    assert!(!info.has_local_changes);
}

#[tokio::test]
async fn test_info_serializes_camel_case() {
    let fixture = UpdateFixture::new().unwrap();
    let updater = GitUpdater::new(fixture.install_path(), fixture.config());

    let json = serde_json::to_value(updater.info_response().await).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["result"]["currentBranch"], "main");
    assert_eq!(json["result"]["hasLocalChanges"], false);
    assert_eq!(json["result"]["mechanismInfo"]["mechanism"], "git");
}

/// A freshly initialized repository has no revision yet
#[tokio::test]
async fn test_info_repository_without_commits() {
    let temp = tempfile::TempDir::new().unwrap();
    let empty = TestGit::new(temp.path().join("empty"));
    empty.init().unwrap();
    let fixture = UpdateFixture::new().unwrap();

    let updater = Updater::from_config(empty.repo_path(), fixture.config());
    let response = updater.info_response().await;

    assert!(response.success, "unexpected failure: {:?}", response.error);
    let info = response.result.unwrap();
    assert!(info.current_version.is_none());
    assert!(info.current_version_short.is_none());
    assert!(!info.has_local_changes);
}
