use git_autoupdate::test_utils::{TestGit, UNREACHABLE_UPSTREAM_URL, UpdateFixture};
use git_autoupdate::updater::{GitUpdater, UpdateMechanism, Updater};

use crate::leftover_update_remotes;

/// Upstream one commit ahead: update available, remote is the upstream tip
#[tokio::test]
async fn test_check_reports_update_when_behind() {
    let fixture = UpdateFixture::new().unwrap();
    let local = fixture.install.rev_parse_head().unwrap();
    let tip = fixture.publish("CHANGELOG.md", "v2\n", "Release v2").unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());
    let result = updater.check_for_updates().await.unwrap();

    assert!(result.update_available);
    assert_eq!(result.local_version, local);
    assert_eq!(result.remote_version.as_deref(), Some(tip.as_str()));
    assert!(tip.starts_with(result.remote_version_short.as_deref().unwrap()));
    assert!(result.error.is_none());

    // A check never moves the installation
    assert_eq!(fixture.install.rev_parse_head().unwrap(), local);
}

#[tokio::test]
async fn test_check_up_to_date() {
    let fixture = UpdateFixture::new().unwrap();
    let local = fixture.install.rev_parse_head().unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());
    let result = updater.check_for_updates().await.unwrap();

    assert!(!result.update_available);
    assert_eq!(result.remote_version.as_deref(), Some(local.as_str()));
    assert_eq!(result.local_version, local);
    assert!(result.error.is_none());
}

/// Local and upstream both have commits the other lacks
#[tokio::test]
async fn test_check_diverged_is_not_an_update() {
    let fixture = UpdateFixture::new().unwrap();
    let tip = fixture.publish("upstream.txt", "upstream\n", "Upstream change").unwrap();
    fixture.commit_locally("local.txt", "local\n", "Local change").unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());
    let result = updater.check_for_updates().await.unwrap();

    assert!(!result.update_available);
    assert_eq!(result.remote_version.as_deref(), Some(tip.as_str()));
}

#[tokio::test]
async fn test_check_locally_ahead_is_not_an_update() {
    let fixture = UpdateFixture::new().unwrap();
    let upstream = fixture.install.rev_parse_head().unwrap();
    let local = fixture.commit_locally("local.txt", "local\n", "Local change").unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());
    let result = updater.check_for_updates().await.unwrap();

    assert!(!result.update_available);
    assert_eq!(result.local_version, local);
    assert_eq!(result.remote_version.as_deref(), Some(upstream.as_str()));
}

/// An unreachable upstream is reported inside a successful result
#[tokio::test]
async fn test_check_unreachable_upstream_embeds_error() {
    let fixture = UpdateFixture::new().unwrap();
    let mut config = fixture.config();
    config.upstream_url = UNREACHABLE_UPSTREAM_URL.to_string();

    let updater = GitUpdater::new(fixture.install_path(), config);
    let result = updater.check_for_updates().await.unwrap();

    assert!(!result.update_available);
    assert!(result.remote_version.is_none());
    assert!(result.remote_version_short.is_none());
    let error = result.error.expect("unreachable upstream should set error");
    assert!(error.starts_with("Could not reach update source"), "got: {error}");
    assert_eq!(result.local_version, fixture.install.rev_parse_head().unwrap());
    assert!(leftover_update_remotes(&fixture).is_empty());
}

#[tokio::test]
async fn test_check_rejects_injected_url_before_any_git_call() {
    let fixture = UpdateFixture::new().unwrap();
    let mut config = fixture.config();
    config.upstream_url = "https://evil.com/x; rm -rf /".to_string();

    let updater = GitUpdater::new(fixture.install_path(), config);
    let err = updater.check_for_updates().await.unwrap_err();

    let typed = git_autoupdate::core::UpdateError::classify(&err);
    assert_eq!(typed.kind(), "InvalidUrl");
    assert_eq!(typed.status_code(), 400);
    assert_eq!(fixture.install.remotes().unwrap(), vec!["origin".to_string()]);
}

#[tokio::test]
async fn test_check_outside_repository() {
    let temp = tempfile::TempDir::new().unwrap();
    let fixture = UpdateFixture::new().unwrap();

    let updater = GitUpdater::new(temp.path(), fixture.config());
    let err = updater.check_for_updates().await.unwrap_err();
    assert_eq!(git_autoupdate::core::UpdateError::classify(&err).kind(), "NotARepository");
}

/// Checks report upstream state without requiring a clean tree
#[tokio::test]
async fn test_check_with_local_changes() {
    let fixture = UpdateFixture::new().unwrap();
    fixture.publish("CHANGELOG.md", "v2\n", "Release v2").unwrap();
    fixture.install.write_file("scratch.txt", "wip\n").unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());
    let result = updater.check_for_updates().await.unwrap();
    assert!(result.update_available);
}

#[tokio::test]
async fn test_check_repository_without_commits() {
    let temp = tempfile::TempDir::new().unwrap();
    let empty = TestGit::new(temp.path().join("empty"));
    empty.init().unwrap();
    let fixture = UpdateFixture::new().unwrap();

    let updater = Updater::from_config(empty.repo_path(), fixture.config());
    let response = updater.check_response().await;

    assert!(!response.success);
    assert_eq!(response.error_kind.as_deref(), Some("InternalError"));
    assert_eq!(response.status, Some(500));
    let error = response.error.unwrap();
    assert!(error.starts_with("Cannot resolve the installed revision"), "got: {error}");
    assert!(error.contains("fatal"), "git output missing: {error}");
    // Failed before any remote was added
    assert!(empty.remotes().unwrap().is_empty());
}
