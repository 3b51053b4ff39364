use git_autoupdate::core::UpdateError;
use git_autoupdate::test_utils::{TestGit, UNREACHABLE_UPSTREAM_URL, UpdateFixture};
use git_autoupdate::updater::{GitUpdater, UpdateEvent, UpdateMechanism, Updater};

use crate::leftover_update_remotes;

/// A → B → C upstream: the installation lands on C, then a second pull is a no-op
#[tokio::test]
async fn test_pull_fast_forwards_then_is_idempotent() {
    let fixture = UpdateFixture::new().unwrap();
    let start = fixture.install.rev_parse_head().unwrap();
    fixture.publish("CHANGELOG.md", "v2\n", "Release v2").unwrap();
    let tip = fixture.publish("CHANGELOG.md", "v3\n", "Release v3").unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());

    let first = updater.pull_updates().await.unwrap();
    assert!(first.success);
    assert!(!first.already_up_to_date);
    assert_eq!(first.previous_version, start);
    assert_eq!(first.new_version, tip);
    assert_eq!(
        first.message,
        format!("Updated from {} to {}", first.previous_version_short, first.new_version_short)
    );
    assert_eq!(fixture.install.rev_parse_head().unwrap(), tip);
    assert_eq!(
        std::fs::read_to_string(fixture.install_path().join("CHANGELOG.md")).unwrap(),
        "v3\n"
    );

    let second = updater.pull_updates().await.unwrap();
    assert!(second.success);
    assert!(second.already_up_to_date);
    assert_eq!(second.previous_version, tip);
    assert_eq!(second.new_version, tip);
    assert_eq!(second.message, format!("Already up to date at {}", second.new_version_short));

    assert!(leftover_update_remotes(&fixture).is_empty());
}

/// Fast-forward never creates a merge commit: HEAD's parent is the old upstream tip
#[tokio::test]
async fn test_pull_creates_no_merge_commit() {
    let fixture = UpdateFixture::new().unwrap();
    fixture.publish("a.txt", "a\n", "Add a").unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());
    updater.pull_updates().await.unwrap();

    let parents = std::process::Command::new("git")
        .args(["rev-list", "--parents", "-n", "1", "HEAD"])
        .current_dir(fixture.install_path())
        .output()
        .unwrap();
    let line = String::from_utf8_lossy(&parents.stdout);
    assert_eq!(line.split_whitespace().count(), 2, "expected a single parent: {line}");
}

#[tokio::test]
async fn test_pull_refuses_dirty_tree() {
    let fixture = UpdateFixture::new().unwrap();
    fixture.publish("CHANGELOG.md", "v2\n", "Release v2").unwrap();
    let head = fixture.install.rev_parse_head().unwrap();
    fixture.install.write_file("README.md", "# edited locally\n").unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());
    let err = updater.pull_updates().await.unwrap_err();

    assert_eq!(UpdateError::classify(&err), UpdateError::LocalChangesPresent);
    assert_eq!(fixture.install.rev_parse_head().unwrap(), head);
    assert_eq!(
        std::fs::read_to_string(fixture.install_path().join("README.md")).unwrap(),
        "# edited locally\n"
    );
    // Refused before any remote was added
    assert_eq!(fixture.install.remotes().unwrap(), vec!["origin".to_string()]);
}

#[tokio::test]
async fn test_pull_untracked_file_counts_as_local_change() {
    let fixture = UpdateFixture::new().unwrap();
    fixture.install.write_file("notes.txt", "scratch\n").unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());
    let err = updater.pull_updates().await.unwrap_err();
    assert_eq!(UpdateError::classify(&err).kind(), "LocalChangesPresent");
}

#[tokio::test]
async fn test_pull_diverged_branches() {
    let fixture = UpdateFixture::new().unwrap();
    fixture.publish("upstream.txt", "upstream\n", "Upstream change").unwrap();
    let local = fixture.commit_locally("local.txt", "local\n", "Local change").unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());
    let response = updater.pull_response().await;

    assert!(!response.success);
    assert_eq!(response.error_kind.as_deref(), Some("DivergedBranches"));
    assert_eq!(response.status, Some(409));
    assert!(response.result.is_none());

    // History untouched
    assert_eq!(fixture.install.rev_parse_head().unwrap(), local);
    assert!(leftover_update_remotes(&fixture).is_empty());
}

#[tokio::test]
async fn test_pull_unreachable_upstream() {
    let fixture = UpdateFixture::new().unwrap();
    let head = fixture.install.rev_parse_head().unwrap();
    let mut config = fixture.config();
    config.upstream_url = UNREACHABLE_UPSTREAM_URL.to_string();

    let updater = GitUpdater::new(fixture.install_path(), config);
    let response = updater.pull_response().await;

    assert!(!response.success);
    assert_eq!(response.error_kind.as_deref(), Some("PullFailed"));
    assert_eq!(response.status, Some(500));
    let error = response.error.unwrap();
    assert!(error.contains("fetch from update source failed"), "got: {error}");
    assert_eq!(fixture.install.rev_parse_head().unwrap(), head);
    assert!(leftover_update_remotes(&fixture).is_empty());
}

#[tokio::test]
async fn test_pull_invalid_url_envelope() {
    let fixture = UpdateFixture::new().unwrap();
    let mut config = fixture.config();
    config.upstream_url = "https://evil.com/x; rm -rf /".to_string();

    let updater = Updater::from_config(fixture.install_path(), config);
    let response = updater.pull_response().await;

    assert!(!response.success);
    assert_eq!(response.error_kind.as_deref(), Some("InvalidUrl"));
    assert_eq!(response.status, Some(400));
    assert!(response.error.unwrap().contains("Invalid update source URL"));
}

#[tokio::test]
async fn test_pull_notifies_subscribers() {
    let fixture = UpdateFixture::new().unwrap();
    let tip = fixture.publish("CHANGELOG.md", "v2\n", "Release v2").unwrap();

    let updater = Updater::from_config(fixture.install_path(), fixture.config());
    let mut events = updater.subscribe();

    let response = updater.pull_response().await;
    assert!(response.success);

    assert_eq!(
        events.recv().await.unwrap(),
        UpdateEvent::Pulled {
            new_version: tip,
            already_up_to_date: false,
        }
    );
}

/// Check then pull agree on the target revision
#[tokio::test]
async fn test_check_then_pull() {
    let fixture = UpdateFixture::new().unwrap();
    fixture.publish("CHANGELOG.md", "v2\n", "Release v2").unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());
    let check = updater.check_for_updates().await.unwrap();
    assert!(check.update_available);

    let pulled = updater.pull_updates().await.unwrap();
    assert_eq!(Some(pulled.new_version), check.remote_version);

    let after = updater.check_for_updates().await.unwrap();
    assert!(!after.update_available);
}

/// Local commits upstream lacks: nothing to fast-forward, history kept
#[tokio::test]
async fn test_pull_locally_ahead_is_up_to_date() {
    let fixture = UpdateFixture::new().unwrap();
    let local = fixture.commit_locally("local.txt", "local\n", "Local change").unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());
    let pulled = updater.pull_updates().await.unwrap();

    assert!(pulled.success);
    assert!(pulled.already_up_to_date);
    assert_eq!(pulled.previous_version, local);
    assert_eq!(pulled.previous_version, pulled.new_version);
    assert_eq!(fixture.install.rev_parse_head().unwrap(), local);
    assert!(leftover_update_remotes(&fixture).is_empty());
}

#[tokio::test]
async fn test_pull_repository_without_commits() {
    let temp = tempfile::TempDir::new().unwrap();
    let empty = TestGit::new(temp.path().join("empty"));
    empty.init().unwrap();
    let fixture = UpdateFixture::new().unwrap();

    let updater = Updater::from_config(empty.repo_path(), fixture.config());
    let response = updater.pull_response().await;

    assert!(!response.success);
    assert_eq!(response.error_kind.as_deref(), Some("InternalError"));
    assert!(response.error.unwrap().contains("fatal"));
    assert!(empty.remotes().unwrap().is_empty());
}
