use git_autoupdate::test_utils::{UNREACHABLE_UPSTREAM_URL, UpdateFixture};
use git_autoupdate::updater::{GitUpdater, UpdateMechanism};

use crate::leftover_update_remotes;

/// Repeated operations, successful and failing, leave no temporary remote behind
#[tokio::test]
async fn test_no_remote_leaks_across_operations() {
    let fixture = UpdateFixture::new().unwrap();
    let good = GitUpdater::new(fixture.install_path(), fixture.config());

    let mut unreachable_config = fixture.config();
    unreachable_config.upstream_url = UNREACHABLE_UPSTREAM_URL.to_string();
    let unreachable = GitUpdater::new(fixture.install_path(), unreachable_config);

    for round in 0..3 {
        fixture.publish("CHANGELOG.md", &format!("v{round}\n"), "Release").unwrap();

        assert!(good.check_response().await.success);
        assert!(unreachable.check_response().await.success);
        assert!(!unreachable.pull_response().await.success);
        assert!(good.pull_response().await.success);

        assert!(leftover_update_remotes(&fixture).is_empty(), "leak in round {round}");
    }
}

/// Remotes the user configured are left alone
#[tokio::test]
async fn test_existing_remotes_are_preserved() {
    let fixture = UpdateFixture::new().unwrap();
    fixture
        .install
        .remote_add("upstream", &fixture.upstream_path().display().to_string())
        .unwrap();
    fixture.publish("CHANGELOG.md", "v2\n", "Release v2").unwrap();

    let updater = GitUpdater::new(fixture.install_path(), fixture.config());
    updater.check_for_updates().await.unwrap();
    updater.pull_updates().await.unwrap();

    let mut remotes = fixture.install.remotes().unwrap();
    remotes.sort();
    assert_eq!(remotes, vec!["origin".to_string(), "upstream".to_string()]);
}
