/// Git backend integration tests
///
/// Exercises the libgit2 backend against fixture repositories on the local
/// filesystem; no network involved. Source repositories are laid out as
/// `<root>/<name>.git` so identifier resolution applies unchanged with the
/// fixture root as the remote host.
use std::path::Path;

use repoharvest_cloning::{
    run_batch, BatchDispatcher, CloneConfig, CloneErrorKind, RepoId,
};
use tempfile::TempDir;

fn init_fixture_repo(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    let repo = git2::Repository::init(dir).unwrap();
    std::fs::write(dir.join("README.md"), "# fixture\n").unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new("README.md")).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = git2::Signature::now("tester", "tester@example.com").unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
        .unwrap();
}

fn fixture_config(remotes: &TempDir, workspace: &TempDir, workers: usize) -> CloneConfig {
    CloneConfig::new(workers, workspace.path())
        .with_remote_host(format!("{}/", remotes.path().display()))
}

#[test]
fn test_clone_local_fixture() {
    let remotes = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    init_fixture_repo(&remotes.path().join("fixture.git"));

    let config = fixture_config(&remotes, &workspace, 1);
    let outcomes = run_batch(&[RepoId::from("fixture")], &config).unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].success(), "clone failed: {:?}", outcomes[0].error);
    assert!(workspace.path().join("fixture/README.md").is_file());
    assert!(workspace.path().join("fixture/.git").exists());
}

#[test]
fn test_clone_batch_of_fixtures() {
    let remotes = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    init_fixture_repo(&remotes.path().join("owner/alpha.git"));
    init_fixture_repo(&remotes.path().join("owner/beta.git"));

    let config = fixture_config(&remotes, &workspace, 2);
    let report = BatchDispatcher::new(config)
        .run(&[RepoId::from("owner/alpha"), RepoId::from("owner/beta")])
        .unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 0);
    assert!(workspace.path().join("owner/alpha/README.md").is_file());
    assert!(workspace.path().join("owner/beta/README.md").is_file());
}

#[test]
fn test_occupied_destination_reported_as_failed_outcome() {
    let remotes = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    init_fixture_repo(&remotes.path().join("fixture.git"));

    let config = fixture_config(&remotes, &workspace, 1);
    let first = run_batch(&[RepoId::from("fixture")], &config).unwrap();
    assert!(first[0].success());

    // Destination is now non-empty; the second clone fails as data, it
    // does not abort the batch.
    let second = run_batch(&[RepoId::from("fixture")], &config).unwrap();
    assert_eq!(second.len(), 1);
    let err = second[0].error.as_ref().unwrap();
    assert_eq!(err.kind, CloneErrorKind::DestinationExists);
}

#[test]
fn test_missing_remote_reported_as_failed_outcome() {
    let remotes = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    let config = fixture_config(&remotes, &workspace, 1);
    let outcomes = run_batch(&[RepoId::from("ghost")], &config).unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].success());
    assert!(outcomes[0].error.is_some());
}

#[test]
fn test_partial_failure_within_one_batch() {
    let remotes = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    init_fixture_repo(&remotes.path().join("real.git"));

    let config = fixture_config(&remotes, &workspace, 2);
    let report = BatchDispatcher::new(config)
        .run(&[RepoId::from("real"), RepoId::from("ghost")])
        .unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
    assert!(report.outcomes[0].success());
    assert!(!report.outcomes[1].success());
    assert!(workspace.path().join("real/README.md").is_file());
}
