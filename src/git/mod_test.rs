use super::*;
use std::fs;

fn create_test_repo() -> (tempfile::TempDir, Repository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();

    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test").unwrap();
    config.set_str("user.email", "test@test.com").unwrap();

    (dir, repo)
}

fn commit_as(
    repo: &Repository,
    author: (&str, &str),
    files: &[(&str, &str)],
    message: &str,
    epoch: i64,
) -> git2::Oid {
    let sig = git2::Signature::new(author.0, author.1, &git2::Time::new(epoch, 0)).unwrap();
    let mut index = repo.index().unwrap();

    for (path, content) in files {
        let full_path = repo.workdir().unwrap().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        index.add_path(Path::new(path)).unwrap();
    }

    index.write().unwrap();
    let tree_oid = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_oid).unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

fn make_commit_at(repo: &Repository, files: &[(&str, &str)], message: &str, epoch: i64) -> git2::Oid {
    commit_as(repo, ("Test", "test@test.com"), files, message, epoch)
}

#[test]
fn open_non_repo_is_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("plain");
    fs::create_dir_all(&sub).unwrap();
    match GitRepo::open(&sub) {
        Err(XrayError::Input(_)) => {}
        other => panic!("expected Input error, got {other:?}"),
    }
}

#[test]
fn file_changes_are_oldest_first_with_line_stats() {
    let (dir, repo) = create_test_repo();
    make_commit_at(&repo, &[("a.py", "one\ntwo\n")], "add a", 1_000_000);
    make_commit_at(&repo, &[("a.py", "one\ntwo\nthree\n")], "grow a", 2_000_000);
    make_commit_at(&repo, &[("b.py", "x\n")], "add b", 3_000_000);

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let changes = git_repo.file_changes(None, None).unwrap();

    assert_eq!(changes.len(), 3);
    assert!(changes.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let first = &changes[0];
    assert_eq!(first.path, "a.py");
    assert_eq!(first.added, 2);
    assert_eq!(first.deleted, 0);
    assert_eq!(first.author, "test@test.com");

    let second = &changes[1];
    assert_eq!(second.added, 1);
    assert_eq!(second.deleted, 0);
}

#[test]
fn file_changes_window_bounds() {
    let (dir, repo) = create_test_repo();
    make_commit_at(&repo, &[("a.py", "v1\n")], "old", 1_000_000);
    make_commit_at(&repo, &[("b.py", "v1\n")], "mid", 2_000_000);
    make_commit_at(&repo, &[("c.py", "v1\n")], "new", 3_000_000);

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let changes = git_repo
        .file_changes(Some(1_500_000), Some(2_500_000))
        .unwrap();

    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].path, "b.py");
}

#[test]
fn file_changes_empty_repo_is_empty_not_error() {
    let (dir, _repo) = create_test_repo();
    let git_repo = GitRepo::open(dir.path()).unwrap();
    assert!(git_repo.file_changes(None, None).unwrap().is_empty());
}

#[test]
fn merge_commits_are_skipped() {
    let (dir, repo) = create_test_repo();
    let base = make_commit_at(&repo, &[("a.py", "base\n")], "base", 1_000_000);

    // Branch from base, then merge back with two parents.
    let base_commit = repo.find_commit(base).unwrap();
    repo.branch("side", &base_commit, false).unwrap();
    let main_tip = make_commit_at(&repo, &[("a.py", "main\n")], "main work", 2_000_000);

    repo.set_head("refs/heads/side").unwrap();
    repo.checkout_head(Some(git2::build::CheckoutBuilder::new().force()))
        .unwrap();
    let side_tip = make_commit_at(&repo, &[("b.py", "side\n")], "side work", 2_100_000);

    let sig = git2::Signature::new("Test", "test@test.com", &git2::Time::new(2_200_000, 0)).unwrap();
    let main_commit = repo.find_commit(main_tip).unwrap();
    let side_commit = repo.find_commit(side_tip).unwrap();
    let mut index = repo
        .merge_commits(&main_commit, &side_commit, None)
        .unwrap();
    let tree_oid = index.write_tree_to(&repo).unwrap();
    let tree = repo.find_tree(tree_oid).unwrap();
    repo.set_head("refs/heads/main").ok();
    repo.commit(
        Some("HEAD"),
        &sig,
        &sig,
        "merge",
        &tree,
        &[&main_commit, &side_commit],
    )
    .unwrap();

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let changes = git_repo.file_changes(None, None).unwrap();
    // base + main work + side work; the merge commit itself contributes nothing
    assert_eq!(changes.len(), 3);
}

#[test]
fn commit_count_and_date_range() {
    let (dir, repo) = create_test_repo();
    make_commit_at(&repo, &[("a.py", "v1\n")], "first", 1_000_000);
    make_commit_at(&repo, &[("a.py", "v2\n")], "second", 2_000_000);

    let git_repo = GitRepo::open(dir.path()).unwrap();
    assert_eq!(git_repo.commit_count().unwrap(), 2);
    assert_eq!(git_repo.first_commit_date().unwrap(), Some(1_000_000));
    assert_eq!(git_repo.last_commit_date().unwrap(), Some(2_000_000));
}

#[test]
fn resolve_ref_sha_branch_and_date() {
    let (dir, repo) = create_test_repo();
    let oid = make_commit_at(&repo, &[("a.py", "v1\n")], "first", 1_000_000_000);
    make_commit_at(&repo, &[("a.py", "v2\n")], "second", 1_100_000_000);

    let git_repo = GitRepo::open(dir.path()).unwrap();

    // Full and abbreviated SHA
    let sha = oid.to_string();
    assert_eq!(git_repo.resolve_ref(&sha).unwrap(), 1_000_000_000);
    assert_eq!(git_repo.resolve_ref(&sha[..8]).unwrap(), 1_000_000_000);

    // HEAD resolves to the newest commit
    assert_eq!(git_repo.resolve_ref("HEAD").unwrap(), 1_100_000_000);

    // A date between the two commits resolves closest-before.
    // 1_050_000_000 ≈ 2003-04-10
    assert_eq!(git_repo.resolve_ref("2003-04-10").unwrap(), 1_000_000_000);

    match git_repo.resolve_ref("no-such-ref") {
        Err(XrayError::Input(_)) => {}
        other => panic!("expected Input error, got {other:?}"),
    }
}

#[test]
fn list_source_files_filters_and_sorts() {
    let (dir, repo) = create_test_repo();
    make_commit_at(
        &repo,
        &[
            ("src/b.py", "pass\n"),
            ("src/a.py", "pass\n"),
            ("web/app.ts", "let x = 1\n"),
            ("README.md", "docs\n"),
        ],
        "layout",
        1_000_000,
    );

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let files = git_repo.list_source_files(None).unwrap();
    assert_eq!(files, vec!["src/a.py", "src/b.py", "web/app.ts"]);
}

#[test]
fn read_file_at_ref_sees_old_content() {
    let (dir, repo) = create_test_repo();
    let first = make_commit_at(&repo, &[("a.py", "old\n")], "first", 1_000_000);
    make_commit_at(&repo, &[("a.py", "new\n")], "second", 2_000_000);

    let git_repo = GitRepo::open(dir.path()).unwrap();
    assert_eq!(git_repo.read_file("a.py", None).unwrap(), b"new\n");
    let at_first = git_repo
        .read_file("a.py", Some(&first.to_string()))
        .unwrap();
    assert_eq!(at_first, b"old\n");

    match git_repo.read_file("missing.py", None) {
        Err(XrayError::Adapter { path, .. }) => assert_eq!(path, "missing.py"),
        other => panic!("expected Adapter error, got {other:?}"),
    }
}

#[test]
fn changes_by_two_authors_carry_emails() {
    let (dir, repo) = create_test_repo();
    commit_as(
        &repo,
        ("Alice", "alice@test.com"),
        &[("x.py", "a\n")],
        "alice",
        1_000_000,
    );
    commit_as(
        &repo,
        ("Bob", "bob@test.com"),
        &[("x.py", "a\nb\n")],
        "bob",
        2_000_000,
    );

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let changes = git_repo.file_changes(None, None).unwrap();
    let authors: Vec<&str> = changes.iter().map(|c| c.author.as_str()).collect();
    assert_eq!(authors, vec!["alice@test.com", "bob@test.com"]);
}
