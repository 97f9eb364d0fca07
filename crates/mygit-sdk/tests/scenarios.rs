//! End-to-end workflows against a real directory.

use std::fs;
use std::path::Path;

use mygit_sdk::{CatMode, CatOutput, EntryMode, Head, ObjectId, ObjectKind, Repository, SdkError};

fn init() -> (tempfile::TempDir, Repository) {
    let dir = tempfile::tempdir().unwrap();
    let (repo, _) = Repository::init(dir.path()).unwrap();
    (dir, repo)
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn init_creates_layout() {
    let dir = tempfile::tempdir().unwrap();
    let (repo, report) = Repository::init(dir.path()).unwrap();
    let meta = dir.path().join(".mygit");
    assert!(meta.join("objects").is_dir());
    assert!(meta.join("refs").is_dir());
    assert!(meta.join("index").is_file());
    assert_eq!(
        fs::read_to_string(meta.join("HEAD")).unwrap(),
        "ref: refs/heads/main\n"
    );
    assert!(!report.reinitialized);
    assert_eq!(report.created, [".mygit", "objects", "refs", "HEAD", "index"]);
    assert_eq!(repo.head().unwrap(), Some(Head::initial()));
    assert_eq!(repo.head_commit().unwrap(), None);
}

#[test]
fn init_repairs_missing_pieces() {
    let dir = tempfile::tempdir().unwrap();
    Repository::init(dir.path()).unwrap();
    fs::remove_dir_all(dir.path().join(".mygit/refs")).unwrap();
    fs::remove_file(dir.path().join(".mygit/index")).unwrap();

    let (_repo, report) = Repository::init(dir.path()).unwrap();
    assert!(report.reinitialized);
    assert_eq!(report.created, ["refs", "index"]);

    let (_repo, report) = Repository::init(dir.path()).unwrap();
    assert!(report.created.is_empty());
}

#[test]
fn open_requires_metadata_dir() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Repository::open(dir.path()),
        Err(SdkError::NotInitialized(_))
    ));
}

#[test]
fn staging_hello_stores_known_blob() {
    let (dir, repo) = init();
    write(dir.path(), "a.txt", "hello");
    let staged = repo.stage(&["a.txt"]).unwrap();
    assert_eq!(staged.len(), 1);
    assert_eq!(staged[0].path, "a.txt");
    assert_eq!(
        staged[0].object_id.to_hex(),
        "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
    );
    let object = dir
        .path()
        .join(".mygit/objects/aa/f4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
    assert!(object.is_file());

    let ledger = fs::read_to_string(dir.path().join(".mygit/index")).unwrap();
    assert_eq!(ledger, "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d a.txt\n");
}

#[test]
fn staging_directory_walks_recursively() {
    let (dir, repo) = init();
    write(dir.path(), "src/main.rs", "fn main() {}");
    write(dir.path(), "src/util/mod.rs", "");
    let staged = repo.stage(&["src"]).unwrap();
    let paths: Vec<_> = staged.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["src/main.rs", "src/util/mod.rs"]);
}

#[test]
fn staging_root_skips_metadata() {
    let (dir, repo) = init();
    write(dir.path(), "a.txt", "a");
    let staged = repo.stage(&["."]).unwrap();
    assert_eq!(staged.len(), 1);
    assert_eq!(staged[0].path, "a.txt");
}

#[test]
fn staging_rejects_bad_paths() {
    let (_dir, repo) = init();
    assert!(matches!(
        repo.stage(&["missing.txt"]),
        Err(SdkError::InvalidPath { .. })
    ));
    assert!(matches!(
        repo.stage(&[".mygit/HEAD"]),
        Err(SdkError::InvalidPath { .. })
    ));
}

#[test]
fn first_commit_records_single_blob() {
    let (dir, repo) = init();
    write(dir.path(), "a.txt", "hello");
    repo.stage(&["a.txt"]).unwrap();

    let outcome = repo.commit("init").unwrap();
    assert_eq!(outcome.parent, None);
    assert_eq!(outcome.staged, 1);
    assert_eq!(repo.head().unwrap(), Some(Head::Direct(outcome.id)));
    assert_eq!(
        fs::read_to_string(dir.path().join(".mygit/HEAD")).unwrap(),
        format!("{}\n", outcome.id)
    );

    let tree = repo.ls_tree(&outcome.tree).unwrap();
    assert_eq!(tree.len(), 1);
    let entry = &tree.entries[0];
    assert_eq!(entry.name, "a.txt");
    assert_eq!(entry.mode, EntryMode::Regular);
    assert_eq!(entry.object_id.to_hex(), "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");

    // Ledger is cleared and the next commit needs new staging.
    assert!(repo.staged().unwrap().is_empty());
    assert!(matches!(repo.commit("again"), Err(SdkError::NothingStaged)));
}

#[test]
fn commit_without_staging_is_refused() {
    let (dir, repo) = init();
    write(dir.path(), "a.txt", "hello");
    assert!(matches!(repo.commit("nothing"), Err(SdkError::NothingStaged)));
    assert_eq!(repo.head_commit().unwrap(), None);
}

#[test]
fn checkout_restores_earlier_commit() {
    let (dir, repo) = init();
    let root = dir.path();
    write(root, "a.txt", "hello");
    repo.stage(&["a.txt"]).unwrap();
    let first = repo.commit("init").unwrap();

    write(root, "b.txt", "second file");
    write(root, "a.txt", "changed");
    repo.stage(&["b.txt"]).unwrap();
    let second = repo.commit("add b").unwrap();
    assert_eq!(second.parent, Some(first.id));

    let report = repo.checkout(&first.id).unwrap();
    assert_eq!(report.files, 1);
    assert!(!root.join("b.txt").exists());
    assert_eq!(fs::read_to_string(root.join("a.txt")).unwrap(), "hello");
    assert_eq!(repo.head().unwrap(), Some(Head::Direct(first.id)));
    assert!(root.join(".mygit/objects").is_dir());

    // Rebuilding the restored directory reproduces the commit's tree.
    assert_eq!(repo.write_tree().unwrap(), first.tree);

    // And the later commit is still reachable.
    repo.checkout(&second.id).unwrap();
    assert_eq!(fs::read_to_string(root.join("b.txt")).unwrap(), "second file");
    assert_eq!(fs::read_to_string(root.join("a.txt")).unwrap(), "changed");
}

#[cfg(unix)]
#[test]
fn checkout_preserves_executable_mode() {
    use std::os::unix::fs::PermissionsExt;

    let (dir, repo) = init();
    let root = dir.path();
    write(root, "run.sh", "#!/bin/sh\necho hi\n");
    fs::set_permissions(root.join("run.sh"), fs::Permissions::from_mode(0o755)).unwrap();
    repo.stage(&["run.sh"]).unwrap();
    let commit = repo.commit("script").unwrap();

    fs::remove_file(root.join("run.sh")).unwrap();
    repo.checkout(&commit.id).unwrap();
    let mode = fs::metadata(root.join("run.sh")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[test]
fn checkout_of_unknown_commit_leaves_tree_alone() {
    let (dir, repo) = init();
    write(dir.path(), "keep.txt", "keep");
    let ghost = ObjectId::from_hash([0x42; 20]);
    assert!(matches!(
        repo.checkout(&ghost),
        Err(SdkError::ObjectNotFound(id)) if id == ghost
    ));
    assert!(dir.path().join("keep.txt").is_file());
}

#[test]
fn log_walks_newest_first() {
    let (dir, repo) = init();
    assert!(repo.log().unwrap().is_empty());
    let mut ids = Vec::new();
    for (i, msg) in ["one", "two", "three"].iter().enumerate() {
        write(dir.path(), &format!("f{i}.txt"), msg);
        repo.stage(&[format!("f{i}.txt")]).unwrap();
        ids.push(repo.commit(msg).unwrap().id);
    }
    let log = repo.log().unwrap();
    let messages: Vec<_> = log.iter().map(|e| e.commit.message.as_str()).collect();
    assert_eq!(messages, ["three", "two", "one"]);
    assert_eq!(log[0].id, ids[2]);
    assert!(log[2].commit.parent.is_none());
}

#[test]
fn nested_edit_changes_every_ancestor() {
    let (dir, repo) = init();
    write(dir.path(), "a/b/c.txt", "one");
    write(dir.path(), "z.txt", "z");
    let before = repo.write_tree().unwrap();
    assert_eq!(repo.write_tree().unwrap(), before);

    write(dir.path(), "a/b/c.txt", "two");
    let after = repo.write_tree().unwrap();
    assert_ne!(before, after);

    let a_before = repo.ls_tree(&before).unwrap().get("a").unwrap().object_id;
    let a_after = repo.ls_tree(&after).unwrap().get("a").unwrap().object_id;
    assert_ne!(a_before, a_after);
    let z_before = repo.ls_tree(&before).unwrap().get("z.txt").unwrap().object_id;
    let z_after = repo.ls_tree(&after).unwrap().get("z.txt").unwrap().object_id;
    assert_eq!(z_before, z_after);
}

#[test]
fn cat_file_modes() {
    let (dir, repo) = init();
    write(dir.path(), "a.txt", "hello");
    repo.stage(&["a.txt"]).unwrap();
    let outcome = repo.commit("init").unwrap();
    let blob = repo.hash_object("a.txt", false).unwrap();

    assert_eq!(
        repo.cat_file(CatMode::Pretty, &blob).unwrap(),
        CatOutput::Pretty(b"hello".to_vec())
    );
    assert_eq!(repo.cat_file(CatMode::Size, &blob).unwrap(), CatOutput::Size(5));
    assert_eq!(
        repo.cat_file(CatMode::Type, &blob).unwrap(),
        CatOutput::Type(ObjectKind::Blob)
    );
    assert_eq!(
        repo.cat_file(CatMode::Type, &outcome.tree).unwrap(),
        CatOutput::Type(ObjectKind::Tree)
    );
    assert_eq!(
        repo.cat_file(CatMode::Type, &outcome.id).unwrap(),
        CatOutput::Type(ObjectKind::Commit)
    );
}

#[test]
fn hash_object_write_flag() {
    let (dir, repo) = init();
    write(dir.path(), "note.txt", "only hashed");
    let id = repo.hash_object("note.txt", false).unwrap();
    assert!(!repo.layout().objects_dir().join(id.shard().0).join(id.shard().1).exists());
    assert_eq!(repo.hash_object("note.txt", true).unwrap(), id);
    assert!(repo.store().path_for(&id).is_file());
}

#[test]
fn config_file_controls_committer_and_order() {
    let (dir, _) = init();
    fs::write(
        dir.path().join(".mygit/config.toml"),
        "[committer]\nname = \"alice\"\nemail = \"alice@example.org\"\n\n[commit]\nutc_offset = \"+0000\"\n",
    )
    .unwrap();
    let repo = Repository::open(dir.path()).unwrap();
    write(dir.path(), "a.txt", "a");
    repo.stage(&["a.txt"]).unwrap();
    let outcome = repo.commit("configured").unwrap();

    let raw = match repo.cat_file(CatMode::Pretty, &outcome.id).unwrap() {
        CatOutput::Pretty(bytes) => String::from_utf8(bytes).unwrap(),
        other => panic!("unexpected {other:?}"),
    };
    let committer_line = raw.lines().find(|l| l.starts_with("Committer ")).unwrap();
    // Environment overrides may be set on the machine running the tests.
    if std::env::var("MYGIT_COMMITTER_NAME").is_err() && std::env::var("MYGIT_COMMITTER_EMAIL").is_err() {
        assert_eq!(committer_line, "Committer alice <alice@example.org>");
    }
    assert!(raw.lines().any(|l| l.starts_with("Timestamp ") && l.ends_with(" +0000")));
}

#[test]
fn filesystem_order_from_config() {
    let (dir, _) = init();
    fs::write(dir.path().join(".mygit/config.toml"), "[tree]\norder = \"filesystem\"\n").unwrap();
    let repo = Repository::open(dir.path()).unwrap();
    for name in ["zeta.txt", "alpha.txt", "mid.txt", "Beta.txt"] {
        write(dir.path(), name, name);
    }
    let listed: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|item| item.unwrap().file_name().into_string().unwrap())
        .filter(|name| name != ".mygit")
        .collect();

    let tree = repo.write_tree().unwrap();
    let names: Vec<String> = repo
        .ls_tree(&tree)
        .unwrap()
        .entries
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, listed);

    repo.stage(&["alpha.txt"]).unwrap();
    let outcome = repo.commit("unsorted").unwrap();
    assert_eq!(outcome.tree, tree);
}

#[test]
fn broken_config_is_reported() {
    let (dir, _) = init();
    fs::write(dir.path().join(".mygit/config.toml"), "[tree]\norder = \"chaos\"\n").unwrap();
    assert!(matches!(
        Repository::open(dir.path()),
        Err(SdkError::Config(_))
    ));
}
