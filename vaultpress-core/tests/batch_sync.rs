//! Batch sync tests, including simulated write failures and cancellation.

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vaultpress_core::{
    CancelFlag, FileStat, FileSystem, PublishConfig, StdFs, Syncer,
};

/// Delegates to the real filesystem but refuses to write any path that
/// contains the configured marker, standing in for permission errors.
struct FailingFs {
    inner: StdFs,
    deny: &'static str,
}

impl FailingFs {
    fn denying(deny: &'static str) -> Self {
        Self { inner: StdFs, deny }
    }
}

impl FileSystem for FailingFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.inner.read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if path.to_string_lossy().contains(self.deny) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "simulated write failure",
            ));
        }
        self.inner.write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.inner.create_dir_all(path)
    }

    fn copy(&self, src: &Path, dst: &Path) -> io::Result<()> {
        self.inner.copy(src, dst)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.inner.remove_file(path)
    }

    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<String>> {
        self.inner.read_dir_names(path)
    }

    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        self.inner.stat(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }
}

fn write_note(dir: &Path, name: &str, content: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn note(title: &str, slug: &str, status: &str) -> String {
    format!("---\ntitle: {title}\nslug: {slug}\nstatus: {status}\n---\n\nBody of {title}.\n")
}

#[test]
fn test_partial_failure_continues_and_aggregates() {
    let tmp = TempDir::new().unwrap();
    let vault = tmp.path().join("vault");
    write_note(&vault, "alpha.md", &note("Alpha", "alpha", "published"));
    write_note(&vault, "boom.md", &note("Boom", "boom", "published"));
    write_note(&vault, "gamma.md", &note("Gamma", "gamma", "published"));
    write_note(&vault, "draft.md", &note("Unfinished", "unfinished", "draft"));

    let config = PublishConfig::new(&vault, tmp.path().join("site"));
    let fs = FailingFs::denying("boom");

    let seen = RefCell::new(Vec::new());
    let progress = |current: usize, total: usize, title: &str| {
        seen.borrow_mut().push((current, total, title.to_string()));
    };

    let result = Syncer::new(&fs, &config).sync_all(Some(&progress));

    assert_eq!(result.total, 3, "drafts are skipped, not attempted");
    assert_eq!(result.succeeded, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(result.succeeded + result.failed, result.total);

    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Boom: "), "errors: {:?}", result.errors);

    // The failure did not stop the articles after it
    assert!(tmp.path().join("site/alpha/index.md").exists());
    assert!(tmp.path().join("site/gamma/index.md").exists());
    assert!(!tmp.path().join("site/boom/index.md").exists());

    let seen = seen.borrow();
    assert_eq!(
        *seen,
        vec![
            (1, 3, "Alpha".to_string()),
            (2, 3, "Boom".to_string()),
            (3, 3, "Gamma".to_string()),
        ]
    );
}

#[test]
fn test_category_derived_from_subdirectory() {
    let tmp = TempDir::new().unwrap();
    let vault = tmp.path().join("vault");
    write_note(&vault.join("essays"), "one.md", &note("One", "one", "published"));
    write_note(&vault.join("journal"), "two.md", &note("Two", "two", "published"));

    let config = PublishConfig::new(&vault, tmp.path().join("site"));
    let result = Syncer::new(&StdFs, &config).sync_all(None);

    assert_eq!(result.total, 2);
    assert_eq!(result.failed, 0);
    assert!(tmp.path().join("site/essays/one/index.md").exists());
    assert!(tmp.path().join("site/journal/two/index.md").exists());
}

#[test]
fn test_category_scoped_sync() {
    let tmp = TempDir::new().unwrap();
    let vault = tmp.path().join("vault");
    write_note(&vault.join("essays"), "one.md", &note("One", "one", "published"));
    write_note(&vault.join("journal"), "two.md", &note("Two", "two", "published"));

    let config = PublishConfig::new(&vault, tmp.path().join("site"));
    let result = Syncer::new(&StdFs, &config).sync_category("essays", None);

    assert_eq!(result.total, 1);
    assert_eq!(result.succeeded, 1);
    assert!(tmp.path().join("site/essays/one/index.md").exists());
    assert!(!tmp.path().join("site/journal/two/index.md").exists());
}

#[test]
fn test_batch_profile_uses_leaf_bundle_links() {
    let tmp = TempDir::new().unwrap();
    let vault = tmp.path().join("vault");
    write_note(
        &vault,
        "linked.md",
        "---\ntitle: Linked\nslug: linked\nstatus: published\n---\n\nSee [[Other Note]].\n",
    );

    let config = PublishConfig::new(&vault, tmp.path().join("site"));
    let result = Syncer::new(&StdFs, &config).sync_all(None);
    assert_eq!(result.succeeded, 1);

    let written = std::fs::read_to_string(tmp.path().join("site/linked/index.md")).unwrap();
    assert!(
        written.contains("[Other Note](../other-note/)"),
        "unexpected body: {written}"
    );
}

#[test]
fn test_cancellation_stops_between_articles() {
    let tmp = TempDir::new().unwrap();
    let vault = tmp.path().join("vault");
    write_note(&vault, "first.md", &note("First", "first", "published"));
    write_note(&vault, "second.md", &note("Second", "second", "published"));

    let config = PublishConfig::new(&vault, tmp.path().join("site"));
    let flag = CancelFlag::new();

    let cancel_after_first = flag.clone();
    let progress = move |current: usize, _total: usize, _title: &str| {
        if current == 1 {
            cancel_after_first.cancel();
        }
    };

    let result = Syncer::new(&StdFs, &config)
        .with_cancel_flag(flag)
        .sync_all(Some(&progress));

    // The first article completes; the second is never attempted
    assert_eq!(result.total, 1);
    assert_eq!(result.succeeded, 1);
    assert_eq!(result.failed, 0);
    assert!(result.warnings.iter().any(|w| w.contains("cancelled")));
    assert!(tmp.path().join("site/first/index.md").exists());
    assert!(!tmp.path().join("site/second/index.md").exists());
}
