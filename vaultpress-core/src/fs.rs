//! Filesystem access behind an injectable trait.
//!
//! Orchestrators take `&dyn FileSystem` per operation instead of touching
//! shared globals, so batch failure behavior can be exercised in tests
//! with a simulated filesystem.

use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The subset of `stat` metadata the pipeline needs
#[derive(Debug, Clone, Copy)]
pub struct FileStat {
    pub is_dir: bool,
    pub modified: Option<DateTime<Utc>>,
}

/// Filesystem operations consumed by the publish and sync pipelines
pub trait FileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    fn copy(&self, src: &Path, dst: &Path) -> io::Result<()>;
    fn remove_file(&self, path: &Path) -> io::Result<()>;
    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<String>>;
    fn stat(&self, path: &Path) -> io::Result<FileStat>;
    fn exists(&self, path: &Path) -> bool;

    /// Recursively collect markdown files under `root`, sorted so batch
    /// processing order is deterministic.
    fn walk_markdown(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        fn walk<F: FileSystem + ?Sized>(
            fs: &F,
            dir: &Path,
            out: &mut Vec<PathBuf>,
        ) -> io::Result<()> {
            for name in fs.read_dir_names(dir)? {
                let path = dir.join(&name);
                if fs.stat(&path)?.is_dir {
                    walk(fs, &path, out)?;
                } else if path.extension().is_some_and(|ext| ext == "md") {
                    out.push(path);
                }
            }
            Ok(())
        }

        let mut files = Vec::new();
        walk(self, root, &mut files)?;
        files.sort();
        Ok(files)
    }
}

/// Real filesystem backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl FileSystem for StdFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn copy(&self, src: &Path, dst: &Path) -> io::Result<()> {
        std::fs::copy(src, dst).map(|_| ())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let meta = std::fs::metadata(path)?;
        Ok(FileStat {
            is_dir: meta.is_dir(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn walk_markdown(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_markdown_finds_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("essays/deep")).unwrap();
        std::fs::write(dir.path().join("a.md"), "a").unwrap();
        std::fs::write(dir.path().join("essays/b.md"), "b").unwrap();
        std::fs::write(dir.path().join("essays/deep/c.md"), "c").unwrap();
        std::fs::write(dir.path().join("essays/skip.txt"), "x").unwrap();

        let files = StdFs.walk_markdown(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(files.len(), 3);
        assert!(names.contains(&"a.md"));
        assert!(names.contains(&"b.md"));
        assert!(names.contains(&"c.md"));
    }

    #[test]
    fn test_default_walk_matches_walkdir() {
        // The trait's default recursion and the walkdir override must agree
        struct Plain(StdFs);
        impl FileSystem for Plain {
            fn read_to_string(&self, path: &Path) -> io::Result<String> {
                self.0.read_to_string(path)
            }
            fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
                self.0.write(path, contents)
            }
            fn create_dir_all(&self, path: &Path) -> io::Result<()> {
                self.0.create_dir_all(path)
            }
            fn copy(&self, src: &Path, dst: &Path) -> io::Result<()> {
                self.0.copy(src, dst)
            }
            fn remove_file(&self, path: &Path) -> io::Result<()> {
                self.0.remove_file(path)
            }
            fn read_dir_names(&self, path: &Path) -> io::Result<Vec<String>> {
                self.0.read_dir_names(path)
            }
            fn stat(&self, path: &Path) -> io::Result<FileStat> {
                self.0.stat(path)
            }
            fn exists(&self, path: &Path) -> bool {
                self.0.exists(path)
            }
        }

        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("one.md"), "1").unwrap();
        std::fs::write(dir.path().join("sub/two.md"), "2").unwrap();

        let via_default = Plain(StdFs).walk_markdown(dir.path()).unwrap();
        let via_walkdir = StdFs.walk_markdown(dir.path()).unwrap();
        assert_eq!(via_default, via_walkdir);
    }
}
