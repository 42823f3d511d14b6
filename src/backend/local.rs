use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::backend::{RemoteFileSystem, WalkEntry};
use crate::error::FsError;

/// Local filesystem backend using std::fs.
#[derive(Debug, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        LocalFileSystem
    }
}

/// Native recursive walk over directories only.
///
/// `walkdir` drives the recursion; each directory it reaches is listed with
/// `read_dir` to build the triple. Symlinks are reported but not followed.
pub struct LocalWalk {
    inner: walkdir::FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>,
}

fn is_dir_entry(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
}

impl LocalWalk {
    fn new(root: &Path) -> Self {
        let filter: fn(&DirEntry) -> bool = is_dir_entry;
        LocalWalk {
            inner: WalkDir::new(root).into_iter().filter_entry(filter),
        }
    }
}

impl Iterator for LocalWalk {
    type Item = Result<WalkEntry, FsError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(entry) => match list_dir(entry.path()) {
                    Ok(triple) => return Some(Ok(triple)),
                    Err(e) => {
                        tracing::warn!("Skipping unreadable directory {}: {}", entry.path().display(), e);
                    }
                },
                Err(e) => {
                    let err = FsError::from(e);
                    tracing::warn!("Skipping directory during walk: {}", err);
                }
            }
        }
    }
}

/// List one directory, classifying entries the way a native walk does:
/// a symlink pointing at a directory counts as a directory name.
fn list_dir(dir: &Path) -> Result<WalkEntry, FsError> {
    let mut triple = WalkEntry::new(dir.to_string_lossy());

    for entry_result in std::fs::read_dir(dir)? {
        let entry = entry_result?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = match entry.file_type() {
            Ok(ft) if ft.is_symlink() => std::fs::metadata(entry.path())
                .map(|m| m.is_dir())
                .unwrap_or(false),
            Ok(ft) => ft.is_dir(),
            Err(_) => false,
        };
        if is_dir {
            triple.dirnames.push(name);
        } else {
            triple.filenames.push(name);
        }
    }

    Ok(triple)
}

impl RemoteFileSystem for LocalFileSystem {
    type Walk<'a> = LocalWalk;

    fn walk<'a>(&'a mut self, path: &str) -> LocalWalk {
        LocalWalk::new(Path::new(path))
    }

    fn get_size(&mut self, path: &str) -> u64 {
        std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
    }

    fn exists(&mut self, path: &str) -> bool {
        !path.is_empty() && Path::new(path).exists()
    }

    fn is_dir(&mut self, path: &str) -> bool {
        !path.is_empty() && Path::new(path).is_dir()
    }

    fn join(&self, segments: &[&str]) -> String {
        let mut joined = PathBuf::new();
        for segment in segments.iter().filter(|s| !s.is_empty()) {
            joined.push(segment);
        }
        joined.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("movies/2023")).unwrap();
        fs::create_dir_all(root.join("shows/empty")).unwrap();
        fs::write(root.join("readme.txt"), b"hi").unwrap();
        fs::write(root.join("movies/ABC-123.mp4"), b"0123456789").unwrap();
        fs::write(root.join("movies/2023/XYZ-001.mkv"), b"x").unwrap();
        dir
    }

    fn collect(root: &Path) -> HashMap<String, WalkEntry> {
        let mut fs = LocalFileSystem::new();
        fs.walk(&root.to_string_lossy())
            .map(|e| e.expect("local walk yields no errors"))
            .map(|e| {
                let rel = Path::new(&e.dirpath)
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/");
                (rel, e)
            })
            .collect()
    }

    #[test]
    fn walk_visits_every_directory_once() {
        let dir = sample_tree();
        let visited = collect(dir.path());
        let mut keys: Vec<&str> = visited.keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["", "movies", "movies/2023", "shows", "shows/empty"]);
    }

    #[test]
    fn walk_classifies_names() {
        let dir = sample_tree();
        let visited = collect(dir.path());

        let root = &visited[""];
        let mut dirs = root.dirnames.clone();
        dirs.sort();
        assert_eq!(dirs, vec!["movies", "shows"]);
        assert_eq!(root.filenames, vec!["readme.txt"]);

        let movies = &visited["movies"];
        assert_eq!(movies.dirnames, vec!["2023"]);
        assert_eq!(movies.filenames, vec!["ABC-123.mp4"]);

        let empty = &visited["shows/empty"];
        assert!(empty.dirnames.is_empty());
        assert!(empty.filenames.is_empty());
    }

    #[test]
    fn walk_nonexistent_root_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let mut fs = LocalFileSystem::new();
        assert_eq!(fs.walk(&missing.to_string_lossy()).count(), 0);
    }

    #[test]
    fn walk_file_root_yields_nothing() {
        let dir = sample_tree();
        let file = dir.path().join("readme.txt");
        let mut fs = LocalFileSystem::new();
        assert_eq!(fs.walk(&file.to_string_lossy()).count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_named_but_not_descended() {
        let dir = sample_tree();
        std::os::unix::fs::symlink(dir.path().join("movies"), dir.path().join("link")).unwrap();
        let visited = collect(dir.path());
        assert!(visited[""].dirnames.contains(&"link".to_string()));
        assert!(!visited.contains_key("link"));
    }

    #[test]
    fn probes_on_existing_paths() {
        let dir = sample_tree();
        let mut fs = LocalFileSystem::new();
        let movie = dir.path().join("movies/ABC-123.mp4");
        let movie = movie.to_string_lossy();
        assert!(fs.exists(&movie));
        assert!(!fs.is_dir(&movie));
        assert_eq!(fs.get_size(&movie), 10);

        let movies = dir.path().join("movies");
        assert!(fs.is_dir(&movies.to_string_lossy()));
    }

    #[test]
    fn probes_never_fail() {
        let mut fs = LocalFileSystem::new();
        for path in ["", "/definitely/not/here", "bad\0byte", "?*<>|"] {
            assert!(!fs.exists(path));
            assert!(!fs.is_dir(path));
            assert_eq!(fs.get_size(path), 0);
        }
    }

    #[test]
    fn join_uses_native_semantics() {
        let fs = LocalFileSystem::new();
        let expected = PathBuf::from("a/").join("/b").join("c");
        assert_eq!(fs.join(&["a/", "/b", "c"]), expected.to_string_lossy());
        assert_eq!(
            fs.join(&["media", "", "clip.mp4"]),
            Path::new("media").join("clip.mp4").to_string_lossy()
        );
        assert_eq!(fs.join(&[]), "");
    }
}
