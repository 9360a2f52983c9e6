//! Collects the contents of local files, keyed by their basename.
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use snafu::{OptionExt, ResultExt, Snafu};

/// Maps file basenames to their full contents.
pub type FileEntries = BTreeMap<String, String>;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to list directory {path:?}"))]
    ListDirectory {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to resolve absolute path of {path:?}"))]
    ResolvePath {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to read file {path:?}"))]
    ReadFile {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("file name of {path:?} is not valid UTF-8"))]
    InvalidFileName { path: PathBuf },
}

/// Reads all files contained directly in `dirs`, followed by the files given in `paths`.
///
/// Directories are not descended into and paths that don't exist are skipped. If multiple files
/// share the same basename, the one processed last wins.
pub fn collect_files(
    dirs: &[impl AsRef<Path>],
    paths: &[impl AsRef<Path>],
) -> Result<FileEntries> {
    let mut candidates = Vec::new();

    for dir in dirs {
        candidates.extend(list_directory(dir.as_ref())?);
    }
    candidates.extend(paths.iter().map(|path| path.as_ref().to_path_buf()));

    let mut entries = FileEntries::new();

    for path in candidates {
        if path.as_os_str().is_empty() {
            tracing::info!("ignoring empty path");
            continue;
        }

        let path = std::path::absolute(&path).context(ResolvePathSnafu { path })?;

        if !path.exists() {
            tracing::info!(path = %path.display(), "ignoring path, it doesn't exist");
            continue;
        }

        if path.is_dir() {
            tracing::info!(path = %path.display(), "ignoring directory, only files can be uploaded");
            continue;
        }

        let key = basename(&path)?;
        let contents = fs::read_to_string(&path).context(ReadFileSnafu { path: &path })?;
        tracing::debug!(path = %path.display(), %key, "read file contents");

        entries.insert(key, contents);
    }

    Ok(entries)
}

/// Lists the non-directory entries of `dir`, ordered by file name.
fn list_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)
        .context(ListDirectorySnafu { path: dir })?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()
        .context(ListDirectorySnafu { path: dir })?;
    paths.sort();

    Ok(paths
        .into_iter()
        .filter(|path| {
            let is_dir = path.is_dir();
            if is_dir {
                tracing::info!(path = %path.display(), "ignoring subdirectory, no recursion supported");
            }
            !is_dir
        })
        .collect())
}

fn basename(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
        .context(InvalidFileNameSnafu { path })
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use tempfile::tempdir;

    use super::*;

    const NO_PATHS: &[&str] = &[];

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("write test file");
        path
    }

    #[test]
    fn collects_files_of_directory_without_recursion() {
        let temp_dir = tempdir().expect("create temporary directory");
        write(temp_dir.path(), "a.conf", "a");
        write(temp_dir.path(), "b.conf", "b");
        fs::create_dir(temp_dir.path().join("nested")).expect("create subdirectory");
        write(&temp_dir.path().join("nested"), "c.conf", "c");

        let entries = collect_files(&[temp_dir.path()], NO_PATHS).expect("collect files");

        assert_eq!(
            entries,
            FileEntries::from([
                ("a.conf".to_owned(), "a".to_owned()),
                ("b.conf".to_owned(), "b".to_owned()),
            ])
        );
    }

    #[test]
    fn skips_missing_paths_and_directories() {
        let temp_dir = tempdir().expect("create temporary directory");
        let existing = write(temp_dir.path(), "exists.yaml", "foo: bar\n");
        let missing = temp_dir.path().join("missing.yaml");
        let dir = temp_dir.path().join("dir");
        fs::create_dir(&dir).expect("create directory");

        let entries =
            collect_files(&[] as &[&Path], &[existing, missing, dir]).expect("collect files");

        assert_eq!(
            entries,
            FileEntries::from([("exists.yaml".to_owned(), "foo: bar\n".to_owned())])
        );
    }

    #[test]
    fn skips_empty_paths() {
        let temp_dir = tempdir().expect("create temporary directory");
        let existing = write(temp_dir.path(), "exists.yaml", "foo: bar\n");

        let entries =
            collect_files(&[] as &[&Path], &[PathBuf::new(), existing]).expect("collect files");

        assert_eq!(
            entries,
            FileEntries::from([("exists.yaml".to_owned(), "foo: bar\n".to_owned())])
        );
    }

    #[test]
    fn explicit_paths_win_over_directory_entries() {
        let temp_dir = tempdir().expect("create temporary directory");
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");
        fs::create_dir(&first).expect("create directory");
        fs::create_dir(&second).expect("create directory");

        write(&first, "app.conf", "from first dir");
        write(&second, "app.conf", "from second dir");
        let explicit = write(temp_dir.path(), "app.conf", "from explicit path");

        let entries = collect_files(&[&first, &second], NO_PATHS).expect("collect files");
        assert_eq!(entries["app.conf"], "from second dir");

        let entries = collect_files(&[&first, &second], &[explicit]).expect("collect files");
        assert_eq!(entries["app.conf"], "from explicit path");
    }

    #[test]
    fn paths_with_parent_components_are_keyed_by_basename() {
        let temp_dir = tempdir().expect("create temporary directory");
        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested).expect("create directory");
        write(&nested, "file.txt", "contents");

        let entries = collect_files(NO_PATHS, &[nested.join("..").join("nested/file.txt")])
            .expect("collect files");

        assert_eq!(
            entries,
            FileEntries::from([("file.txt".to_owned(), "contents".to_owned())])
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp_dir = tempdir().expect("create temporary directory");
        let missing = temp_dir.path().join("missing");

        let result = collect_files(&[&missing], NO_PATHS);

        assert!(matches!(result, Err(Error::ListDirectory { path, .. }) if path == missing));
    }

    #[test]
    fn non_utf8_contents_are_an_error() {
        let temp_dir = tempdir().expect("create temporary directory");
        let path = temp_dir.path().join("binary");
        fs::write(&path, [0xff, 0xfe, 0xfd]).expect("write test file");

        let result = collect_files(NO_PATHS, &[&path]);

        assert!(matches!(result, Err(Error::ReadFile { .. })));
    }

    #[test]
    fn empty_file_is_collected() {
        let temp_dir = tempdir().expect("create temporary directory");
        let path = temp_dir.path().join("empty");
        File::create(&path).expect("create empty file");

        let entries = collect_files(NO_PATHS, &[&path]).expect("collect files");

        assert_eq!(entries.get("empty").map(String::as_str), Some(""));
    }
}
