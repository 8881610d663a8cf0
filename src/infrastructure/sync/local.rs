//! Local Transport
//!
//! Mirrors directories on this machine, for jobs whose worker is the
//! loopback host. Filter and delete behavior follow rsync: the first
//! matching filter decides an entry, excluded directories are not entered,
//! excluded destination entries survive `--delete`, and symlinks are copied
//! as links.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::debug;

use super::ssh;
use crate::domain::ports::{CopyRequest, Filter, Location, RemoteTransport};
use crate::domain::value_objects::Endpoint;
use crate::error::TransportError;

/// Same-host transport
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTransport;

impl LocalTransport {
    fn local_path(location: &Location) -> Result<PathBuf, TransportError> {
        match location {
            Location::Local(path) => Ok(PathBuf::from(path)),
            Location::Remote { endpoint, path } if endpoint.is_loopback() => {
                Ok(PathBuf::from(path))
            }
            Location::Remote { endpoint, .. } => Err(TransportError::Unsupported(format!(
                "{} is not a local host",
                endpoint.host()
            ))),
        }
    }
}

impl RemoteTransport for LocalTransport {
    fn name(&self) -> &'static str {
        "local"
    }

    fn copy(&self, request: &CopyRequest) -> Result<(), TransportError> {
        let source = Self::local_path(&request.source)?;
        let destination = Self::local_path(&request.destination)?;
        debug!(
            source = %source.display(),
            destination = %destination.display(),
            "mirroring locally"
        );

        if !source.is_dir() {
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("source directory {} does not exist", source.display()),
            )));
        }

        let real_source = fs::canonicalize(&source)?;
        let real_destination = resolve(&destination)?;
        if real_source == real_destination {
            debug!(path = %real_source.display(), "source and destination coincide");
            return Ok(());
        }
        if real_destination.starts_with(&real_source) || real_source.starts_with(&real_destination)
        {
            return Err(TransportError::Unsupported(format!(
                "cannot mirror {} into {}: one contains the other",
                real_source.display(),
                real_destination.display()
            )));
        }

        let matcher = FilterMatcher::new(&source, &request.filters)?;
        fs::create_dir_all(&destination)?;
        copy_tree(&source, &destination, Path::new(""), &matcher)?;
        if request.delete_extraneous {
            prune_tree(&source, &destination, Path::new(""), &matcher)?;
        }
        Ok(())
    }

    fn exec(&self, endpoint: &Endpoint, command: &str) -> Result<String, TransportError> {
        if !endpoint.is_loopback() {
            return Err(TransportError::Unsupported(format!(
                "{} is not a local host",
                endpoint.host()
            )));
        }
        let args = if cfg!(windows) {
            vec!["/C".to_string(), command.to_string()]
        } else {
            vec!["-c".to_string(), command.to_string()]
        };
        let shell = if cfg!(windows) { "cmd" } else { "sh" };
        let output = ssh::run(shell, &args, &endpoint.login())?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Ordered include/exclude rules evaluated against source-relative paths
struct FilterMatcher {
    rules: Gitignore,
}

impl FilterMatcher {
    fn new(root: &Path, filters: &[Filter]) -> Result<Self, TransportError> {
        // gitignore is last-match-wins, rsync first-match-wins
        let mut builder = GitignoreBuilder::new(root);
        for filter in filters.iter().rev() {
            let line = match filter {
                Filter::Include(pattern) => format!("!{}", pattern),
                Filter::Exclude(pattern) => pattern.clone(),
            };
            builder.add_line(None, &line).map_err(|e| {
                TransportError::Unsupported(format!("invalid filter '{}': {}", line, e))
            })?;
        }
        let rules = builder
            .build()
            .map_err(|e| TransportError::Unsupported(format!("invalid filters: {}", e)))?;
        Ok(Self { rules })
    }

    fn is_excluded(&self, relative: &Path, is_dir: bool) -> bool {
        self.rules.matched(relative, is_dir).is_ignore()
    }
}

/// `path` with symlinks resolved, for paths that may not exist yet
fn resolve(path: &Path) -> io::Result<PathBuf> {
    let mut missing = Vec::new();
    let mut current = path;
    loop {
        match fs::canonicalize(current) {
            Ok(mut real) => {
                real.extend(missing.iter().rev());
                return Ok(real);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let (Some(parent), Some(name)) = (current.parent(), current.file_name()) else {
                    return Err(e);
                };
                missing.push(name.to_os_string());
                current = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
            }
            Err(e) => return Err(e),
        }
    }
}

/// Remove whatever sits at `target`, keeping a real directory if `keep_dir`
fn clear_target(target: &Path, keep_dir: bool) -> io::Result<()> {
    match fs::symlink_metadata(target) {
        Ok(meta) if meta.is_dir() => {
            if keep_dir {
                Ok(())
            } else {
                fs::remove_dir_all(target)
            }
        }
        Ok(_) => fs::remove_file(target),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn copy_link(link: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(link)?, target)
}

#[cfg(windows)]
fn copy_link(link: &Path, target: &Path) -> io::Result<()> {
    let pointee = fs::read_link(link)?;
    if fs::metadata(link).map(|m| m.is_dir()).unwrap_or(false) {
        std::os::windows::fs::symlink_dir(pointee, target)
    } else {
        std::os::windows::fs::symlink_file(pointee, target)
    }
}

fn copy_tree(
    source_root: &Path,
    destination_root: &Path,
    relative: &Path,
    matcher: &FilterMatcher,
) -> io::Result<()> {
    for entry in fs::read_dir(source_root.join(relative))? {
        let entry = entry?;
        let entry_relative = relative.join(entry.file_name());
        // file_type does not follow symlinks
        let file_type = entry.file_type()?;
        if matcher.is_excluded(&entry_relative, file_type.is_dir()) {
            continue;
        }

        let target = destination_root.join(&entry_relative);
        if file_type.is_dir() {
            clear_target(&target, true)?;
            fs::create_dir_all(&target)?;
            copy_tree(source_root, destination_root, &entry_relative, matcher)?;
        } else if file_type.is_symlink() {
            clear_target(&target, false)?;
            copy_link(&entry.path(), &target)?;
        } else {
            clear_target(&target, false)?;
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn prune_tree(
    source_root: &Path,
    destination_root: &Path,
    relative: &Path,
    matcher: &FilterMatcher,
) -> io::Result<()> {
    for entry in fs::read_dir(destination_root.join(relative))? {
        let entry = entry?;
        let entry_relative = relative.join(entry.file_name());
        let is_dir = entry.file_type()?.is_dir();
        if matcher.is_excluded(&entry_relative, is_dir) {
            continue;
        }

        match fs::symlink_metadata(source_root.join(&entry_relative)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if is_dir {
                    fs::remove_dir_all(entry.path())?;
                } else {
                    fs::remove_file(entry.path())?;
                }
            }
            Err(e) => return Err(e),
            Ok(counterpart) if is_dir && counterpart.is_dir() => {
                prune_tree(source_root, destination_root, &entry_relative, matcher)?;
            }
            Ok(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Platform;
    use tempfile::tempdir;

    fn local(path: &Path) -> Location {
        Location::Local(path.display().to_string())
    }

    #[test]
    fn mirrors_nested_tree() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        fs::create_dir_all(src.join("a/b")).unwrap();
        fs::write(src.join("a/b/c.txt"), "c").unwrap();
        fs::write(src.join("top.txt"), "t").unwrap();

        LocalTransport
            .copy(&CopyRequest::new(local(&src), local(&dst)))
            .unwrap();

        assert_eq!(fs::read_to_string(dst.join("a/b/c.txt")).unwrap(), "c");
        assert_eq!(fs::read_to_string(dst.join("top.txt")).unwrap(), "t");
    }

    #[test]
    fn delete_removes_extraneous_but_keeps_excluded() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(dst.join("stale_dir")).unwrap();
        fs::write(src.join("keep.txt"), "k").unwrap();
        fs::write(dst.join("stale.txt"), "s").unwrap();
        fs::write(dst.join("local.lock"), "l").unwrap();

        let request = CopyRequest::new(local(&src), local(&dst))
            .with_delete()
            .with_filters(Filter::excluding(&["*.lock"]));
        LocalTransport.copy(&request).unwrap();

        assert!(dst.join("keep.txt").exists());
        assert!(!dst.join("stale.txt").exists());
        assert!(!dst.join("stale_dir").exists());
        assert!(dst.join("local.lock").exists());
    }

    #[test]
    fn first_matching_filter_wins() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        fs::create_dir_all(src.join("pkg")).unwrap();
        fs::write(src.join("Pipfile"), "p").unwrap();
        fs::write(src.join("requirements.txt"), "r").unwrap();
        fs::write(src.join("main.py"), "m").unwrap();
        fs::write(src.join("pkg/mod.py"), "m").unwrap();

        let request = CopyRequest::new(local(&src), local(&dst)).with_filters(vec![
            Filter::Include("Pipfile".to_string()),
            Filter::Include("requirements.txt".to_string()),
            Filter::Exclude("*".to_string()),
        ]);
        LocalTransport.copy(&request).unwrap();

        assert!(dst.join("Pipfile").exists());
        assert!(dst.join("requirements.txt").exists());
        assert!(!dst.join("main.py").exists());
        assert!(!dst.join("pkg").exists());
    }

    #[test]
    fn copy_onto_itself_leaves_files_intact() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Pipfile"), "[packages]").unwrap();

        let request = CopyRequest::new(local(dir.path()), local(dir.path())).with_delete();
        LocalTransport.copy(&request).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("Pipfile")).unwrap(),
            "[packages]"
        );
    }

    #[cfg(unix)]
    #[test]
    fn copy_through_symlinked_alias_leaves_files_intact() {
        let dir = tempdir().unwrap();
        let results = dir.path().join("results");
        fs::create_dir_all(&results).unwrap();
        fs::write(results.join("model.pt"), "weights").unwrap();
        let alias = dir.path().join("alias");
        std::os::unix::fs::symlink(&results, &alias).unwrap();

        let request = CopyRequest::new(local(&alias), local(&results)).with_delete();
        LocalTransport.copy(&request).unwrap();

        assert_eq!(fs::read_to_string(results.join("model.pt")).unwrap(), "weights");
    }

    #[test]
    fn copy_through_parent_segments_onto_itself_is_a_no_op() {
        let dir = tempdir().unwrap();
        let results = dir.path().join("results");
        fs::create_dir_all(dir.path().join("x")).unwrap();
        fs::create_dir_all(&results).unwrap();
        fs::write(results.join("model.pt"), "weights").unwrap();

        let request = CopyRequest::new(local(&dir.path().join("x/../results")), local(&results));
        LocalTransport.copy(&request).unwrap();

        assert_eq!(fs::read_to_string(results.join("model.pt")).unwrap(), "weights");
    }

    #[test]
    fn destination_inside_source_is_rejected() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("r");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.txt"), "a").unwrap();

        let request = CopyRequest::new(local(&src), local(&src.join("copy")));
        assert!(matches!(
            LocalTransport.copy(&request),
            Err(TransportError::Unsupported(_))
        ));
        assert!(!src.join("copy").exists());
    }

    #[test]
    fn source_inside_destination_is_rejected() {
        let dir = tempdir().unwrap();
        let dst = dir.path().join("r");
        fs::create_dir_all(dst.join("sub")).unwrap();
        fs::write(dst.join("sub/a.txt"), "a").unwrap();

        let request = CopyRequest::new(local(&dst.join("sub")), local(&dst)).with_delete();
        assert!(matches!(
            LocalTransport.copy(&request),
            Err(TransportError::Unsupported(_))
        ));
        assert!(dst.join("sub/a.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_copied_as_links() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("data.bin"), "d").unwrap();
        // A link back to an ancestor must not be descended into
        std::os::unix::fs::symlink(&src, src.join("loop")).unwrap();
        std::os::unix::fs::symlink("data.bin", src.join("latest")).unwrap();

        LocalTransport
            .copy(&CopyRequest::new(local(&src), local(&dst)).with_delete())
            .unwrap();

        let looped = fs::symlink_metadata(dst.join("loop")).unwrap();
        assert!(looped.file_type().is_symlink());
        assert_eq!(fs::read_link(dst.join("loop")).unwrap(), src);
        assert_eq!(fs::read_link(dst.join("latest")).unwrap(), PathBuf::from("data.bin"));
        assert_eq!(fs::read_to_string(dst.join("latest")).unwrap(), "d");
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempdir().unwrap();
        let request = CopyRequest::new(
            local(&dir.path().join("missing")),
            local(&dir.path().join("dst")),
        );
        assert!(LocalTransport.copy(&request).is_err());
    }

    #[test]
    fn remote_non_loopback_is_unsupported() {
        let dir = tempdir().unwrap();
        let request = CopyRequest::new(
            local(dir.path()),
            Location::Remote {
                endpoint: Endpoint::new("a", "gpu-box", 22, Platform::Linux),
                path: "/home/a".to_string(),
            },
        );
        assert!(matches!(
            LocalTransport.copy(&request),
            Err(TransportError::Unsupported(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn exec_runs_on_loopback() {
        let endpoint = Endpoint::new("a", "localhost", 22, Platform::Linux);
        let out = LocalTransport.exec(&endpoint, "echo ready && echo set").unwrap();
        assert_eq!(out, "ready\nset\n");
    }

    #[cfg(unix)]
    #[test]
    fn exec_reports_non_zero_exit() {
        let endpoint = Endpoint::new("a", "localhost", 22, Platform::Linux);
        let err = LocalTransport.exec(&endpoint, "exit 3").unwrap_err();
        assert!(matches!(err, TransportError::CommandFailed { code: Some(3), .. }));
    }
}
