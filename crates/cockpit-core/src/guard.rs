//! Containment check for filesystem writes.
//!
//! A write target is resolved against the project root component by
//! component. Existing prefixes are canonicalized. A symbolic link that
//! cannot be canonicalized because its target does not exist yet is read and
//! followed anyway, since writing through it would create that target.
//! Components that do not exist are normalized lexically. The result must lie
//! inside the canonical root, compared component by component.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::GuardError;

/// Symbolic links followed before giving up, matching the usual `ELOOP` limit.
const MAX_LINK_HOPS: usize = 40;

/// Resolve `relative` against `root` and ensure it stays inside `root`.
///
/// Absolute `relative` paths replace the root entirely and are only accepted
/// if they happen to point inside it.
///
/// # Errors
///
/// Returns [`GuardError::OutsideRoot`] if the resolved path escapes the root,
/// [`GuardError::Unresolvable`] if an existing part of the target cannot be
/// resolved (including symbolic link loops), or [`GuardError::Root`] if the
/// root cannot be canonicalized.
pub fn resolve_contained(root: &Path, relative: &str) -> Result<PathBuf, GuardError> {
    let root = root.canonicalize().map_err(|source| GuardError::Root {
        path: root.to_path_buf(),
        source,
    })?;

    let target = resolve_lenient(&root.join(relative))?;
    if target.starts_with(&root) {
        Ok(target)
    } else {
        tracing::warn!(
            root = %root.display(),
            target = %target.display(),
            "Rejected write outside project root"
        );
        Err(GuardError::OutsideRoot { path: target })
    }
}

fn resolve_lenient(path: &Path) -> Result<PathBuf, GuardError> {
    let mut resolved = PathBuf::new();
    let mut pending = path.to_path_buf();
    let mut hops = 0;

    'walk: loop {
        let mut components = pending.components();
        while let Some(component) = components.next() {
            match component {
                Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::Normal(name) => {
                    resolved.push(name);
                    if let Ok(real) = resolved.canonicalize() {
                        resolved = real;
                        continue;
                    }
                    match fs::symlink_metadata(&resolved) {
                        Ok(meta) if meta.file_type().is_symlink() => {
                            hops += 1;
                            if hops > MAX_LINK_HOPS {
                                return Err(GuardError::Unresolvable { path: resolved });
                            }
                            let Ok(link) = fs::read_link(&resolved) else {
                                return Err(GuardError::Unresolvable { path: resolved });
                            };
                            resolved.pop();
                            let next = link.join(components.as_path());
                            pending = next;
                            continue 'walk;
                        }
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                        Ok(_) | Err(_) => return Err(GuardError::Unresolvable { path: resolved }),
                    }
                }
            }
        }
        return Ok(resolved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("project");
        std::fs::create_dir(&root).unwrap();
        let root = root.canonicalize().unwrap();
        (dir, root)
    }

    #[test]
    fn nested_new_file_is_contained() {
        let (_dir, root) = project();
        let target = resolve_contained(&root, "docs/new/notes.md").unwrap();
        assert_eq!(target, root.join("docs/new/notes.md"));
    }

    #[test]
    fn dot_segments_inside_root_are_normalized() {
        let (_dir, root) = project();
        let target = resolve_contained(&root, "./a/../b/./c.txt").unwrap();
        assert_eq!(target, root.join("b/c.txt"));
    }

    #[test]
    fn parent_escape_is_rejected() {
        let (_dir, root) = project();
        let err = resolve_contained(&root, "../../etc/passwd").unwrap_err();
        assert!(matches!(err, GuardError::OutsideRoot { .. }));
    }

    #[test]
    fn escape_through_missing_directory_is_rejected() {
        let (_dir, root) = project();
        let err = resolve_contained(&root, "missing/../../outside.txt").unwrap_err();
        assert!(matches!(err, GuardError::OutsideRoot { .. }));
    }

    #[test]
    fn absolute_path_elsewhere_is_rejected() {
        let (_dir, root) = project();
        let other = tempfile::tempdir().unwrap();
        let absolute = other.path().join("file.txt");

        let err = resolve_contained(&root, absolute.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, GuardError::OutsideRoot { .. }));
    }

    #[test]
    fn absolute_path_inside_root_is_accepted() {
        let (_dir, root) = project();
        let absolute = root.join("inside.txt");
        let target = resolve_contained(&root, absolute.to_str().unwrap()).unwrap();
        assert_eq!(target, absolute);
    }

    #[test]
    fn sibling_sharing_name_prefix_is_rejected() {
        let (dir, root) = project();
        std::fs::create_dir(dir.path().join("project-evil")).unwrap();

        let err = resolve_contained(&root, "../project-evil/payload").unwrap_err();
        assert!(matches!(err, GuardError::OutsideRoot { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_pointing_outside_is_rejected() {
        let (_dir, root) = project();
        let outside = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("escape")).unwrap();

        let err = resolve_contained(&root, "escape/file.txt").unwrap_err();
        assert!(matches!(err, GuardError::OutsideRoot { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_pointing_outside_is_rejected() {
        let (dir, root) = project();
        let outside = dir.path().join("outside");
        std::os::unix::fs::symlink("../outside/pwned.txt", root.join("link")).unwrap();

        let err = resolve_contained(&root, "link").unwrap_err();
        assert!(matches!(err, GuardError::OutsideRoot { .. }));
        assert!(!outside.exists());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_inside_root_resolves_to_its_target() {
        let (_dir, root) = project();
        std::os::unix::fs::symlink("drafts/new.md", root.join("latest")).unwrap();

        let target = resolve_contained(&root, "latest").unwrap();
        assert_eq!(target, root.join("drafts/new.md"));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_absolute_symlink_is_rejected() {
        let (_dir, root) = project();
        let other = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(other.path().join("missing/file"), root.join("abs")).unwrap();

        let err = resolve_contained(&root, "abs").unwrap_err();
        assert!(matches!(err, GuardError::OutsideRoot { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_is_unresolvable() {
        let (_dir, root) = project();
        std::os::unix::fs::symlink("b", root.join("a")).unwrap();
        std::os::unix::fs::symlink("a", root.join("b")).unwrap();

        let err = resolve_contained(&root, "a/file.txt").unwrap_err();
        assert!(matches!(err, GuardError::Unresolvable { .. }));
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_contained(&dir.path().join("gone"), "a.txt").unwrap_err();
        assert!(matches!(err, GuardError::Root { .. }));
    }
}
