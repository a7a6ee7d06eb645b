use std::path::{Component, Path, PathBuf};

/// Lexically join an archive entry name onto `root`, refusing escapes.
///
/// Returns `None` when the name is absolute, carries a filesystem prefix,
/// or walks above `root` via parent-directory segments. The result is built
/// component by component, so the containment check compares whole path
/// segments — `/dest` can never be "escaped" into `/destination`.
pub fn safe_join(root: &Path, name: &str) -> Option<PathBuf> {
    let rel = Path::new(name);

    let mut out = root.to_path_buf();
    let mut depth = 0usize;
    for component in rel.components() {
        match component {
            Component::Normal(part) => {
                out.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                out.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    debug_assert!(out.starts_with(root));
    Some(out)
}
