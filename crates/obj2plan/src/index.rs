//! Input discovery: one work item per file stem, `.zip` preferred over `.obj`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn lower_ext(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default()
}

pub fn is_zip(path: &Path) -> bool {
    lower_ext(path) == "zip"
}

/// Maps each file stem to the input that should be converted for it.
pub fn build_local_index(input_dir: &Path) -> BTreeMap<String, PathBuf> {
    let mut index: BTreeMap<String, PathBuf> = BTreeMap::new();

    for entry in WalkDir::new(input_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let ext = lower_ext(&path);
        if ext != "obj" && ext != "zip" {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()).map(str::to_owned) else {
            continue;
        };

        index
            .entry(stem)
            .and_modify(|existing| {
                // Replace a stored `.obj` with a `.zip` if we encounter one.
                if !is_zip(existing) && ext == "zip" {
                    *existing = path.clone();
                }
            })
            .or_insert_with(|| path.clone());
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn zip_wins_over_obj_and_other_files_are_ignored() {
        let dir = std::env::temp_dir().join(format!("obj2plan-index-{}", std::process::id()));
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("a.obj"), "").unwrap();
        fs::write(dir.join("nested/a.ZIP"), "").unwrap();
        fs::write(dir.join("b.obj"), "").unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();

        let index = build_local_index(&dir);
        assert_eq!(index.len(), 2);
        assert_eq!(index["a"], dir.join("nested/a.ZIP"));
        assert_eq!(index["b"], dir.join("b.obj"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
