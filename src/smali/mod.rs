pub mod line;
pub mod resolver;
pub mod tagger;

pub use resolver::update_res_ids;
pub use tagger::tag_res_ids;

use crate::core::config::LinkConfig;
use crate::res::table::ResTable;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Tag every smali directory the session config lists under the decoded-apk
/// root. Absent directories are skipped: a single-dex apk has no
/// `smali_classes2`.
pub fn tag_all(table: &ResTable, apk_dir: &Path, config: &LinkConfig) -> Result<()> {
    for dir_name in &config.tagging.smali_dirs {
        let dir = apk_dir.join(dir_name);
        if dir.is_dir() {
            tag_res_ids(table, &dir)?;
        }
    }
    Ok(())
}

/// Re-resolve every smali directory the session config lists. Counterpart of
/// [`tag_all`] for the build phase.
pub fn update_all(table: &ResTable, apk_dir: &Path, config: &LinkConfig) -> Result<()> {
    for dir_name in &config.tagging.smali_dirs {
        let dir = apk_dir.join(dir_name);
        if dir.is_dir() {
            update_res_ids(table, &dir)?;
        }
    }
    Ok(())
}

/// Every regular file under `root`, recursively. Files are processed
/// independently, so enumeration order carries no meaning.
pub(crate) fn collect_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_into(root, &mut files)?;
    Ok(files)
}

fn collect_into(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Could not read directory: {}", dir.display()))?;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Could not read directory: {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            collect_into(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

/// Path of `path` relative to the pass root, with forward slashes. This is
/// the name warnings mention and the constant-holder pattern matches against.
pub(crate) fn relative_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

pub(crate) fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::res::id::ResId;
    use tempfile::tempdir;

    fn sample_table() -> ResTable {
        let mut table = ResTable::new();
        table
            .add_spec(ResId(0x7f020000), "com.example", "string", "app_name")
            .unwrap();
        table
            .add_spec(ResId(0x7f030000), "com.example", "layout", "main")
            .unwrap();
        table
    }

    #[test]
    fn should_round_trip_literals_through_tag_and_update() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("com/example/MainActivity.smali");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        let original = "\
.class Lcom/example/MainActivity;

.field layoutId:I = 0x7f030000

.method onCreate()V
    const v0, 0x7f020000

    return-void
.end method
";
        fs::write(&file, original).unwrap();

        let table = sample_table();
        tag_res_ids(&table, dir.path()).unwrap();
        let tagged = fs::read_to_string(&file).unwrap();
        assert!(tagged.contains("# APKTOOL/RES_NAME: com.example:layout/main"));
        assert!(tagged.contains("# APKTOOL/RES_NAME: com.example:string/app_name"));

        update_res_ids(&table, dir.path()).unwrap();
        // Ids unchanged in between, so tag + update is a no-op on the text.
        assert_eq!(fs::read_to_string(&file).unwrap(), original);
    }

    #[test]
    fn should_visit_only_configured_smali_dirs() {
        let dir = tempdir().unwrap();
        let tagged_file = dir.path().join("smali/A.smali");
        let skipped_file = dir.path().join("assets/B.smali");
        fs::create_dir_all(tagged_file.parent().unwrap()).unwrap();
        fs::create_dir_all(skipped_file.parent().unwrap()).unwrap();
        let body = "    const v0, 0x7f020000\n";
        fs::write(&tagged_file, body).unwrap();
        fs::write(&skipped_file, body).unwrap();

        let config = crate::core::config::LinkConfig::default();
        tag_all(&sample_table(), dir.path(), &config).unwrap();

        assert!(fs::read_to_string(&tagged_file)
            .unwrap()
            .contains("# APKTOOL/RES_NAME:"));
        assert_eq!(fs::read_to_string(&skipped_file).unwrap(), body);
    }

    #[test]
    fn should_skip_absent_configured_dirs() {
        let dir = tempdir().unwrap();
        let config = crate::core::config::LinkConfig {
            tagging: crate::core::config::TaggingConfig {
                smali_dirs: vec!["smali".into(), "smali_classes2".into()],
            },
        };
        // Nothing exists; both passes are clean no-ops.
        tag_all(&sample_table(), dir.path(), &config).unwrap();
        update_all(&sample_table(), dir.path(), &config).unwrap();
    }

    #[test]
    fn should_relativize_names_with_forward_slashes() {
        let root = Path::new("/tmp/work");
        let path = root.join("com/example/R$id.smali");
        assert_eq!(relative_name(root, &path), "com/example/R$id.smali");
    }
}
