//! Reverse pass: read the annotations the tagger left behind, re-resolve
//! each symbol against the current table and rewrite the literal below with
//! the fresh id. Annotations are stripped on the way out, leaving plain
//! smali ready for assembly.

use crate::error::LinkError;
use crate::res::table::ResTable;
use crate::smali::line::{self, SmaliLine};
use crate::smali::push_line;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Rewrite every file under `smali_dir` in place. Unlike tagging, a symbol
/// that no longer resolves is fatal here: emitting the stale literal would
/// silently corrupt the rebuilt apk.
pub fn update_res_ids(table: &ResTable, smali_dir: &Path) -> Result<()> {
    for file in super::collect_files(smali_dir)? {
        let file_name = super::relative_name(smali_dir, &file);
        update_res_ids_for_file(table, &file)
            .with_context(|| format!("Could not update res IDs for file: {}", file_name))?;
    }
    Ok(())
}

fn update_res_ids_for_file(table: &ResTable, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let updated = update_lines(table, &content)?;
    fs::write(path, updated)?;
    Ok(())
}

fn update_lines(table: &ResTable, input: &str) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut lines = input.lines();
    while let Some(text) = lines.next() {
        let (package, type_name, spec_name) = match line::classify(text) {
            SmaliLine::ResName {
                package,
                type_name,
                spec_name,
            } => (package, type_name, spec_name),
            _ => {
                push_line(&mut out, text);
                continue;
            }
        };
        // The annotation is consumed here and not re-emitted. Its pairing
        // invariant: the very next line must be the literal it describes.
        let paired = lines.next().ok_or(LinkError::MalformedAnnotation)?;
        let target = match line::classify(paired) {
            SmaliLine::ResId { target, .. } => target,
            _ => return Err(LinkError::MalformedAnnotation.into()),
        };
        let spec = table
            .get_package(package)?
            .get_type(type_name)?
            .get_res_spec(spec_name)?;
        push_line(&mut out, &line::format_res_id(target, spec.id()));
    }
    Ok(out)
}
