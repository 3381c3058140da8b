//! Forward pass: annotate raw resource-id literals in a disassembled tree
//! with their symbolic names, so the ids can be re-resolved after the
//! resource table is rebuilt.

use crate::res::id::ResId;
use crate::res::table::ResTable;
use crate::smali::line::{self, SmaliLine};
use crate::smali::push_line;
use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::Path;

/// One undefined-id diagnostic. Collected per file and drained into
/// `log::warn!`; tests assert on the collected values directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagWarning {
    pub file: String,
    pub id: ResId,
}

impl fmt::Display for TagWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Undefined resource spec in {}: {}", self.file, self.id)
    }
}

/// Tag every file under `smali_dir` in place. Fails fast: the first file that
/// cannot be read or rewritten aborts the pass with its name attached;
/// already rewritten files are not rolled back (the caller works on a
/// disposable tree).
pub fn tag_res_ids(table: &ResTable, smali_dir: &Path) -> Result<()> {
    for file in super::collect_files(smali_dir)? {
        let file_name = super::relative_name(smali_dir, &file);
        tag_res_ids_for_file(table, &file, &file_name)
            .with_context(|| format!("Could not tag res IDs for file: {}", file_name))?;
    }
    Ok(())
}

fn tag_res_ids_for_file(table: &ResTable, path: &Path, file_name: &str) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let mut warnings = Vec::new();
    let tagged = tag_lines(table, file_name, &content, &mut warnings);
    for warning in &warnings {
        log::warn!("{}", warning);
    }
    fs::write(path, tagged)?;
    Ok(())
}

fn tag_lines(
    table: &ResTable,
    file_name: &str,
    input: &str,
    warnings: &mut Vec<TagWarning>,
) -> String {
    let mut out = String::with_capacity(input.len());
    let mut lines = input.lines();
    while let Some(text) = lines.next() {
        match line::classify(text) {
            SmaliLine::ResName { .. } => {
                // Already tagged: the annotation and its paired literal pass
                // through untouched, which makes the pass idempotent.
                push_line(&mut out, text);
                if let Some(paired) = lines.next() {
                    push_line(&mut out, paired);
                }
            }
            SmaliLine::ResId { hex, .. } => {
                if let Some(id) = line::parse_res_id(hex) {
                    match table.get_res_spec(id) {
                        Ok(spec) => {
                            push_line(&mut out, &line::format_res_name(&spec.full_name()));
                        }
                        Err(_) => {
                            // Generated R$<type> classes legitimately hold
                            // ids with no live spec.
                            if !line::is_constant_holder_file(file_name) {
                                warnings.push(TagWarning {
                                    file: file_name.to_string(),
                                    id,
                                });
                            }
                        }
                    }
                }
                push_line(&mut out, text);
            }
            SmaliLine::Other => push_line(&mut out, text),
        }
    }
    out
}
