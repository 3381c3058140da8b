use thiserror::Error;

/// Failures of the resource linking layer itself. I/O faults are not part of
/// this taxonomy; the passes wrap those with `anyhow::Context` and the
/// offending path.
#[derive(Debug, Error)]
pub enum LinkError {
    /// An id (tagging) or a symbolic name (resolving) has no matching spec.
    /// Recoverable during tagging (downgraded to a warning), fatal during
    /// resolving: rewriting a stale id would silently corrupt the rebuilt apk.
    #[error("undefined resource spec: {0}")]
    UndefinedResource(String),

    /// A `# APKTOOL/RES_NAME:` line was not immediately followed by an id
    /// literal. The working tree is corrupted or hand-edited beyond repair.
    #[error("resource name annotation is not followed by an id literal")]
    MalformedAnnotation,

    /// Table construction saw the same id twice, or the same short name twice
    /// within one (package, type) group.
    #[error("duplicate resource spec: {0}")]
    DuplicateSpec(String),
}
