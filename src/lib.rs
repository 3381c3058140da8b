//! Symbolic resource linking for an APK decompile/rebuild pipeline.
//!
//! Disassembled smali text is full of raw `0x7f......` resource-id literals
//! that go stale the moment the resource table is rebuilt. This crate keeps
//! them honest with a two-pass protocol:
//!
//! - [`smali::tagger::tag_res_ids`] annotates every recognized id literal
//!   with a `# APKTOOL/RES_NAME:` comment naming the resource symbolically;
//! - [`smali::resolver::update_res_ids`] later reads those annotations back,
//!   re-resolves each symbol against the *current* table, rewrites the
//!   literal with the fresh id, and strips the annotation.
//!
//! The shared [`res::table::ResTable`] identity model and the
//! [`res::value`] scalar-value-to-XML encoding contract live alongside the
//! passes; decoding the binary resource container itself is the job of
//! another layer.

pub mod core;
pub mod error;
pub mod res;
pub mod smali;
