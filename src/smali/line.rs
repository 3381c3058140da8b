use crate::res::id::ResId;
use regex::Regex;
use std::sync::OnceLock;

// Patterns are the wire format of the tagging protocol; changing them
// invalidates every previously tagged tree.
const RES_ID_PATTERN: &str =
    r"^(?:\.field (.+?):I =|    const(?:|/(?:|high)16) ([pv]\d+?),) 0x(7[a-f]0[1-9a-f](?:|[0-9a-f]{4}))$";
const RES_NAME_PATTERN: &str =
    r"^# APKTOOL/RES_NAME: ([a-zA-Z0-9.]+):([a-z]+)/([a-zA-Z0-9._]+)$";
const R_FILE_PATTERN: &str = r".*R\$[a-z]+\.smali$";

fn res_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(RES_ID_PATTERN).expect("valid res id pattern"))
}

fn res_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(RES_NAME_PATTERN).expect("valid res name pattern"))
}

fn r_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(R_FILE_PATTERN).expect("valid R file pattern"))
}

/// Where an id literal lives in the line: a field initializer or a const
/// instruction's register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdTarget<'a> {
    Field(&'a str),
    Register(&'a str),
}

/// One classified line of smali text. Both passes share this classifier so
/// that "annotation" and "id literal" mean exactly the same thing to each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmaliLine<'a> {
    /// `# APKTOOL/RES_NAME: package:type/name`
    ResName {
        package: &'a str,
        type_name: &'a str,
        spec_name: &'a str,
    },
    /// A field initializer or const carrying a `0x7f...` resource id.
    ResId { target: IdTarget<'a>, hex: &'a str },
    Other,
}

pub fn classify(line: &str) -> SmaliLine<'_> {
    if let Some(caps) = res_name_regex().captures(line) {
        // All three groups are mandatory in the pattern.
        let (package, type_name, spec_name) = match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(p), Some(t), Some(s)) => (p.as_str(), t.as_str(), s.as_str()),
            _ => return SmaliLine::Other,
        };
        return SmaliLine::ResName {
            package,
            type_name,
            spec_name,
        };
    }
    if let Some(caps) = res_id_regex().captures(line) {
        let hex = match caps.get(3) {
            Some(hex) => hex.as_str(),
            None => return SmaliLine::Other,
        };
        let target = if let Some(field) = caps.get(1) {
            IdTarget::Field(field.as_str())
        } else if let Some(register) = caps.get(2) {
            IdTarget::Register(register.as_str())
        } else {
            return SmaliLine::Other;
        };
        return SmaliLine::ResId { target, hex };
    }
    SmaliLine::Other
}

/// Decode the hex group of an id literal (no `0x` prefix).
///
/// A literal ending in `ff` is the unresolved sentinel and yields no id; this
/// deliberately also swallows a full 8-digit id that happens to end in `ff`,
/// matching what every previously built tree expects. A 4-digit literal
/// carries only the high half of the id, the entry index is implicitly zero.
pub fn parse_res_id(hex: &str) -> Option<ResId> {
    if hex.ends_with("ff") {
        return None;
    }
    let mut id = u32::from_str_radix(hex, 16).ok()?;
    if hex.len() == 4 {
        id <<= 16;
    }
    Some(ResId(id))
}

/// Re-encode a literal with a fresh id, always in the full 32-bit form.
/// A `const/16` or `const/high16` source literal is widened to plain `const`,
/// never narrowed back.
pub fn format_res_id(target: IdTarget<'_>, id: ResId) -> String {
    match target {
        IdTarget::Field(name) => format!(".field {}:I = 0x{:08x}", name, id.0),
        IdTarget::Register(register) => format!("    const {}, 0x{:08x}", register, id.0),
    }
}

/// The annotation line the tagger inserts above a literal.
pub fn format_res_name(full_name: &str) -> String {
    format!("# APKTOOL/RES_NAME: {}", full_name)
}

/// Generated `R$<type>.smali` constant-holder classes enumerate ids that may
/// no longer exist as live specs; the tagger must not warn about them.
pub fn is_constant_holder_file(file_name: &str) -> bool {
    r_file_regex().is_match(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_classify_field_literals() {
        // The field group swallows access flags too; re-encoding puts them back.
        let line = ".field public static final someField:I = 0x7f020001";
        assert_eq!(
            classify(line),
            SmaliLine::ResId {
                target: IdTarget::Field("public static final someField"),
                hex: "7f020001"
            }
        );
    }

    #[test]
    fn should_classify_const_literals_of_every_width() {
        for (line, hex) in [
            ("    const v0, 0x7f020001", "7f020001"),
            ("    const/16 v12, 0x7f04", "7f04"),
            ("    const/high16 p1, 0x7f03", "7f03"),
        ] {
            match classify(line) {
                SmaliLine::ResId {
                    target: IdTarget::Register(_),
                    hex: got,
                } => assert_eq!(got, hex),
                other => panic!("expected ResId for {:?}, got {:?}", line, other),
            }
        }
    }

    #[test]
    fn should_reject_non_resource_hex() {
        // Wrong package byte, framework ids, and unindented consts all fall through.
        assert_eq!(classify("    const v0, 0x10200001"), SmaliLine::Other);
        assert_eq!(classify("const v0, 0x7f020001"), SmaliLine::Other);
        assert_eq!(classify("    const v0, 0xdeadbeef"), SmaliLine::Other);
    }

    #[test]
    fn should_classify_annotation_lines() {
        assert_eq!(
            classify("# APKTOOL/RES_NAME: com.example:string/app_name"),
            SmaliLine::ResName {
                package: "com.example",
                type_name: "string",
                spec_name: "app_name"
            }
        );
        assert_eq!(classify("# some other comment"), SmaliLine::Other);
    }

    #[test]
    fn should_treat_trailing_ff_as_unresolved_sentinel() {
        assert_eq!(parse_res_id("7f0100ff"), None);
        // Preserved quirk: a real id ending in ff is also swallowed.
        assert_eq!(parse_res_id("7f02ffff"), None);
    }

    #[test]
    fn should_widen_short_literals_to_the_high_half() {
        assert_eq!(parse_res_id("7f01"), Some(ResId(0x7f010000)));
        assert_eq!(parse_res_id("7f010001"), Some(ResId(0x7f010001)));
    }

    #[test]
    fn should_format_literals_in_full_width_only() {
        assert_eq!(
            format_res_id(IdTarget::Field("badger"), ResId(0x7f020005)),
            ".field badger:I = 0x7f020005"
        );
        assert_eq!(
            format_res_id(IdTarget::Register("v0"), ResId(0x7f020005)),
            "    const v0, 0x7f020005"
        );
    }

    #[test]
    fn should_recognize_constant_holder_files() {
        assert!(is_constant_holder_file("com/example/R$id.smali"));
        assert!(is_constant_holder_file("smali/com/example/R$layout.smali"));
        assert!(!is_constant_holder_file("com/example/R.smali"));
        assert!(!is_constant_holder_file("com/example/Registry.smali"));
    }
}
