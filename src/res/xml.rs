//! Text encoding rules for values-XML documents. aapt applies its own layer
//! of quoting and reference interpretation on top of XML, so a regenerated
//! document needs more than plain entity escaping to survive a rebuild.

/// Entity-escape the two characters XML itself cannot carry in text content.
pub fn escape_xml_chars(input: &str) -> String {
    input.replace('&', "&amp;").replace('<', "&lt;")
}

/// Undo [`escape_xml_chars`] for contexts (typed array entries) that need
/// literal markup passed through.
pub fn unescape_item_chars(input: &str) -> String {
    input.replace("&amp;", "&").replace("&lt;", "<")
}

/// Encode a string resource body for a values document: XML entities for
/// `&`/`<`, aapt backslash escapes for quotes and newlines, a leading `@` or
/// `?` escaped so aapt does not read it as a reference, and outer quotes when
/// the body carries whitespace aapt would otherwise collapse.
pub fn encode_as_xml_value(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(ch),
        }
    }
    if out.starts_with('@') || out.starts_with('?') {
        out.insert(0, '\\');
    }
    if out.starts_with(' ') || out.ends_with(' ') || out.contains("  ") {
        out = format!("\"{}\"", out);
    }
    out
}

/// True when the format string holds more than one `%` substitution that is
/// not positional (`%1$s`-style). aapt refuses such strings unless the
/// element carries `formatted="false"`.
pub fn has_multiple_non_positional_substitutions(input: &str) -> bool {
    let bytes = input.as_bytes();
    let mut non_positional = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        i += 1;
        if i >= bytes.len() {
            break;
        }
        if bytes[i] == b'%' {
            // literal percent
            i += 1;
            continue;
        }
        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let positional = i > digits_start && i < bytes.len() && bytes[i] == b'$';
        if !positional {
            non_positional += 1;
        }
    }
    non_positional > 1
}
