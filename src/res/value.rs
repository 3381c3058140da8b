use crate::res::table::ResResource;
use crate::res::xml;
use anyhow::Result;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Multiplier tables from Android's complex-value encoding: a 24-bit
/// mantissa, a 2-bit radix selector and a 4-bit unit.
const RADIX_MULTS: [f32; 4] = [
    1.0 / (1 << 8) as f32,
    1.0 / (1 << 15) as f32,
    1.0 / (1 << 23) as f32,
    1.0 / (1u64 << 31) as f32,
];

const DIMENSION_UNITS: [&str; 6] = ["px", "dip", "sp", "pt", "in", "mm"];
const FRACTION_UNITS: [&str; 2] = ["%", "%p"];

fn complex_to_float(complex: u32) -> f32 {
    ((complex & 0xffff_ff00) as i32 as f32) * RADIX_MULTS[((complex >> 4) & 0x3) as usize]
}

/// Shortest round-trip decimal with a decimal point kept, matching the
/// `12.0` / `0.5` forms aapt itself regenerates.
fn float_to_string(value: f32) -> String {
    format!("{:?}", value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
    Argb8,
    Rgb8,
}

/// Variant payload of one decoded scalar resource value.
#[derive(Debug, Clone)]
pub enum ResPayload {
    Bool(bool),
    Int(i32),
    Float(f32),
    /// Raw Android complex value, decoded to `<float><unit>` on encoding.
    Dimension(u32),
    Fraction(u32),
    Color(ColorFormat, u32),
    Str(String),
    /// Pre-formatted reference body (`@type/name`, `?attr/name`, `@null`).
    Reference(String),
}

/// One typed scalar resource value as decoded from the binary container:
/// a declared type tag, an optional raw textual override (kept verbatim from
/// the source arsc when present) and the variant payload. Immutable once
/// constructed; the encoder is its only consumer.
#[derive(Debug, Clone)]
pub struct ResScalarValue {
    type_name: String,
    raw_value: Option<String>,
    payload: ResPayload,
}

impl ResScalarValue {
    pub fn new(type_name: &str, raw_value: Option<String>, payload: ResPayload) -> Self {
        Self {
            type_name: type_name.to_string(),
            raw_value,
            payload,
        }
    }

    pub fn boolean(value: bool, raw_value: Option<String>) -> Self {
        Self::new("bool", raw_value, ResPayload::Bool(value))
    }

    pub fn int(value: i32, raw_value: Option<String>) -> Self {
        Self::new("integer", raw_value, ResPayload::Int(value))
    }

    pub fn float(value: f32, raw_value: Option<String>) -> Self {
        Self::new("float", raw_value, ResPayload::Float(value))
    }

    pub fn dimension(complex: u32, raw_value: Option<String>) -> Self {
        Self::new("dimen", raw_value, ResPayload::Dimension(complex))
    }

    pub fn fraction(complex: u32, raw_value: Option<String>) -> Self {
        Self::new("fraction", raw_value, ResPayload::Fraction(complex))
    }

    pub fn color(format: ColorFormat, argb: u32, raw_value: Option<String>) -> Self {
        Self::new("color", raw_value, ResPayload::Color(format, argb))
    }

    pub fn string(value: &str, raw_value: Option<String>) -> Self {
        Self::new("string", raw_value, ResPayload::Str(value.to_string()))
    }

    pub fn reference(body: &str, raw_value: Option<String>) -> Self {
        Self::new("reference", raw_value, ResPayload::Reference(body.to_string()))
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Body text for a values document: the raw override verbatim when the
    /// container carried one, otherwise derived from the payload.
    pub fn encode_as_res_xml_value(&self) -> String {
        if let Some(raw) = &self.raw_value {
            return raw.clone();
        }
        self.encode_as_res_xml()
    }

    /// Item-level encoding escapes nothing beyond the base encoding.
    pub fn encode_as_res_xml_item_value(&self) -> String {
        self.encode_as_res_xml_value()
    }

    /// Typed-array entries need literal markup passed through.
    pub fn encode_as_res_xml_non_escaped_item_value(&self) -> String {
        xml::unescape_item_chars(&self.encode_as_res_xml_value())
    }

    fn encode_as_res_xml(&self) -> String {
        match &self.payload {
            ResPayload::Bool(value) => if *value { "true" } else { "false" }.to_string(),
            ResPayload::Int(value) => value.to_string(),
            ResPayload::Float(value) => float_to_string(*value),
            ResPayload::Dimension(complex) => {
                let unit = DIMENSION_UNITS
                    .get((complex & 0xf) as usize)
                    .copied()
                    .unwrap_or("");
                format!("{}{}", float_to_string(complex_to_float(*complex)), unit)
            }
            ResPayload::Fraction(complex) => {
                let unit = FRACTION_UNITS
                    .get((complex & 0xf) as usize)
                    .copied()
                    .unwrap_or("");
                format!(
                    "{}{}",
                    float_to_string(complex_to_float(*complex) * 100.0),
                    unit
                )
            }
            ResPayload::Color(ColorFormat::Argb8, argb) => format!("#{:08x}", argb),
            ResPayload::Color(ColorFormat::Rgb8, argb) => {
                format!("#{:06x}", argb & 0x00ff_ffff)
            }
            ResPayload::Str(value) => xml::encode_as_xml_value(value),
            ResPayload::Reference(body) => body.clone(),
        }
    }

    /// Write this value as one element of a values document.
    ///
    /// The wrapping tag is the declared type, demoted to a generic
    /// `<item type="...">` when the declared type is `reference` or differs
    /// from the owning type group. A body that merely *looks* like a
    /// reference (`@` outside color values and string documents) is also
    /// demoted, so a literal is never ambiguous with a live reference.
    pub fn serialize_to_values_xml<W: Write>(
        &self,
        writer: &mut Writer<W>,
        res: &ResResource,
    ) -> Result<()> {
        let group = res.type_name();
        let mut item = self.type_name == "reference" || self.type_name != group;

        let body = self.encode_as_res_xml_value();

        if !self.type_name.eq_ignore_ascii_case("color")
            && body.contains('@')
            && !res.file_path().contains("string")
        {
            item = true;
        }

        let tag_name = if item { "item" } else { self.type_name.as_str() };
        let mut start = BytesStart::new(tag_name);
        if item {
            start.push_attribute(("type", self.type_name.as_str()));
        }
        start.push_attribute(("name", res.spec_name()));
        self.push_extra_attrs(&mut start);

        writer.write_event(Event::Start(start))?;
        if !body.is_empty() {
            // Bodies are pre-escaped by the encoding above (or raw overrides
            // carried verbatim); the writer must not escape them again.
            writer.write_event(Event::Text(BytesText::from_escaped(body.as_str())))?;
        }
        writer.write_event(Event::End(BytesEnd::new(tag_name)))?;
        Ok(())
    }

    fn push_extra_attrs(&self, start: &mut BytesStart) {
        if let ResPayload::Str(_) = &self.payload {
            let formatted_needed = self
                .raw_value
                .as_deref()
                .map(xml::has_multiple_non_positional_substitutions)
                .unwrap_or(false);
            if formatted_needed {
                start.push_attribute(("formatted", "false"));
            }
        }
    }
}
