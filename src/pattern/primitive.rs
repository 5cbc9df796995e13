use crate::err::{PatternError, Result};
use crate::pattern::common::Common;
use crate::provider::{ByteProvider, decode_f32, decode_f64, decode_signed, decode_unsigned, read_exact};

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Unsigned,
    Signed,
    Float,
    Boolean,
    Character,
}

impl PrimitiveKind {
    /// Name of the built-in type of this kind with the given width.
    pub fn type_name(self, size: u64) -> String {
        let bits = size.saturating_mul(8);
        match (self, size) {
            (PrimitiveKind::Unsigned, _) => format!("u{}", bits),
            (PrimitiveKind::Signed, _) => format!("s{}", bits),
            (PrimitiveKind::Float, 4) => "float".to_owned(),
            (PrimitiveKind::Float, 8) => "double".to_owned(),
            (PrimitiveKind::Float, _) => format!("f{}", bits),
            (PrimitiveKind::Boolean, _) => "bool".to_owned(),
            (PrimitiveKind::Character, 2) => "char16".to_owned(),
            (PrimitiveKind::Character, _) => "char".to_owned(),
        }
    }
}

pub(crate) fn format_value(
    kind: PrimitiveKind,
    common: &Common,
    provider: &dyn ByteProvider,
) -> Result<String> {
    let size = common.size;
    let supported = match kind {
        PrimitiveKind::Unsigned | PrimitiveKind::Signed => (1..=16).contains(&size),
        PrimitiveKind::Float => size == 4 || size == 8,
        PrimitiveKind::Boolean => size == 1,
        PrimitiveKind::Character => size == 1 || size == 2,
    };
    if !supported {
        return Err(PatternError::unsupported_width(&common.type_name, size));
    }

    let bytes = read_exact(provider, common.offset, size)?;
    let raw = decode_unsigned(&bytes, common.endian);
    let width = bytes.len() * 2;

    let formatted = match kind {
        PrimitiveKind::Unsigned => format!("{} (0x{:0width$X})", raw, raw, width = width),
        PrimitiveKind::Signed => format!(
            "{} (0x{:0width$X})",
            decode_signed(&bytes, common.endian),
            raw,
            width = width
        ),
        PrimitiveKind::Float if size == 4 => format!(
            "{} (0x{:0width$X})",
            decode_f32(&bytes, common.endian),
            raw,
            width = width
        ),
        PrimitiveKind::Float => format!(
            "{} (0x{:0width$X})",
            decode_f64(&bytes, common.endian),
            raw,
            width = width
        ),
        PrimitiveKind::Boolean => match raw {
            0 => "false".to_owned(),
            1 => "true".to_owned(),
            _ => "true*".to_owned(),
        },
        PrimitiveKind::Character => format_character(raw),
    };

    Ok(formatted)
}

fn format_character(raw: u128) -> String {
    let c = u32::try_from(raw)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER);

    if c.is_ascii_graphic() || c == ' ' || (!c.is_ascii() && !c.is_control()) {
        format!("'{}'", c)
    } else {
        format!("'\\x{:02X}'", raw)
    }
}
