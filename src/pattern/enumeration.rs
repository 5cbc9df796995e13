use crate::err::Result;
use crate::pattern::common::Common;
use crate::provider::{ByteProvider, read_unsigned};

/// A named value, or an inclusive range of values, of an enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    pub name: String,
    pub min: u128,
    pub max: u128,
}

impl EnumEntry {
    pub fn value(name: impl Into<String>, value: u128) -> Self {
        EnumEntry {
            name: name.into(),
            min: value,
            max: value,
        }
    }

    pub fn range(name: impl Into<String>, min: u128, max: u128) -> Self {
        EnumEntry {
            name: name.into(),
            min,
            max,
        }
    }

    pub fn matches(&self, value: u128) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnumPattern {
    entries: Vec<EnumEntry>,
}

impl EnumPattern {
    pub fn new(entries: Vec<EnumEntry>) -> Self {
        EnumPattern { entries }
    }

    pub fn entries(&self) -> &[EnumEntry] {
        &self.entries
    }

    /// First entry covering `value`, in declaration order.
    pub fn variant_name(&self, value: u128) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.matches(value))
            .map(|entry| entry.name.as_str())
    }

    pub(crate) fn format_value(&self, common: &Common, provider: &dyn ByteProvider) -> Result<String> {
        let value = read_unsigned(
            provider,
            common.offset,
            common.size,
            common.endian,
            &common.type_name,
        )?;

        let name = self.variant_name(value).unwrap_or("???");
        Ok(format!(
            "{}::{} (0x{:0width$X})",
            common.type_name,
            name,
            value,
            width = (common.size * 2) as usize
        ))
    }
}
