use crate::err::{PatternError, Result};
use crate::pattern::common::Common;
use crate::provider::{ByteProvider, read_unsigned};

/// A run of bits inside a bitfield, counted from the least significant bit of
/// the decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitfieldField {
    pub name: String,
    pub bit_offset: u32,
    pub bit_size: u32,
}

impl BitfieldField {
    pub fn new(name: impl Into<String>, bit_offset: u32, bit_size: u32) -> Self {
        BitfieldField {
            name: name.into(),
            bit_offset,
            bit_size,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BitfieldPattern {
    fields: Vec<BitfieldField>,
}

impl BitfieldPattern {
    pub fn new(fields: Vec<BitfieldField>) -> Self {
        BitfieldPattern { fields }
    }

    pub fn fields(&self) -> &[BitfieldField] {
        &self.fields
    }

    /// Decode every field, in declaration order.
    pub(crate) fn values(&self, common: &Common, provider: &dyn ByteProvider) -> Result<Vec<(&str, u128)>> {
        let raw = read_unsigned(
            provider,
            common.offset,
            common.size,
            common.endian,
            &common.type_name,
        )?;
        let total_bits = common.size * 8;

        self.fields
            .iter()
            .map(|field| {
                let end = u64::from(field.bit_offset) + u64::from(field.bit_size);
                if end > total_bits {
                    return Err(PatternError::unsupported_width(&field.name, end.div_ceil(8)));
                }

                let mask = match field.bit_size {
                    0 => 0,
                    128.. => u128::MAX,
                    bits => (1_u128 << bits) - 1,
                };
                let value = raw.checked_shr(field.bit_offset).unwrap_or(0) & mask;
                Ok((field.name.as_str(), value))
            })
            .collect()
    }

    pub(crate) fn format_value(&self, common: &Common, provider: &dyn ByteProvider) -> Result<String> {
        let values = self.values(common, provider)?;
        if values.is_empty() {
            return Ok("{ }".to_owned());
        }

        let body = values
            .iter()
            .map(|(name, value)| format!("{} = {}", name, value))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("{{ {} }}", body))
    }
}
