// Thu Aug 06 2026 - Alex

/// Running bit-field packing state carried across consecutive primitive
/// members of one enclosing structure
#[derive(Debug, Clone, Default)]
pub struct BitPackState {
    bit_count: u32,
    last_byte_size: u32,
    last_data_type: String,
    last_bit_length: u32,
}

impl BitPackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.bit_count = 0;
        self.last_byte_size = 0;
        self.last_data_type.clear();
        self.last_bit_length = 0;
    }

    pub fn last_byte_size(&self) -> u32 {
        self.last_byte_size
    }

    pub fn last_data_type(&self) -> &str {
        &self.last_data_type
    }

    /// Adjust the running offset for the next member. A new byte-aligned
    /// storage unit starts when this member or the previous one has no bit
    /// length, the data type changed, or the type has no room left for the
    /// requested bits; otherwise the member packs into the previous unit
    /// and the offset is unchanged.
    pub fn adjust_offset(
        &mut self,
        data_type: &str,
        byte_size: u32,
        bit_length: &str,
        offset: u32,
    ) -> u32 {
        let bits = if !bit_length.is_empty() && bit_length.bytes().all(|b| b.is_ascii_digit()) {
            bit_length.parse().unwrap_or(0)
        } else {
            0
        };

        self.bit_count += bits;

        let mut offset = offset;

        if bits == 0
            || self.last_bit_length == 0
            || data_type != self.last_data_type
            || self.bit_count > byte_size * 8
        {
            self.bit_count = bits;
            offset += self.last_byte_size;
        }

        self.last_byte_size = byte_size;
        self.last_data_type = data_type.to_string();
        self.last_bit_length = bits;

        offset
    }
}
