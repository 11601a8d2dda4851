//! Growable little-endian byte buffer shared by the debug stream encoders.
//!
//! Writes go through an explicit position cursor so that length fields can be
//! reserved first and patched once the surrounded content is complete.

#[derive(Debug, Default)]
pub struct DataBuffer {
    output: Vec<u8>,
    position: usize,
}

impl DataBuffer {
    pub fn new() -> DataBuffer {
        DataBuffer::default()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Ensures the backing storage covers `bytes` more bytes from the cursor.
    fn reserve(&mut self, bytes: usize) {
        if self.output.len() < self.position + bytes {
            self.output.resize(self.position + bytes, 0);
        }
    }

    pub fn write(&mut self, value: u8) {
        self.reserve(1);
        self.output[self.position] = value;
        self.position += 1;
    }

    pub fn write_at(&mut self, position: usize, value: u8) {
        self.output[position] = value;
    }

    pub fn write_u16(&mut self, value: u16) {
        self.reserve(2);
        self.output[self.position..self.position + 2].copy_from_slice(&value.to_le_bytes());
        self.position += 2;
    }

    pub fn write_u32(&mut self, value: u32) {
        self.reserve(4);
        self.output[self.position..self.position + 4].copy_from_slice(&value.to_le_bytes());
        self.position += 4;
    }

    pub fn write_u32_at(&mut self, position: usize, value: u32) {
        self.output[position..position + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.reserve(8);
        self.output[self.position..self.position + 8].copy_from_slice(&value.to_le_bytes());
        self.position += 8;
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        self.output[self.position..self.position + bytes.len()].copy_from_slice(bytes);
        self.position += bytes.len();
    }

    /// NUL-terminated string.
    pub fn write_string(&mut self, text: &str) {
        self.write_bytes(text.as_bytes());
        self.write(0);
    }

    pub fn write_uleb128(&mut self, mut value: u64) {
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            self.write(byte);
            if value == 0 {
                break;
            }
        }
    }

    pub fn write_sleb128(&mut self, mut value: i64) {
        loop {
            let byte = (value & 0x7F) as u8;
            value >>= 7;

            let sign_clear = byte & 0x40 == 0;
            if (value == 0 && sign_clear) || (value == -1 && !sign_clear) {
                self.write(byte);
                break;
            }

            self.write(byte | 0x80);
        }
    }

    /// Appends zero bytes until the cursor is aligned to `alignment`.
    pub fn align(&mut self, alignment: usize) {
        while self.position % alignment != 0 {
            self.write(0);
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn little_endian_layout() {
        let mut buffer = DataBuffer::new();
        buffer.write_u32(0x11223344);
        buffer.write_u16(0x5566);
        assert_eq!(buffer.as_bytes(), &[0x44, 0x33, 0x22, 0x11, 0x66, 0x55]);
    }

    #[test]
    fn patching_does_not_move_the_cursor() {
        let mut buffer = DataBuffer::new();
        buffer.write_u32(0);
        buffer.write(0xAA);
        buffer.write_u32_at(0, 5);
        assert_eq!(buffer.position(), 5);
        assert_eq!(buffer.as_bytes(), &[5, 0, 0, 0, 0xAA]);
    }

    #[test]
    fn uleb128_splits_at_seven_bits() {
        let mut buffer = DataBuffer::new();
        buffer.write_uleb128(624485);
        assert_eq!(buffer.as_bytes(), &[0xE5, 0x8E, 0x26]);
    }

    #[test]
    fn sleb128_encodes_negative_values() {
        let mut buffer = DataBuffer::new();
        buffer.write_sleb128(-8);
        assert_eq!(buffer.as_bytes(), &[0x78]);

        let mut buffer = DataBuffer::new();
        buffer.write_sleb128(-129);
        assert_eq!(buffer.as_bytes(), &[0xFF, 0x7E]);
    }
}
