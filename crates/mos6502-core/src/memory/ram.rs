//! Plain read/write byte backing.

use super::Addressable;

/// Fixed-size random-access byte store.
///
/// Local addresses outside the backing read as `0x00` and drop writes,
/// consistent with the router's unmapped-address policy.
pub struct Ram {
    data: Vec<u8>,
}

impl Ram {
    /// Creates a zero-filled backing of `size` bytes.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
        }
    }

    /// Copies `bytes` into the backing starting at local `offset`.
    ///
    /// Bytes that would land past the end are dropped.
    pub fn load(&mut self, offset: usize, bytes: &[u8]) {
        for (index, byte) in bytes.iter().enumerate() {
            if let Some(slot) = self.data.get_mut(offset + index) {
                *slot = *byte;
            }
        }
    }

    /// Size of the backing in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` when the backing holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Addressable for Ram {
    fn read(&mut self, addr: u16) -> u8 {
        self.data.get(usize::from(addr)).copied().unwrap_or(0)
    }

    fn write(&mut self, addr: u16, data: u8) {
        if let Some(slot) = self.data.get_mut(usize::from(addr)) {
            *slot = data;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Addressable;
    use super::Ram;

    #[test]
    fn bytes_read_back_after_write() {
        let mut ram = Ram::new(0x100);
        ram.write(0x00, 0x12);
        ram.write(0xFF, 0x34);
        assert_eq!(ram.read(0x00), 0x12);
        assert_eq!(ram.read(0xFF), 0x34);
    }

    #[test]
    fn out_of_range_access_reads_zero_and_drops_writes() {
        let mut ram = Ram::new(0x10);
        ram.write(0x40, 0xFF);
        assert_eq!(ram.read(0x40), 0x00);
    }

    #[test]
    fn load_copies_an_image_at_an_offset() {
        let mut ram = Ram::new(8);
        ram.load(2, &[1, 2, 3]);
        assert_eq!(ram.read(2), 1);
        assert_eq!(ram.read(3), 2);
        assert_eq!(ram.read(4), 3);
        // tail past the end is dropped
        ram.load(6, &[9, 9, 9, 9]);
        assert_eq!(ram.read(7), 9);
        assert_eq!(ram.len(), 8);
    }
}
