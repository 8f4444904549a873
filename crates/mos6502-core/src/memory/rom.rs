//! Read-only byte backing for raw binary images.

use super::Addressable;

/// Read-only store wrapping a loaded image; writes are no-ops.
///
/// Images are raw binaries with no header. Reads past the image end
/// return `0x00`.
pub struct Rom {
    data: Vec<u8>,
}

impl Rom {
    /// Wraps `data` as a read-only backing.
    #[must_use]
    pub const fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Size of the image in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` when the image holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Addressable for Rom {
    fn read(&mut self, addr: u16) -> u8 {
        self.data.get(usize::from(addr)).copied().unwrap_or(0)
    }

    fn write(&mut self, _addr: u16, _data: u8) {}
}

#[cfg(test)]
mod tests {
    use super::super::Addressable;
    use super::Rom;

    #[test]
    fn reads_return_image_bytes_and_writes_are_ignored() {
        let mut rom = Rom::new(vec![0xDE, 0xAD]);
        assert_eq!(rom.read(0), 0xDE);
        assert_eq!(rom.read(1), 0xAD);

        rom.write(0, 0x00);
        assert_eq!(rom.read(0), 0xDE);
    }

    #[test]
    fn reads_past_the_image_end_return_zero() {
        let mut rom = Rom::new(vec![0xFF]);
        assert_eq!(rom.read(1), 0x00);
        assert_eq!(rom.read(0xFFFF), 0x00);
    }
}
