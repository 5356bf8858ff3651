//! Memory interface.

/// Size of the 16-bit address space in bytes.
pub const ADDRESS_SPACE: usize = 0x1_0000;

/// Memory interface.
///
/// A CPU core reaches memory only through this trait. Addresses are 16-bit
/// and wrap at 64 KiB; there is no notion of an out-of-range access.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);

    /// Read a byte without side effects.
    ///
    /// Used by debuggers and state dumps. Must never change what a later
    /// `read` returns.
    fn peek(&self, address: u16) -> u8;

    /// Copy `data` into memory starting at `base`, wrapping past `$FFFF`.
    fn load(&mut self, base: u16, data: &[u8]) {
        for (offset, &byte) in data.iter().enumerate() {
            self.write(base.wrapping_add(offset as u16), byte);
        }
    }
}

/// Flat 64 KiB RAM.
///
/// Every address is plain read/write storage: no mirroring, no I/O, no
/// protection. This is the default address space for a standalone core.
#[derive(Clone)]
pub struct Ram {
    bytes: Box<[u8; ADDRESS_SPACE]>,
}

impl Ram {
    /// Create zero-filled RAM.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: Box::new([0; ADDRESS_SPACE]),
        }
    }

    /// The whole address space as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.bytes.iter().filter(|&&b| b != 0).count();
        f.debug_struct("Ram").field("non_zero_bytes", &used).finish()
    }
}

impl Bus for Ram {
    fn read(&mut self, address: u16) -> u8 {
        self.bytes[address as usize]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.bytes[address as usize] = value;
    }

    fn peek(&self, address: u16) -> u8 {
        self.bytes[address as usize]
    }

    fn load(&mut self, base: u16, data: &[u8]) {
        let start = base as usize;
        let end = start + data.len();
        if end <= ADDRESS_SPACE {
            self.bytes[start..end].copy_from_slice(data);
        } else {
            let split = ADDRESS_SPACE - start;
            self.bytes[start..].copy_from_slice(&data[..split]);
            // Wrapped tail; anything beyond a full lap overwrites itself.
            for (offset, &byte) in data[split..].iter().enumerate() {
                self.bytes[offset % ADDRESS_SPACE] = byte;
            }
        }
    }
}
