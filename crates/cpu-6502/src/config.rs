//! Core configuration.

/// Where `load` places programs unless configured otherwise.
pub const DEFAULT_LOAD_ADDRESS: u16 = 0x8000;

/// Configuration for a [`Mos6502`](crate::Mos6502).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CpuConfig {
    /// Address `load` copies the program to and points PC at.
    pub load_address: u16,
    /// Maximum instructions a single `run` may execute before failing.
    /// `None` runs until `BRK`, however long that takes.
    pub step_limit: Option<u64>,
}

impl CpuConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            load_address: DEFAULT_LOAD_ADDRESS,
            step_limit: None,
        }
    }

    #[must_use]
    pub const fn with_load_address(mut self, load_address: u16) -> Self {
        self.load_address = load_address;
        self
    }

    #[must_use]
    pub const fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Bytes available from the load address to the top of memory.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        emu_core::ADDRESS_SPACE - self.load_address as usize
    }
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CpuConfig::default();
        assert_eq!(config.load_address, 0x8000);
        assert_eq!(config.step_limit, None);
        assert_eq!(config.capacity(), 0x8000);
    }

    #[test]
    fn builder() {
        let config = CpuConfig::new()
            .with_load_address(0x0600)
            .with_step_limit(1000);
        assert_eq!(config.load_address, 0x0600);
        assert_eq!(config.step_limit, Some(1000));
        assert_eq!(config.capacity(), 0xFA00);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_fields_take_defaults() {
        let config: CpuConfig = serde_json::from_str(r#"{"step_limit": 10}"#).unwrap();
        assert_eq!(config.load_address, 0x8000);
        assert_eq!(config.step_limit, Some(10));
    }
}
