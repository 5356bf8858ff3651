//! Core traits and types for instruction-level emulation.
//!
//! A CPU core owns its address space through a [`Bus`] and exposes its
//! state through [`Observable`]. The host emulator supplies programs and
//! inspects the result; nothing here knows about files or output.

mod bus;
mod cpu;
mod observable;

pub use bus::{Bus, Ram, ADDRESS_SPACE};
pub use cpu::Cpu;
pub use observable::{Observable, Value};
