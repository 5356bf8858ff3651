//! CPU core trait.

/// A CPU core that owns its address space.
///
/// The host drives the core one instruction at a time with [`Cpu::step`],
/// or lets an implementation-specific run loop drive it to a halt. CPUs
/// expose their registers for observation and debugging.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// The error a step can fail with.
    type Error;

    /// Execute one instruction. Returns the nominal cycles it takes.
    ///
    /// A halted CPU does nothing and returns 0.
    fn step(&mut self) -> Result<u32, Self::Error>;

    /// Reset the CPU to its power-on register state.
    fn reset(&mut self);

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU has executed a halt instruction.
    fn is_halted(&self) -> bool;
}
