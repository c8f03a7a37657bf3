//! Caller-supplied capabilities consumed during one fixup.
//!
//! The engine never touches memory directly. Every sub-access goes through
//! `FixupBus`, which routes it to one of two backings:
//! - ordinary faultable memory, reached through safe-copy primitives that
//!   may fail byte-wise (unmapped page, revoked access), and
//! - constrained (device) memory, which only tolerates byte-granular,
//!   order-preserving accesses.

/// Memory backing kind for one effective address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemClass {
    /// Ordinary faultable memory; safe-copy primitives apply.
    Normal,
    /// Constrained memory; byte-at-a-time access in ascending order only.
    Device,
}

/// Privilege of the faulting context, used for instruction fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// Fault taken from unprivileged code.
    User,
    /// Fault taken from privileged code.
    Kernel,
}

/// A memory sub-access that could not be completed.
///
/// `addr` is the start of the failing sub-access, which is not necessarily
/// the address the hardware originally faulted on (a pair's second half,
/// for example, fails at its own address).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessError {
    /// Address of the failing sub-access.
    pub addr: u64,
}

impl AccessError {
    /// Error for the sub-access starting at `addr`.
    #[must_use]
    pub const fn at(addr: u64) -> Self {
        Self { addr }
    }
}

/// Platform capabilities for one fixup invocation.
///
/// Methods take `&mut self` so test harnesses can record access order;
/// real platforms are typically stateless wrappers over copy primitives.
pub trait FixupBus {
    /// Classify one effective address. Called once per sub-access; the
    /// engine never reuses an answer across sub-accesses.
    fn classify(&self, addr: u64) -> MemClass;

    /// Fetch the 32-bit little-endian instruction word at the faulting
    /// program counter.
    fn fetch_insn(&mut self, pc: u64, privilege: Privilege) -> Result<u32, AccessError>;

    /// Read `buf.len()` bytes from ordinary memory. A failing byte fails
    /// the whole access; the engine discards partially filled buffers.
    fn copy_from(&mut self, addr: u64, buf: &mut [u8]) -> Result<(), AccessError>;

    /// Write `buf.len()` bytes to ordinary memory.
    fn copy_to(&mut self, addr: u64, buf: &[u8]) -> Result<(), AccessError>;

    /// Zero `len` bytes of ordinary memory starting at `addr`.
    fn bulk_zero(&mut self, addr: u64, len: usize) -> Result<(), AccessError>;

    /// Read one byte of device memory. The engine issues these strictly in
    /// ascending address order.
    fn device_read_byte(&mut self, addr: u64) -> Result<u8, AccessError>;

    /// Write one byte of device memory. Same ordering guarantee as reads.
    fn device_write_byte(&mut self, addr: u64, value: u8) -> Result<(), AccessError>;

    /// Zero-block size parameter in DCZID format: log2 of the block size
    /// in 32-bit words, so the zeroed block is `4 << dczid()` bytes. Only
    /// the low four bits are consulted. Defaults to 4 (64-byte blocks).
    fn dczid(&self) -> u32 {
        4
    }
}
