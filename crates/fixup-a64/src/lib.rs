//! A64 load/store alignment-fault emulation.
//!
//! Given the instruction that faulted, a register context, and the
//! caller's memory capabilities, [`fixup`] decodes the word and applies
//! its full architectural effect: addressing modes with write-back, sign-
//! and zero-extension, vector lane and structure geometry, and the
//! cache-line-zero block operation. Anything it cannot reproduce exactly
//! is declined with state untouched, so the caller can fall back to
//! normal fault delivery.
//!
//! The crate is `no_std`, allocation-free, and loop-bounded: every
//! iteration count comes from a fixed instruction field, never from
//! memory contents.

#![no_std]

mod decode;
mod ea;
mod fixup;
mod insn;
mod mem;
pub mod op;
mod scalar;
#[cfg(test)]
mod testbus;
mod vecreg;
mod vector;

pub use decode::{DecodeError, decode};
pub use fixup::fixup;
pub use op::Op;
pub use vecreg::{element, replicate, set_element};
