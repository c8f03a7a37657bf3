//! Core traits and types for alignment-fault fixup engines.
//!
//! A fixup engine runs synchronously inside an exception handler and owns
//! nothing: the faulting instruction, memory, device registers, and the
//! saved register state all arrive through the traits defined here. The
//! crate is `no_std` and allocation-free, so it is safe to use from the
//! restricted context the engines are called in.

#![no_std]

mod bus;
mod regs;
mod verdict;

pub use bus::{AccessError, FixupBus, MemClass, Privilege};
pub use regs::{RegisterFile, SavedRegs, VecHalf};
pub use verdict::Verdict;
