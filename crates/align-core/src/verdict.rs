//! Fixup outcome reported to the fault dispatcher.

use crate::bus::AccessError;

/// Outcome of one fixup attempt.
///
/// The caller advances the program counter only on `Emulated`; the other
/// verdicts mean standard fault delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The instruction's full architectural effect was applied.
    Emulated,
    /// Declined at decode time; no register or memory state was touched.
    Unsupported,
    /// A memory sub-access failed mid-instruction. State committed by
    /// earlier sub-accesses of the same instruction is left in place.
    AccessFailed(AccessError),
}

impl Verdict {
    /// True for `Emulated`.
    #[must_use]
    pub const fn emulated(self) -> bool {
        matches!(self, Self::Emulated)
    }
}
