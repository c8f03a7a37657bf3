//! Decoded operations: what the executors consume.
//!
//! Decode derives every field exactly once. The executors never look back
//! at the instruction word, so each variant carries the full transfer
//! geometry: direction, size, registers, addressing, and — for vector
//! forms — element size, lane, and structure shape.

/// Transfer or element size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    /// 1 byte.
    Byte,
    /// 2 bytes.
    Half,
    /// 4 bytes.
    Word,
    /// 8 bytes.
    Double,
    /// 16 bytes (always transferred as two 8-byte halves).
    Quad,
}

impl Size {
    /// Size for a size-field exponent (0 = byte .. 4 = quad).
    #[must_use]
    pub const fn from_log2(exp: u32) -> Option<Self> {
        match exp {
            0 => Some(Self::Byte),
            1 => Some(Self::Half),
            2 => Some(Self::Word),
            3 => Some(Self::Double),
            4 => Some(Self::Quad),
            _ => None,
        }
    }

    /// Size in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
            Self::Double => 8,
            Self::Quad => 16,
        }
    }

    /// Size in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        (self.bytes() * 8) as u32
    }

    /// log2 of the byte size (the scaling exponent).
    #[must_use]
    pub const fn log2(self) -> u32 {
        match self {
            Self::Byte => 0,
            Self::Half => 1,
            Self::Word => 2,
            Self::Double => 3,
            Self::Quad => 4,
        }
    }
}

/// Destination register width for scalar loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegWidth {
    /// 32-bit destination; the upper word of the register is cleared.
    W32,
    /// Full 64-bit destination.
    X64,
}

impl RegWidth {
    /// Mask a 64-bit value down to this width.
    #[must_use]
    pub const fn mask(self, value: u64) -> u64 {
        match self {
            Self::W32 => value & 0xffff_ffff,
            Self::X64 => value,
        }
    }
}

/// How the offset participates in addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    /// Offset applied for the transfer only; no write-back.
    Offset,
    /// Offset applied before the transfer; base written back.
    PreIndex,
    /// Transfer at the unmodified base; offset applied at write-back.
    PostIndex,
}

/// Offset-register extension for register-offset forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extend {
    /// Zero-extend the low 32 bits.
    Uxtw,
    /// Full 64 bits, no extension.
    Lsl,
    /// Sign-extend the low 32 bits.
    Sxtw,
    /// Full 64 bits (sign extension is the identity at 64 bits).
    Sxtx,
}

/// Scalar register pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairOp {
    pub load: bool,
    /// Sign-extend the loaded 32-bit values to 64 bits.
    pub signed: bool,
    /// Size of each of the two transfers (word or double).
    pub size: Size,
    pub rt: u8,
    pub rt2: u8,
    pub rn: u8,
    /// Byte offset, already scaled.
    pub offset: i64,
    pub index: IndexMode,
}

/// Vector register pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VecPairOp {
    pub load: bool,
    /// Size of each of the two transfers (word, double, or quad).
    pub size: Size,
    pub rt: u8,
    pub rt2: u8,
    pub rn: u8,
    /// Byte offset, already scaled.
    pub offset: i64,
    pub index: IndexMode,
}

/// Scalar immediate-offset form (unsigned scaled, unscaled, pre/post).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImmOp {
    pub load: bool,
    pub signed: bool,
    /// Destination width for loads; unused for stores.
    pub width: RegWidth,
    pub size: Size,
    pub rt: u8,
    pub rn: u8,
    /// Byte offset, already scaled where the encoding scales.
    pub offset: i64,
    pub index: IndexMode,
}

/// Vector immediate-offset form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VecImmOp {
    pub load: bool,
    pub size: Size,
    pub rt: u8,
    pub rn: u8,
    pub offset: i64,
    pub index: IndexMode,
}

/// Scalar register-offset form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegOffsetOp {
    pub load: bool,
    pub signed: bool,
    pub width: RegWidth,
    pub size: Size,
    pub rt: u8,
    pub rn: u8,
    pub rm: u8,
    pub extend: Extend,
    /// Left shift applied after extension: the size exponent, or 0.
    pub shift: u8,
}

/// Vector register-offset form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VecRegOffsetOp {
    pub load: bool,
    pub size: Size,
    pub rt: u8,
    pub rn: u8,
    pub rm: u8,
    pub extend: Extend,
    pub shift: u8,
}

/// Vector multiple-structure form (whole-register interleaved transfers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VecMultiOp {
    pub load: bool,
    /// 128-bit registers when set, 64-bit otherwise.
    pub q: bool,
    /// Element size (byte..double).
    pub esize: Size,
    /// Consecutive registers each holding a full run of elements.
    pub rpt: u8,
    /// Elements per structure (interleave factor).
    pub selem: u8,
    /// First register of the list; the list wraps modulo 32.
    pub rt: u8,
    pub rn: u8,
    /// Post-index advance register; 31 means advance by the transfer size.
    pub rm: u8,
    pub wback: bool,
}

/// Vector single-structure form (one lane, or replicate-to-all-lanes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VecSingleOp {
    pub load: bool,
    /// Broadcast one element into every lane (load-only).
    pub replicate: bool,
    /// 128-bit arrangement when set (replicate fills both halves).
    pub q: bool,
    pub esize: Size,
    /// Structure elements: consecutive registers, one element each.
    pub selem: u8,
    /// Lane index for non-replicate transfers.
    pub lane: u8,
    pub rt: u8,
    pub rn: u8,
    /// Post-index advance register; 31 means advance by the transfer size.
    pub rm: u8,
    pub wback: bool,
}

/// One decoded load/store-class operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Pair(PairOp),
    VecPair(VecPairOp),
    Imm(ImmOp),
    VecImm(VecImmOp),
    RegOffset(RegOffsetOp),
    VecRegOffset(VecRegOffsetOp),
    VecMulti(VecMultiOp),
    VecSingle(VecSingleOp),
    /// Cache-line zero: zero the block containing the address in `rt`.
    Zva { rt: u8 },
    /// Prefetch sub-forms: no transfer, always succeeds.
    Prefetch,
}
