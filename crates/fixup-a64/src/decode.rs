//! Instruction classification and family decoders.
//!
//! `decode` is pure: 32-bit word in, decoded operation or typed rejection
//! out, no register or memory access. A fixed (mask, pattern) table
//! mirrors the architecture's top-level load/store routing over op0
//! (bits 31:28), op1 (bit 26), op2 (bits 24:23), op3 (bits 21:16), and
//! op4 (bits 11:10); each family decoder then applies its own
//! reserved-encoding and register-hazard rules. Families that are never
//! emulated (exclusives, acquire/release unscaled, literal, memory tags,
//! atomics, pointer-auth, unprivileged) are matched by the same table so
//! they are declined by name rather than falling through as noise.

use crate::insn::Insn;
use crate::op::{
    Extend, ImmOp, IndexMode, Op, PairOp, RegOffsetOp, RegWidth, Size, VecImmOp, VecMultiOp,
    VecPairOp, VecRegOffsetOp, VecSingleOp,
};

/// Why a word was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Unallocated, reserved, or excluded-family encoding.
    Unallocated,
    /// Register aliasing the architecture leaves constrained-unpredictable.
    Unpredictable,
}

#[derive(Debug, Clone, Copy)]
enum Family {
    /// DC ZVA, the one system instruction emulated here.
    Zva,
    Pair,
    UnsignedImm,
    Imm9,
    RegOffset,
    VecMulti,
    VecSingle,
    /// Never emulated: exclusives and compare-and-swap.
    Exclusive,
    /// Never emulated: acquire/release unscaled-immediate forms.
    Ordered,
    /// Never emulated: literal-relative loads.
    Literal,
    /// Never emulated: memory-tag load/store.
    MemTag,
    /// Never emulated: atomic read-modify-write operations.
    Atomic,
    /// Never emulated: pointer-authenticated loads.
    Pac,
}

/// Top-level group routing, first match wins.
///
/// Masks cover the fixed bits of each group's encoding diagram; everything
/// not matched by a row is not load/store-class.
const GROUPS: &[(u32, u32, Family)] = &[
    (0xffff_ffe0, 0xd50b_7420, Family::Zva),
    (0x3f00_0000, 0x0800_0000, Family::Exclusive),
    (0xff20_0000, 0xd920_0000, Family::MemTag),
    (0x3f20_0000, 0x1900_0000, Family::Ordered),
    (0x3b00_0000, 0x1800_0000, Family::Literal),
    (0x3a00_0000, 0x2800_0000, Family::Pair),
    (0x3b00_0000, 0x3900_0000, Family::UnsignedImm),
    (0x3b20_0000, 0x3800_0000, Family::Imm9),
    (0x3b20_0c00, 0x3820_0800, Family::RegOffset),
    (0x3b20_0c00, 0x3820_0000, Family::Atomic),
    (0x3b20_0400, 0x3820_0400, Family::Pac),
    (0xbf20_0000, 0x0c00_0000, Family::VecMulti),
    (0xbf00_0000, 0x0d00_0000, Family::VecSingle),
];

/// Decode one instruction word.
pub fn decode(word: u32) -> Result<Op, DecodeError> {
    let insn = Insn(word);
    for &(mask, pattern, family) in GROUPS {
        if word & mask == pattern {
            return decode_family(family, insn);
        }
    }
    Err(DecodeError::Unallocated)
}

fn decode_family(family: Family, insn: Insn) -> Result<Op, DecodeError> {
    match family {
        Family::Zva => Ok(Op::Zva { rt: insn.rt() }),
        Family::Pair => decode_pair(insn),
        Family::UnsignedImm => decode_unsigned_imm(insn),
        Family::Imm9 => decode_imm9(insn),
        Family::RegOffset => decode_reg_offset(insn),
        Family::VecMulti => decode_vec_multi(insn),
        Family::VecSingle => decode_vec_single(insn),
        Family::Exclusive
        | Family::Ordered
        | Family::Literal
        | Family::MemTag
        | Family::Atomic
        | Family::Pac => Err(DecodeError::Unallocated),
    }
}

/// Scalar load/store opc grid: direction, signedness, destination width.
///
/// opc 00 = store, 01 = unsigned load, 10 = signed load to a 64-bit
/// destination (sizes 0-2 only), 11 = signed load to a 32-bit destination
/// (sizes 0-1 only). Callers handle the size=3/opc=2 prefetch forms
/// before consulting the grid.
fn scalar_opc(sz: u32, opc: u32) -> Result<(bool, bool, RegWidth), DecodeError> {
    match opc {
        0 => Ok((false, false, RegWidth::X64)),
        1 => Ok((true, false, if sz == 3 { RegWidth::X64 } else { RegWidth::W32 })),
        2 if sz < 3 => Ok((true, true, RegWidth::X64)),
        3 if sz < 2 => Ok((true, true, RegWidth::W32)),
        _ => Err(DecodeError::Unallocated),
    }
}

/// Register pair: opc[31:30] 101 V 0 idx[24:23] L imm7 Rt2 Rn Rt.
fn decode_pair(insn: Insn) -> Result<Op, DecodeError> {
    let opc = insn.bits(31, 30);
    let load = insn.bit(22);
    let (rt, rt2, rn) = (insn.rt(), insn.rt2(), insn.rn());
    // idx: 00 non-temporal (plain offset addressing), 01 post-index,
    // 10 signed offset, 11 pre-index.
    let nontemporal = insn.bits(24, 23) == 0;
    let index = match insn.bits(24, 23) {
        1 => IndexMode::PostIndex,
        3 => IndexMode::PreIndex,
        _ => IndexMode::Offset,
    };

    if insn.bit(26) {
        let size = match opc {
            0 => Size::Word,
            1 => Size::Double,
            2 => Size::Quad,
            _ => return Err(DecodeError::Unallocated),
        };
        if load && rt == rt2 {
            return Err(DecodeError::Unpredictable);
        }
        let offset = insn.imm7() << size.log2();
        return Ok(Op::VecPair(VecPairOp { load, size, rt, rt2, rn, offset, index }));
    }

    let (size, signed) = match opc {
        0 => (Size::Word, false),
        // Sign-extending pair load; the store slot is the allocation-tag
        // family and the non-temporal slot is unallocated.
        1 if load && !nontemporal => (Size::Word, true),
        2 => (Size::Double, false),
        _ => return Err(DecodeError::Unallocated),
    };
    if load && rt == rt2 {
        return Err(DecodeError::Unpredictable);
    }
    if index != IndexMode::Offset && rn != 31 && (rn == rt || rn == rt2) {
        return Err(DecodeError::Unpredictable);
    }
    let offset = insn.imm7() << size.log2();
    Ok(Op::Pair(PairOp { load, signed, size, rt, rt2, rn, offset, index }))
}

/// Unsigned scaled immediate: size 111 V 01 opc imm12 Rn Rt.
fn decode_unsigned_imm(insn: Insn) -> Result<Op, DecodeError> {
    let sz = insn.bits(31, 30);
    let opc = insn.opc();
    let (rt, rn) = (insn.rt(), insn.rn());

    if insn.bit(26) {
        let scale = (opc & 2) << 1 | sz;
        let size = Size::from_log2(scale).ok_or(DecodeError::Unallocated)?;
        let load = opc & 1 == 1;
        let offset = (u64::from(insn.imm12()) << scale) as i64;
        return Ok(Op::VecImm(VecImmOp { load, size, rt, rn, offset, index: IndexMode::Offset }));
    }

    if sz == 3 && opc == 2 {
        return Ok(Op::Prefetch);
    }
    let (load, signed, width) = scalar_opc(sz, opc)?;
    let size = Size::from_log2(sz).ok_or(DecodeError::Unallocated)?;
    let offset = (u64::from(insn.imm12()) << sz) as i64;
    Ok(Op::Imm(ImmOp { load, signed, width, size, rt, rn, offset, index: IndexMode::Offset }))
}

/// 9-bit immediate forms: size 111 V 00 opc 0 imm9 op4 Rn Rt, where op4
/// selects unscaled (00), post-index (01), unprivileged (10, declined),
/// or pre-index (11).
fn decode_imm9(insn: Insn) -> Result<Op, DecodeError> {
    let sz = insn.bits(31, 30);
    let opc = insn.opc();
    let (rt, rn) = (insn.rt(), insn.rn());
    let index = match insn.bits(11, 10) {
        0 => IndexMode::Offset,
        1 => IndexMode::PostIndex,
        3 => IndexMode::PreIndex,
        _ => return Err(DecodeError::Unallocated),
    };
    let offset = insn.imm9();

    if insn.bit(26) {
        let scale = (opc & 2) << 1 | sz;
        let size = Size::from_log2(scale).ok_or(DecodeError::Unallocated)?;
        let load = opc & 1 == 1;
        return Ok(Op::VecImm(VecImmOp { load, size, rt, rn, offset, index }));
    }

    if sz == 3 && opc == 2 {
        // Prefetch only exists without write-back.
        return if index == IndexMode::Offset {
            Ok(Op::Prefetch)
        } else {
            Err(DecodeError::Unallocated)
        };
    }
    let (load, signed, width) = scalar_opc(sz, opc)?;
    if index != IndexMode::Offset && rn != 31 && rn == rt {
        return Err(DecodeError::Unpredictable);
    }
    let size = Size::from_log2(sz).ok_or(DecodeError::Unallocated)?;
    Ok(Op::Imm(ImmOp { load, signed, width, size, rt, rn, offset, index }))
}

/// Register offset: size 111 V 00 opc 1 Rm option S 10 Rn Rt.
fn decode_reg_offset(insn: Insn) -> Result<Op, DecodeError> {
    let sz = insn.bits(31, 30);
    let opc = insn.opc();
    let (rt, rn, rm) = (insn.rt(), insn.rn(), insn.rm());
    // Sub-word extends are unallocated in this family.
    let extend = match insn.option() {
        2 => Extend::Uxtw,
        3 => Extend::Lsl,
        6 => Extend::Sxtw,
        7 => Extend::Sxtx,
        _ => return Err(DecodeError::Unallocated),
    };
    let scaled = insn.bit(12);

    if insn.bit(26) {
        let scale = (opc & 2) << 1 | sz;
        let size = Size::from_log2(scale).ok_or(DecodeError::Unallocated)?;
        let load = opc & 1 == 1;
        let shift = if scaled { scale as u8 } else { 0 };
        return Ok(Op::VecRegOffset(VecRegOffsetOp { load, size, rt, rn, rm, extend, shift }));
    }

    if sz == 3 && opc == 2 {
        return Ok(Op::Prefetch);
    }
    let (load, signed, width) = scalar_opc(sz, opc)?;
    // The index register's value would be ambiguous against the base it
    // offsets; the architecture leaves the combination unpredictable.
    if rn == rt && rn != 31 {
        return Err(DecodeError::Unpredictable);
    }
    let size = Size::from_log2(sz).ok_or(DecodeError::Unallocated)?;
    let shift = if scaled { sz as u8 } else { 0 };
    Ok(Op::RegOffset(RegOffsetOp { load, signed, width, size, rt, rn, rm, extend, shift }))
}

/// Multiple structures: 0 Q 001100 p L 0 Rm opcode size Rn Rt.
fn decode_vec_multi(insn: Insn) -> Result<Op, DecodeError> {
    let q = insn.bit(30);
    let post = insn.bit(23);
    let load = insn.bit(22);
    if !post && insn.bits(20, 16) != 0 {
        return Err(DecodeError::Unallocated);
    }
    let (rpt, selem) = match insn.bits(15, 12) {
        0b0000 => (1, 4),
        0b0010 => (4, 1),
        0b0100 => (1, 3),
        0b0110 => (3, 1),
        0b0111 => (1, 1),
        0b1000 => (1, 2),
        0b1010 => (2, 1),
        _ => return Err(DecodeError::Unallocated),
    };
    let sz = insn.bits(11, 10);
    // The 64-bit-element arrangement of a 64-bit register (one lane) only
    // exists for the non-interleaved forms.
    if sz == 3 && !q && selem != 1 {
        return Err(DecodeError::Unallocated);
    }
    let esize = Size::from_log2(sz).ok_or(DecodeError::Unallocated)?;
    Ok(Op::VecMulti(VecMultiOp {
        load,
        q,
        esize,
        rpt,
        selem,
        rt: insn.rt(),
        rn: insn.rn(),
        rm: insn.rm(),
        wback: post,
    }))
}

/// Single structure: 0 Q 001101 p L R Rm opc S size Rn Rt.
fn decode_vec_single(insn: Insn) -> Result<Op, DecodeError> {
    let q = insn.bit(30);
    let post = insn.bit(23);
    let load = insn.bit(22);
    let r = insn.bit(21);
    if !post && insn.bits(20, 16) != 0 {
        return Err(DecodeError::Unallocated);
    }
    let opc = insn.bits(15, 13);
    let s = insn.bit(12);
    let sz = insn.bits(11, 10);
    let selem = ((opc as u8 & 1) << 1 | u8::from(r)) + 1;

    let (esize, lane, replicate) = match opc >> 1 {
        0 => (
            Size::Byte,
            u8::from(q) << 3 | u8::from(s) << 2 | sz as u8,
            false,
        ),
        1 => {
            if sz & 1 != 0 {
                return Err(DecodeError::Unallocated);
            }
            (
                Size::Half,
                u8::from(q) << 2 | u8::from(s) << 1 | (sz >> 1) as u8,
                false,
            )
        }
        2 if sz == 0 => (Size::Word, u8::from(q) << 1 | u8::from(s), false),
        2 if sz == 1 && !s => (Size::Double, u8::from(q), false),
        3 => {
            // Replicate forms are load-only and carry no lane index.
            if !load || s {
                return Err(DecodeError::Unallocated);
            }
            (Size::from_log2(sz).ok_or(DecodeError::Unallocated)?, 0, true)
        }
        _ => return Err(DecodeError::Unallocated),
    };
    Ok(Op::VecSingle(VecSingleOp {
        load,
        replicate,
        q,
        esize,
        selem,
        lane,
        rt: insn.rt(),
        rn: insn.rn(),
        rm: insn.rm(),
        wback: post,
    }))
}
