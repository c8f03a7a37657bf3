//! Lane arithmetic over 128-bit registers held as two 64-bit halves.
//!
//! Element sizes are 8, 16, 32, or 64 bits, so an element never straddles
//! the half boundary; all three helpers index the affected half and mask
//! within it.

/// Extract the `lane`-th `bits`-wide element of a 128-bit value.
#[must_use]
pub fn element(value: [u64; 2], bits: u32, lane: u8) -> u64 {
    let off = u32::from(lane) * bits;
    let half = value[(off / 64) as usize];
    let shifted = half >> (off % 64);
    if bits == 64 { shifted } else { shifted & ((1u64 << bits) - 1) }
}

/// Replace the `lane`-th `bits`-wide element, preserving all others.
pub fn set_element(value: &mut [u64; 2], bits: u32, lane: u8, element: u64) {
    let off = u32::from(lane) * bits;
    let half = &mut value[(off / 64) as usize];
    if bits == 64 {
        *half = element;
        return;
    }
    let mask = ((1u64 << bits) - 1) << (off % 64);
    *half = (*half & !mask) | ((element << (off % 64)) & mask);
}

/// Fill 64 bits with copies of a `bits`-wide element.
#[must_use]
pub fn replicate(element: u64, bits: u32) -> u64 {
    if bits == 64 {
        return element;
    }
    let mut out = element & ((1u64 << bits) - 1);
    let mut width = bits;
    while width < 64 {
        out |= out << width;
        width *= 2;
    }
    out
}
