//! Sub-access dispatch over the two memory classes.
//!
//! Every effective address is classified individually; one instruction can
//! mix classes across its sub-accesses. Ordinary memory uses the bus's
//! bulk copy primitives, constrained memory is walked one byte at a time
//! in ascending address order. All multi-byte values are little-endian.

use align_core::{AccessError, FixupBus, MemClass};

use crate::op::Size;

fn read_bytes<B: FixupBus>(bus: &mut B, addr: u64, buf: &mut [u8]) -> Result<(), AccessError> {
    match bus.classify(addr) {
        MemClass::Normal => bus.copy_from(addr, buf),
        MemClass::Device => {
            for (i, byte) in buf.iter_mut().enumerate() {
                *byte = bus.device_read_byte(addr.wrapping_add(i as u64))?;
            }
            Ok(())
        }
    }
}

fn write_bytes<B: FixupBus>(bus: &mut B, addr: u64, buf: &[u8]) -> Result<(), AccessError> {
    match bus.classify(addr) {
        MemClass::Normal => bus.copy_to(addr, buf),
        MemClass::Device => {
            for (i, &byte) in buf.iter().enumerate() {
                bus.device_write_byte(addr.wrapping_add(i as u64), byte)?;
            }
            Ok(())
        }
    }
}

/// Load up to eight bytes as one little-endian integer. Sixteen-byte
/// transfers are issued by the callers as two of these.
pub(crate) fn load_int<B: FixupBus>(bus: &mut B, addr: u64, size: Size) -> Result<u64, AccessError> {
    let mut buf = [0u8; 8];
    read_bytes(bus, addr, &mut buf[..size.bytes()])?;
    Ok(u64::from_le_bytes(buf))
}

/// Store the low `size` bytes of `value`, little-endian.
pub(crate) fn store_int<B: FixupBus>(
    bus: &mut B,
    addr: u64,
    size: Size,
    value: u64,
) -> Result<(), AccessError> {
    let buf = value.to_le_bytes();
    write_bytes(bus, addr, &buf[..size.bytes()])
}

/// Zero `len` bytes starting at `addr`.
pub(crate) fn zero_fill<B: FixupBus>(bus: &mut B, addr: u64, len: usize) -> Result<(), AccessError> {
    match bus.classify(addr) {
        MemClass::Normal => bus.bulk_zero(addr, len),
        MemClass::Device => {
            for i in 0..len {
                bus.device_write_byte(addr.wrapping_add(i as u64), 0)?;
            }
            Ok(())
        }
    }
}
