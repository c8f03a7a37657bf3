//! Shared bus double for in-crate tests.
//!
//! One page of ordinary memory, one small device window, and a log of
//! every device touch in issue order. Everything outside the two windows
//! fails with the touched address, which is how tests provoke partial
//! transfers.

use align_core::{AccessError, FixupBus, MemClass, Privilege};

pub(crate) const RAM_BASE: u64 = 0x1000;
pub(crate) const RAM_SIZE: usize = 256;
pub(crate) const DEV_BASE: u64 = 0x2000;
pub(crate) const DEV_SIZE: usize = 32;

pub(crate) struct TestBus {
    pub ram: [u8; RAM_SIZE],
    pub dev: [u8; DEV_SIZE],
    /// Word returned by instruction fetch.
    pub insn: u32,
    pub fail_fetch: bool,
    pub dczid: u32,
    /// Device touches in issue order, reads and writes alike.
    pub touched: [u64; 64],
    pub touches: usize,
    pub fetches: usize,
    pub fetched_as: Option<Privilege>,
}

impl TestBus {
    pub fn new() -> Self {
        Self {
            ram: [0; RAM_SIZE],
            dev: [0; DEV_SIZE],
            insn: 0,
            fail_fetch: false,
            dczid: 4,
            touched: [0; 64],
            touches: 0,
            fetches: 0,
            fetched_as: None,
        }
    }

    fn record(&mut self, addr: u64) {
        self.touched[self.touches] = addr;
        self.touches += 1;
    }

    fn ram_range(addr: u64, len: usize) -> Result<usize, AccessError> {
        let off = addr.wrapping_sub(RAM_BASE) as usize;
        if addr < RAM_BASE || off >= RAM_SIZE || RAM_SIZE - off < len {
            return Err(AccessError::at(addr));
        }
        Ok(off)
    }

    fn dev_range(addr: u64) -> Result<usize, AccessError> {
        let off = addr.wrapping_sub(DEV_BASE) as usize;
        if addr < DEV_BASE || off >= DEV_SIZE {
            return Err(AccessError::at(addr));
        }
        Ok(off)
    }
}

impl FixupBus for TestBus {
    fn classify(&self, addr: u64) -> MemClass {
        if (DEV_BASE..DEV_BASE + DEV_SIZE as u64).contains(&addr) {
            MemClass::Device
        } else {
            MemClass::Normal
        }
    }

    fn fetch_insn(&mut self, pc: u64, privilege: Privilege) -> Result<u32, AccessError> {
        self.fetches += 1;
        self.fetched_as = Some(privilege);
        if self.fail_fetch {
            return Err(AccessError::at(pc));
        }
        Ok(self.insn)
    }

    fn copy_from(&mut self, addr: u64, buf: &mut [u8]) -> Result<(), AccessError> {
        let off = Self::ram_range(addr, buf.len())?;
        buf.copy_from_slice(&self.ram[off..off + buf.len()]);
        Ok(())
    }

    fn copy_to(&mut self, addr: u64, buf: &[u8]) -> Result<(), AccessError> {
        let off = Self::ram_range(addr, buf.len())?;
        self.ram[off..off + buf.len()].copy_from_slice(buf);
        Ok(())
    }

    fn bulk_zero(&mut self, addr: u64, len: usize) -> Result<(), AccessError> {
        let off = Self::ram_range(addr, len)?;
        self.ram[off..off + len].fill(0);
        Ok(())
    }

    fn device_read_byte(&mut self, addr: u64) -> Result<u8, AccessError> {
        self.record(addr);
        Ok(self.dev[Self::dev_range(addr)?])
    }

    fn device_write_byte(&mut self, addr: u64, value: u8) -> Result<(), AccessError> {
        self.record(addr);
        self.dev[Self::dev_range(addr)?] = value;
        Ok(())
    }

    fn dczid(&self) -> u32 {
        self.dczid
    }
}
