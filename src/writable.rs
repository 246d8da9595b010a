use std::io::Write;

use crate::errors::*;
use crate::frame::constants::{DEFAULT_BASE, SYNCHSAFE_BASE};
use crate::util;

const SYNCHSAFE_MAX: u32 = 0x0fff_ffff;

pub struct Writable<W> where W: Write {
    output: W,
    total: usize
}

impl<W> Writable<W> where W: Write {
    pub fn new(output: W) -> Self {
        Writable {
            output: output,
            total: 0
        }
    }

    pub fn u8(&mut self, v: u8) -> Result<()> {
        self.write(&[v])
    }

    pub fn u32(&mut self, v: u32) -> Result<()> {
        self.write(&util::pack_int(v as u64, DEFAULT_BASE, 4))
    }

    pub fn synchsafe(&mut self, v: u32) -> Result<()> {
        if v > SYNCHSAFE_MAX {
            return Err(Id3Error::invalid_argument(
                format!("{} does not fit into a 28 bit synchsafe integer", v)));
        }

        self.write(&util::pack_int(v as u64, SYNCHSAFE_BASE, 4))
    }

    pub fn string(&mut self, v: &str) -> Result<()> {
        self.write(v.as_bytes())
    }

    // <text>0x00
    pub fn non_utf16_string(&mut self, v: &str) -> Result<()> {
        self.string(v)?;
        self.u8(0)
    }

    pub fn write(&mut self, v: &[u8]) -> Result<()> {
        self.output.write_all(v)?;
        self.total = self.total + v.len();

        Ok(())
    }

    pub fn total_write(&self) -> usize {
        self.total
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

impl Writable<Vec<u8>> {
    pub fn memory() -> Self {
        Writable::new(Vec::new())
    }
}
