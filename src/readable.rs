//MIT License
//
//Copyright (c) [2017] [Mark Han]
//
//Permission is hereby granted, free of charge, to any person obtaining a copy
//of this software and associated documentation files (the "Software"), to deal
//in the Software without restriction, including without limitation the rights
//to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
//copies of the Software, and to permit persons to whom the Software is
//furnished to do so, subject to the following conditions:
//
//The above copyright notice and this permission notice shall be included in all
//copies or substantial portions of the Software.
//
//THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
//IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
//OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
//SOFTWARE.

use std::cmp;

use crate::errors::*;
use crate::frame::constants::{DEFAULT_BASE, SYNCHSAFE_BASE};
use crate::util;

///
/// Sequential reader over a borrowed byte slice.
///
/// Every parse routine threads one of these. Reading past the end is an
/// `IllegalFormat` error, except for the `*_up_to` and `to_readable` family
/// which stop at the end like a slice would.
///
#[derive(Clone, Debug)]
pub struct Readable<'a> {
    bytes: &'a [u8],
    offset: usize
}

impl<'a> Readable<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Readable {
            bytes: bytes,
            offset: 0
        }
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn has_next(&self) -> bool {
        self.remaining() > 0
    }

    fn ensure(&self, amount: usize) -> Result<()> {
        if amount > self.remaining() {
            trace!("Readable.ensure=> amount:{}, offset:{}", amount, self.offset);
            return Err(Id3Error::from(FormatErrorKind::UnexpectedEnd {
                needed: amount,
                available: self.remaining()
            }));
        }

        Ok(())
    }

    pub fn look_bytes(&self, amount: usize) -> Result<&'a [u8]> {
        self.ensure(amount)?;
        Ok(&self.bytes[self.offset..self.offset + amount])
    }

    pub fn look_u8(&self) -> Result<u8> {
        Ok(self.look_bytes(1)?[0])
    }

    pub fn read_bytes(&mut self, amount: usize) -> Result<&'a [u8]> {
        let bytes = self.look_bytes(amount)?;
        self.offset = self.offset + amount;

        Ok(bytes)
    }

    /// Reads `amount` bytes, or whatever is left when that is less.
    pub fn read_bytes_up_to(&mut self, amount: usize) -> &'a [u8] {
        let amount = cmp::min(amount, self.remaining());
        let bytes = &self.bytes[self.offset..self.offset + amount];
        self.offset = self.offset + amount;

        bytes
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(util::unpack_int(self.read_bytes(4)?, DEFAULT_BASE) as u32)
    }

    // Sizes are 4bytes long big-endian but first bit is 0
    // @see http://id3.org/id3v2.4.0-structure > 6.2. Synchsafe integers
    pub fn read_synchsafe(&mut self) -> Result<u32> {
        Ok(util::unpack_int(self.read_bytes(4)?, SYNCHSAFE_BASE) as u32)
    }

    pub fn read_iso8859_1(&mut self, amount: usize) -> Result<String> {
        Ok(util::to_iso8859_1(self.read_bytes(amount)?))
    }

    pub fn skip_bytes(&mut self, amount: usize) -> usize {
        let amount = cmp::min(amount, self.remaining());
        self.offset = self.offset + amount;
        trace!("Readable.skip=> amount:{}, offset:{}", amount, self.offset);

        amount
    }

    /// Unread bytes, without consuming them.
    pub fn tail(&self) -> &'a [u8] {
        &self.bytes[self.offset..]
    }

    /// Unread bytes, consuming them.
    pub fn all_bytes(&mut self) -> &'a [u8] {
        let bytes = self.tail();
        self.offset = self.bytes.len();

        bytes
    }

    /// A reader over the next `amount` bytes; this reader moves past them.
    pub fn to_readable(&mut self, amount: usize) -> Readable<'a> {
        Readable::new(self.read_bytes_up_to(amount))
    }

    /// A reader over the unread bytes; this reader does not move.
    pub fn fork(&self) -> Readable<'a> {
        Readable::new(self.tail())
    }
}
