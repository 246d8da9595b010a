use std::io::Write;

use crate::errors::*;
use crate::frame::FlagAware;
use crate::frame::constants::{HeadFlag, SUPPORTED_MAJOR_VERSION, TAG_ID};
use crate::readable::Readable;
use crate::util;
use crate::writable::Writable;

///
/// # ID3V2 Header flags
///
/// `%abcd0000`
///
/// [See](http://id3.org/id3v2.4.0-structure) > 3.1. ID3v2 header
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadFlags {
    pub unsynchronisation: bool,
    pub extended_header: bool,
    pub experimental: bool,
    pub footer: bool
}

impl HeadFlags {
    pub fn from_byte(byte: u8) -> Self {
        HeadFlags {
            unsynchronisation: util::get_flag(byte, 7),
            extended_header: util::get_flag(byte, 6),
            experimental: util::get_flag(byte, 5),
            footer: util::get_flag(byte, 4)
        }
    }

    pub fn to_byte(&self) -> Result<u8> {
        util::pack_flags(&[
            self.unsynchronisation,
            self.extended_header,
            self.experimental,
            self.footer,
            false, false, false, false
        ])
    }
}

///
/// # ID3V2 Header
///
/// - [V2.3](http://id3.org/id3v2.3.0#ID3v2_header)
/// - [V2.4](http://id3.org/id3v2.4.0-structure) > 3.1. ID3v2 header
///
/// `size` is the value found on the wire. It excludes the header and the footer.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Head {
    pub version: u8,
    pub minor_version: u8,
    pub flags: HeadFlags,
    pub size: u32
}

impl Head {
    pub fn new() -> Self {
        Head {
            version: SUPPORTED_MAJOR_VERSION,
            minor_version: 0,
            flags: HeadFlags::default(),
            size: 0
        }
    }

    pub fn read(readable: &mut Readable) -> Result<Self> {
        let tag_id = readable.read_bytes(3)?;
        if tag_id != TAG_ID {
            debug!("Head.read=> not a tag: {}", util::to_hex(tag_id));
            return Err(Id3Error::from(FormatErrorKind::InvalidTagId));
        }

        let version = readable.read_u8()?;
        let minor_version = readable.read_u8()?;
        if version > SUPPORTED_MAJOR_VERSION {
            return Err(Id3Error::UnsupportedVersion {
                major: version,
                minor: minor_version
            });
        }

        let flags = HeadFlags::from_byte(readable.read_u8()?);
        let size = readable.read_synchsafe()?;
        trace!("Head.read=> v2.{}.{}, flags: {:?}, size: {}", version, minor_version, flags, size);

        Ok(Head {
            version: version,
            minor_version: minor_version,
            flags: flags,
            size: size
        })
    }

    ///
    /// Writes the 10 header bytes as v2.4.0 with the given `size`.
    ///
    /// `identifier` is `ID3` for the header and `3DI` for the footer.
    /// The unsynchronisation flag is never written, frames are not unsynchronised
    /// as a whole tag.
    ///
    pub fn write<W: Write>(&self, writable: &mut Writable<W>, identifier: &[u8], size: u32) -> Result<()> {
        let flags = HeadFlags { unsynchronisation: false, ..self.flags };
        writable.write(identifier)?;
        writable.u8(SUPPORTED_MAJOR_VERSION)?;
        writable.u8(0)?;
        writable.u8(flags.to_byte()?)?;
        writable.synchsafe(size)
    }
}

impl Default for Head {
    fn default() -> Self {
        Head::new()
    }
}

impl FlagAware<HeadFlag> for Head {
    fn has_flag(&self, flag: HeadFlag) -> bool {
        match flag {
            HeadFlag::Unsynchronisation => self.flags.unsynchronisation,
            HeadFlag::ExtendedHeader => self.flags.extended_header,
            HeadFlag::ExperimentalIndicator => self.flags.experimental,
            HeadFlag::FooterPresent => self.flags.footer
        }
    }

    fn set_flag(&mut self, flag: HeadFlag) {
        match flag {
            HeadFlag::Unsynchronisation => self.flags.unsynchronisation = true,
            HeadFlag::ExtendedHeader => self.flags.extended_header = true,
            HeadFlag::ExperimentalIndicator => self.flags.experimental = true,
            HeadFlag::FooterPresent => self.flags.footer = true
        }
    }
}

///
/// # Extended header
///
/// Only the size is kept. The rest is skipped on read and can not be written.
///
/// [See](http://id3.org/id3v2.4.0-structure) > 3.2. Extended header
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtendedHeader {
    pub size: u32
}

impl ExtendedHeader {
    /// Reads the size and moves past the whole extended header.
    pub fn read(readable: &mut Readable) -> Result<Self> {
        let size = readable.fork().read_synchsafe()?;
        let skipped = readable.skip_bytes(size as usize);
        trace!("ExtendedHeader.read=> size: {}, skipped: {}", size, skipped);

        Ok(ExtendedHeader { size: size })
    }
}
