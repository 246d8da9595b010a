pub mod body;
pub mod constants;

use regex::Regex;

use crate::errors::*;
use crate::frame::body::*;
use crate::frame::constants::{FrameHeaderFlag, FRAME_HEADER_SIZE, SUPPORTED_MAJOR_VERSION};
use crate::readable::Readable;
use crate::util;
use crate::writable::Writable;

const FRAME_ID_PATTERN: &'static str = r"^[A-Z0-9]{4}$";

pub trait FrameReader<T> {
    fn read(readable: &mut Readable) -> Result<T>;
}

pub trait FrameWriter {
    fn write(&self, writable: &mut Writable<Vec<u8>>) -> Result<()>;
}

pub trait FlagAware<T> {
    fn has_flag(&self, flag: T) -> bool;
    fn set_flag(&mut self, flag: T);
}

fn is_valid_id(id: &str) -> bool {
    match Regex::new(FRAME_ID_PATTERN) {
        Ok(re) => re.is_match(id),
        Err(e) => {
            warn!("is_valid_id=> {}", e);
            false
        }
    }
}

// Ids found in a tag only have to be 4 ASCII bytes without NUL, they are kept as they are.
fn is_wire_id(id: &[u8]) -> bool {
    id.len() == 4 && id.iter().all(|b| b.is_ascii() && *b != 0)
}

type CanHandle = fn(&str) -> bool;
type BodyReader = fn(&mut Readable) -> Result<FrameBody>;

fn read_text(readable: &mut Readable) -> Result<FrameBody> {
    TEXT::read(readable).map(FrameBody::TEXT)
}

fn read_comm(readable: &mut Readable) -> Result<FrameBody> {
    COMM::read(readable).map(FrameBody::COMM)
}

fn read_popm(readable: &mut Readable) -> Result<FrameBody> {
    POPM::read(readable).map(FrameBody::POPM)
}

fn read_pcnt(readable: &mut Readable) -> Result<FrameBody> {
    PCNT::read(readable).map(FrameBody::PCNT)
}

fn read_object(readable: &mut Readable) -> Result<FrameBody> {
    OBJECT::read(readable).map(FrameBody::OBJECT)
}

// Checked in order. The first match wins, `OBJECT` takes what nothing claims.
static FRAME_TYPES: [(CanHandle, BodyReader); 4] = [
    (TEXT::can_handle, read_text),
    (COMM::can_handle, read_comm),
    (POPM::can_handle, read_popm),
    (PCNT::can_handle, read_pcnt)
];

fn body_reader(id: &str) -> BodyReader {
    FRAME_TYPES.iter()
        .find(|&&(can_handle, _)| can_handle(id))
        .map(|&(_, reader)| reader)
        .unwrap_or(read_object)
}

///
/// # Frame header status flags
///
/// `%0abc0000`
///
/// [See](http://id3.org/id3v2.4.0-structure) > 4.1.1. Frame status flags
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusFlags {
    pub tag_alter: bool,
    pub file_alter: bool,
    pub read_only: bool
}

impl StatusFlags {
    pub fn from_byte(byte: u8) -> Self {
        StatusFlags {
            tag_alter: util::get_flag(byte, 6),
            file_alter: util::get_flag(byte, 5),
            read_only: util::get_flag(byte, 4)
        }
    }

    pub fn to_byte(&self) -> Result<u8> {
        util::pack_flags(&[
            false,
            self.tag_alter,
            self.file_alter,
            self.read_only,
            false, false, false, false
        ])
    }
}

///
/// # Frame header format flags
///
/// `%0h00kmnp`
///
/// [See](http://id3.org/id3v2.4.0-structure) > 4.1.2. Frame format flags
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatFlags {
    pub group_identity: bool,
    pub compression: bool,
    pub encryption: bool,
    pub unsynchronisation: bool,
    pub data_length: bool
}

impl FormatFlags {
    pub fn from_byte(byte: u8) -> Self {
        FormatFlags {
            group_identity: util::get_flag(byte, 6),
            compression: util::get_flag(byte, 3),
            encryption: util::get_flag(byte, 2),
            unsynchronisation: util::get_flag(byte, 1),
            data_length: util::get_flag(byte, 0)
        }
    }

    pub fn to_byte(&self) -> Result<u8> {
        util::pack_flags(&[
            false,
            self.group_identity,
            false,
            false,
            self.compression,
            self.encryption,
            self.unsynchronisation,
            self.data_length
        ])
    }

    fn check_supported(&self) -> Result<()> {
        if self.compression {
            return Err(Id3Error::UnsupportedFeature(Feature::Compression));
        }
        if self.encryption {
            return Err(Id3Error::UnsupportedFeature(Feature::Encryption));
        }

        Ok(())
    }
}

///
/// # Frame Header V2.4
///
/// `size` is the header length including the group id and the data length
/// indicator when they are present. `body_size` is the size field found on the
/// wire, so it counts those optional fields too.
///
/// [See](http://id3.org/id3v2.4.0-structure) > 4. ID3v2 frames overview
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameHeader {
    pub id: String,
    pub size: u32,
    pub body_size: u32,
    pub status: StatusFlags,
    pub format: FormatFlags,
    pub group_id: Option<u8>,
    pub data_length: Option<u32>
}

impl FrameHeader {
    pub fn new(id: &str) -> Result<Self> {
        if !is_valid_id(id) {
            return Err(Id3Error::invalid_argument(format!("Invalid frame id: {:?}", id)));
        }

        Ok(FrameHeader {
            id: id.to_string(),
            size: FRAME_HEADER_SIZE as u32,
            body_size: 0,
            status: StatusFlags::default(),
            format: FormatFlags::default(),
            group_id: None,
            data_length: None
        })
    }

    ///
    /// Frame sizes are synchsafe from v2.4 on, plain 32 bit integers before.
    ///
    pub fn read(readable: &mut Readable, version: u8) -> Result<Self> {
        let raw_id = readable.read_bytes(4)?;
        let id = util::to_iso8859_1(raw_id);
        if !is_wire_id(raw_id) {
            return Err(Id3Error::from(FormatErrorKind::InvalidFrameId(id)));
        }

        let body_size = if version >= SUPPORTED_MAJOR_VERSION {
            readable.read_synchsafe()?
        } else {
            readable.read_u32()?
        };
        let status = StatusFlags::from_byte(readable.read_u8()?);
        let format = FormatFlags::from_byte(readable.read_u8()?);

        let mut size = FRAME_HEADER_SIZE as u32;
        let group_id = if format.group_identity {
            size = size + 1;
            Some(readable.read_u8()?)
        } else {
            None
        };
        let data_length = if format.data_length {
            size = size + 4;
            Some(readable.read_synchsafe()?)
        } else {
            None
        };

        format.check_supported()?;

        Ok(FrameHeader {
            id: id,
            size: size,
            body_size: body_size,
            status: status,
            format: format,
            group_id: group_id,
            data_length: data_length
        })
    }

    fn extra_size(&self) -> u32 {
        let mut size = 0;
        if self.format.group_identity {
            size = size + 1;
        }
        if self.format.data_length {
            size = size + 4;
        }

        size
    }

    /// Number of body bytes that follow the optional header fields.
    pub fn payload_size(&self) -> u32 {
        self.body_size.saturating_sub(self.size.saturating_sub(FRAME_HEADER_SIZE as u32))
    }

    ///
    /// Always written as v2.4. `payload_size` is the length of the body as it
    /// follows the header, `data_length` the length before unsynchronisation.
    ///
    pub fn write(&self, writable: &mut Writable<Vec<u8>>, payload_size: u32, data_length: u32) -> Result<()> {
        self.format.check_supported()?;
        if !is_wire_id(self.id.as_bytes()) {
            return Err(Id3Error::invalid_argument(format!("Invalid frame id: {:?}", self.id)));
        }

        writable.string(&self.id)?;
        writable.synchsafe(payload_size + self.extra_size())?;
        writable.u8(self.status.to_byte()?)?;
        writable.u8(self.format.to_byte()?)?;

        if self.format.group_identity {
            writable.u8(self.group_id.unwrap_or(0))?;
        }
        if self.format.data_length {
            writable.synchsafe(data_length)?;
        }

        Ok(())
    }
}

impl FlagAware<FrameHeaderFlag> for FrameHeader {
    fn has_flag(&self, flag: FrameHeaderFlag) -> bool {
        match flag {
            FrameHeaderFlag::TagAlter => self.status.tag_alter,
            FrameHeaderFlag::FileAlter => self.status.file_alter,
            FrameHeaderFlag::ReadOnly => self.status.read_only,
            FrameHeaderFlag::GroupIdentity => self.format.group_identity,
            FrameHeaderFlag::Compression => self.format.compression,
            FrameHeaderFlag::Encryption => self.format.encryption,
            FrameHeaderFlag::Unsynchronisation => self.format.unsynchronisation,
            FrameHeaderFlag::DataLength => self.format.data_length
        }
    }

    fn set_flag(&mut self, flag: FrameHeaderFlag) {
        match flag {
            FrameHeaderFlag::TagAlter => self.status.tag_alter = true,
            FrameHeaderFlag::FileAlter => self.status.file_alter = true,
            FrameHeaderFlag::ReadOnly => self.status.read_only = true,
            FrameHeaderFlag::GroupIdentity => self.format.group_identity = true,
            FrameHeaderFlag::Compression => self.format.compression = true,
            FrameHeaderFlag::Encryption => self.format.encryption = true,
            FrameHeaderFlag::Unsynchronisation => self.format.unsynchronisation = true,
            FrameHeaderFlag::DataLength => self.format.data_length = true
        }
    }
}

///
/// A frame header and its decoded body.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub header: FrameHeader,
    pub body: FrameBody
}

impl Frame {
    pub fn new(header: FrameHeader, body: FrameBody) -> Self {
        Frame {
            header: header,
            body: body
        }
    }

    /// A text frame. `id` has to name a text frame, e.g. `TIT2`.
    pub fn text<S: Into<String>>(id: &str, text: S) -> Result<Self> {
        if !TEXT::can_handle(id) {
            return Err(Id3Error::invalid_argument(format!("{:?} is not a text frame", id)));
        }

        Ok(Frame::new(FrameHeader::new(id)?, FrameBody::TEXT(TEXT::new(text))))
    }

    pub fn comment<L, D, C>(language: L, description: D, comment: C) -> Result<Self>
        where L: Into<String>, D: Into<String>, C: Into<String> {
        let comm = COMM::new(language, description, comment)?;
        Ok(Frame::new(FrameHeader::new(constants::id::COMM_STR)?, FrameBody::COMM(comm)))
    }

    pub fn popularimeter<E, T, C>(email: E, rating: T, counter: C) -> Result<Self>
        where E: Into<String>,
              T: std::convert::TryInto<u8> + std::fmt::Display + Copy,
              C: Into<crate::counter::PlayCounter> {
        let popm = POPM::new(email, rating, counter)?;
        Ok(Frame::new(FrameHeader::new(constants::id::POPM_STR)?, FrameBody::POPM(popm)))
    }

    pub fn play_counter<C: Into<crate::counter::PlayCounter>>(counter: C) -> Result<Self> {
        let pcnt = PCNT::new(counter);
        Ok(Frame::new(FrameHeader::new(constants::id::PCNT_STR)?, FrameBody::PCNT(pcnt)))
    }

    /// A frame written back as the given bytes, whatever `id` is.
    pub fn unknown(id: &str, data: Vec<u8>) -> Result<Self> {
        Ok(Frame::new(FrameHeader::new(id)?, FrameBody::OBJECT(OBJECT { data: data })))
    }

    pub fn id(&self) -> &str {
        self.header.id.as_str()
    }

    ///
    /// Reads one frame. `version` is the major version of the enclosing tag.
    ///
    /// The reader ends up behind the bytes that were actually read; a
    /// frame that declares more than is left gets what is left.
    ///
    pub fn read(readable: &mut Readable, version: u8) -> Result<Self> {
        let header = FrameHeader::read(readable, version)?;

        let payload_size = header.payload_size() as usize;
        let payload = readable.read_bytes_up_to(payload_size);
        if payload.len() < payload_size {
            warn!("Frame.read=> {} declares {} bytes, but only {} left",
                  header.id, payload_size, payload.len());
        }

        let body = if header.format.unsynchronisation {
            body_reader(&header.id)(&mut Readable::new(&util::deunsync(payload)))?
        } else {
            body_reader(&header.id)(&mut Readable::new(payload))?
        };
        trace!("Frame.read=> {}: {:?}", header.id, body);

        Ok(Frame::new(header, body))
    }

    pub fn from_bytes(bytes: &[u8], version: u8) -> Result<Self> {
        Frame::read(&mut Readable::new(bytes), version)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut body = Writable::memory();
        self.body.write(&mut body)?;
        let data_length = body.total_write() as u32;
        let body = body.into_inner();
        let body = if self.header.format.unsynchronisation {
            util::unsync(&body)
        } else {
            body
        };

        let mut writable = Writable::memory();
        self.header.write(&mut writable, body.len() as u32, data_length)?;
        writable.write(&body)?;

        Ok(writable.into_inner())
    }
}
