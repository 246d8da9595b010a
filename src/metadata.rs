use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::errors::*;
use crate::frame::Frame;
use crate::frame::constants::{FOOTER_ID, FOOTER_SIZE, FRAME_HEADER_SIZE, TAG_HEADER_SIZE, TAG_ID};
use crate::header::{ExtendedHeader, Head};
use crate::readable::Readable;
use crate::rw::{self, Storage};
use crate::util;
use crate::writable::Writable;

///
/// Frames of a tag in the order they appear.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub frames: Vec<Frame>
}

impl Body {
    ///
    /// Reads frames until the region ends or a zero byte starts padding.
    ///
    pub fn read(readable: &mut Readable, version: u8) -> Result<Self> {
        let mut frames = Vec::new();
        while readable.has_next() && readable.look_u8()? != 0 {
            let frame = Frame::read(&mut readable.fork(), version)?;
            readable.skip_bytes(FRAME_HEADER_SIZE + frame.header.body_size as usize);
            frames.push(frame);
        }

        if readable.has_next() {
            trace!("Body.read=> padding: {}", readable.remaining());
        }

        Ok(Body { frames: frames })
    }

    pub fn write(&self, writable: &mut Writable<Vec<u8>>) -> Result<()> {
        for frame in self.frames.iter() {
            writable.write(&frame.to_bytes()?)?;
        }

        Ok(())
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writable = Writable::memory();
        self.write(&mut writable)?;

        Ok(writable.into_inner())
    }
}

///
/// # ID3v2 tag
///
/// Serializing always produces a v2.4.0 tag. The size in `header` is the one
/// that was read; the size written is computed from the frames.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub header: Head,
    pub extended_header: Option<ExtendedHeader>,
    pub body: Body,
    #[serde(skip)]
    path: Option<PathBuf>
}

impl Tag {
    /// An empty v2.4 tag without flags.
    pub fn new() -> Self {
        Tag::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut readable = Readable::new(bytes);
        let header = Head::read(&mut readable)?;

        let mut body_size = header.size as usize;
        let extended_header = if header.flags.extended_header {
            let extended_header = ExtendedHeader::read(&mut readable)?;
            if extended_header.size as usize > body_size {
                return Err(Id3Error::from(FormatErrorKind::InvalidExtendedHeaderSize));
            }
            body_size = body_size - extended_header.size as usize;
            Some(extended_header)
        } else {
            None
        };

        let region = readable.read_bytes_up_to(body_size);
        if region.len() < body_size {
            warn!("Tag.from_bytes=> tag declares {} bytes, but only {} found", body_size, region.len());
        }

        // v2.4 frames carry their own unsynchronisation flag
        let region = if header.flags.unsynchronisation && header.version < 4 {
            Cow::Owned(util::deunsync(region))
        } else {
            Cow::Borrowed(region)
        };

        let body = Body::read(&mut Readable::new(&region), header.version)?;
        debug!("Tag.from_bytes=> v2.{}, frames: {}", header.version, body.frames.len());

        Ok(Tag {
            header: header,
            extended_header: extended_header,
            body: body,
            path: None
        })
    }

    ///
    /// Reads the header, then exactly as many bytes as it declares, plus the
    /// footer when there is one.
    ///
    pub fn from_reader<R: Read + ?Sized>(input: &mut R) -> Result<Self> {
        let mut bytes = rw::read_bytes(input, TAG_HEADER_SIZE)?;
        let header = Head::read(&mut Readable::new(&bytes))?;

        let mut remain = header.size as usize;
        if header.flags.footer {
            remain = remain + FOOTER_SIZE;
        }
        bytes.extend(rw::read_bytes(input, remain)?);

        Tag::from_bytes(&bytes)
    }

    ///
    /// Loads the tag of the file at `path`.
    ///
    /// A file without a readable tag gives an empty tag bound to `path`.
    /// Unsupported versions and features are still errors.
    ///
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut tag = match Tag::from_reader(&mut file) {
            Ok(tag) => tag,
            Err(ref e) if e.is_illegal_format() => {
                debug!("Tag.from_path=> {:?}: {}, starting from scratch", path, e);
                Tag::new()
            }
            Err(e) => return Err(e)
        };
        tag.path = Some(path.to_path_buf());

        Ok(tag)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref().map(|path| path.as_path())
    }

    pub fn add_frame(&mut self, frame: Frame) {
        self.body.frames.push(frame);
    }

    pub fn frames(&self) -> &[Frame] {
        &self.body.frames
    }

    pub fn frames_mut(&mut self) -> &mut Vec<Frame> {
        &mut self.body.frames
    }

    pub fn frames_by_id(&self, id: &str) -> Vec<&Frame> {
        self.body.frames.iter().filter(|frame| frame.id() == id).collect()
    }

    /// The only frame named `id`. Zero or several matches are an error.
    pub fn frame_by_id(&self, id: &str) -> Result<&Frame> {
        let mut found = self.frames_by_id(id);
        match found.len() {
            1 => Ok(found.remove(0)),
            0 => Err(Id3Error::invalid_argument(format!("No frame named {}", id))),
            n => Err(Id3Error::invalid_argument(
                format!("{} frames named {}, use frames_by_id", n, id)))
        }
    }

    pub fn frame_by_id_mut(&mut self, id: &str) -> Result<&mut Frame> {
        let mut found: Vec<&mut Frame> = self.body.frames.iter_mut()
                                                         .filter(|frame| frame.id() == id)
                                                         .collect();
        match found.len() {
            1 => Ok(found.remove(0)),
            0 => Err(Id3Error::invalid_argument(format!("No frame named {}", id))),
            n => Err(Id3Error::invalid_argument(
                format!("{} frames named {}, use frames_by_id", n, id)))
        }
    }

    /// Removes every frame named `id` and hands them back.
    pub fn remove_frames(&mut self, id: &str) -> Vec<Frame> {
        let (removed, kept): (Vec<Frame>, Vec<Frame>) = self.body.frames.drain(..)
                                                          .partition(|frame| frame.id() == id);
        self.body.frames = kept;

        removed
    }

    /// The size field a serialization without padding would carry.
    pub fn tag_size(&self) -> Result<u32> {
        Ok(self.body.to_bytes()?.len() as u32)
    }

    ///
    /// Header, frames, zero padding up to `min_length` and the footer when the
    /// header asks for one. `min_length` counts the header but not the footer.
    ///
    pub fn serialize(&self, min_length: usize) -> Result<Vec<u8>> {
        if self.header.flags.extended_header || self.extended_header.is_some() {
            return Err(Id3Error::UnsupportedFeature(Feature::ExtendedHeader));
        }

        let mut body = self.body.to_bytes()?;
        let min_body = min_length.saturating_sub(TAG_HEADER_SIZE);
        if body.len() < min_body {
            body.resize(min_body, 0);
        }
        let size = body.len() as u32;

        let mut writable = Writable::memory();
        self.header.write(&mut writable, TAG_ID, size)?;
        writable.write(&body)?;
        if self.header.flags.footer {
            self.header.write(&mut writable, FOOTER_ID, size)?;
        }

        Ok(writable.into_inner())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.serialize(0)
    }

    ///
    /// Replaces the tag at the start of `storage`.
    ///
    /// When the new tag fits into the old one it is padded to the old size and
    /// nothing behind it moves. The zero fill is tag padding: the written size
    /// field covers the whole old region, not just the frames. Otherwise
    /// everything behind the old tag is read into memory and written again after
    /// the new tag. That second path is not atomic: failing between the two
    /// writes leaves `storage` damaged.
    ///
    /// Only an `IllegalFormat` header counts as "no tag". A tag of an
    /// unsupported version, or an I/O error, is returned and `storage` is left
    /// untouched.
    ///
    pub fn write_to_storage<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<()> {
        let existing = storage.read_bytes_at(0, TAG_HEADER_SIZE)?;
        let initial_size = match Head::read(&mut Readable::new(&existing)) {
            Ok(head) => {
                let footer = if head.flags.footer { FOOTER_SIZE } else { 0 };
                TAG_HEADER_SIZE + head.size as usize + footer
            }
            Err(ref e) if e.is_illegal_format() => 0,
            Err(e) => return Err(e)
        };

        let current = self.to_bytes()?;
        if current.len() <= initial_size {
            let footer = if self.header.flags.footer { FOOTER_SIZE } else { 0 };
            let padded = self.serialize(initial_size - footer)?;
            debug!("Tag.write_to_storage=> in place, old: {}, new: {}, padded: {}",
                   initial_size, current.len(), padded.len());
            storage.write_at(0, &padded)?;
        } else {
            let audio = storage.read_to_end_from(initial_size as u64)?;
            debug!("Tag.write_to_storage=> relocate {} bytes, old: {}, new: {}",
                   audio.len(), initial_size, current.len());
            storage.write_at(0, &current)?;
            storage.write_all(&audio)?;
        }
        storage.flush()?;

        Ok(())
    }

    /// Writes back to the file the tag was loaded from.
    pub fn write(&self) -> Result<()> {
        match self.path {
            Some(ref path) => self.write_to(path),
            None => Err(Id3Error::invalid_argument("The tag was not loaded from a file"))
        }
    }

    /// Patches the tag into the file at `path`, creating the file if needed.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = OpenOptions::new().read(true).write(true).create(true).open(path.as_ref())?;
        self.write_to_storage(&mut file)
    }
}
