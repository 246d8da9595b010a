use std::convert::TryInto;
use std::fmt::Display;

use crate::counter::PlayCounter;
use crate::errors::*;
use crate::frame::{FrameReader, FrameWriter};
use crate::frame::constants::id;
use crate::readable::Readable;
use crate::util::{self, TextEncoding};
use crate::writable::Writable;

// Written text is always UTF-8 with a single NUL terminator.
const WRITE_ENCODING: u8 = 0x03;

fn read_encoding(readable: &mut Readable) -> Result<TextEncoding> {
    util::to_encoding(readable.read_u8()?)
}

// <text><terminator>, or the rest of the data if the terminator is missing
fn read_text_up_to_end(encoding: TextEncoding, readable: &mut Readable) -> String {
    let data = readable.all_bytes();
    let text = match util::extract_terminated_string(data, encoding.terminator()) {
        Some(text) => text,
        None => {
            trace!("read_text_up_to_end=> no terminator in {} bytes", data.len());
            data
        }
    };

    encoding.decode(text)
}

// <text>[<terminator>], embedded terminators are part of the text
fn read_text_to_end(encoding: TextEncoding, readable: &mut Readable) -> String {
    let data = readable.all_bytes();
    let terminator = encoding.terminator();
    let text = if data.ends_with(terminator) && (data.len() - terminator.len()) % terminator.len() == 0 {
        &data[..data.len() - terminator.len()]
    } else {
        data
    };

    encoding.decode(text)
}

fn read_terminated(encoding: TextEncoding, readable: &mut Readable) -> Result<String> {
    let terminator = encoding.terminator();
    let text = util::extract_terminated_string(readable.tail(), terminator)
        .ok_or(FormatErrorKind::MissingTerminator)?;
    readable.skip_bytes(text.len() + terminator.len());

    Ok(encoding.decode(text))
}

fn to_rating<T>(rating: T) -> Result<u8> where T: TryInto<u8> + Display + Copy {
    rating.try_into().map_err(|_| {
        Id3Error::invalid_argument(format!("Rating must be within 0..255, but got {}", rating))
    })
}

fn check_language(language: &str) -> Result<()> {
    if language.len() != 3 || !language.is_ascii() {
        return Err(Id3Error::invalid_argument(
            format!("Language must be 3 ASCII characters, but got {:?}", language)));
    }

    Ok(())
}

///
/// All the T??? frames except TXXX, and IPLS
///
/// [See](http://id3.org/id3v2.4.0-frames) > 4.2. Text information frames
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TEXT {
    pub text: String
}

impl TEXT {
    pub fn new<S: Into<String>>(text: S) -> Self {
        TEXT { text: text.into() }
    }

    pub fn can_handle(id: &str) -> bool {
        (id.starts_with('T') && id != id::TXXX_STR) || id == id::IPLS_STR
    }
}

impl FrameReader<TEXT> for TEXT {
    fn read(readable: &mut Readable) -> Result<TEXT> {
        let encoding = read_encoding(readable)?;
        let text = read_text_up_to_end(encoding, readable);

        Ok(TEXT { text: text })
    }
}

impl FrameWriter for TEXT {
    fn write(&self, writable: &mut Writable<Vec<u8>>) -> Result<()> {
        writable.u8(WRITE_ENCODING)?;
        writable.non_utf16_string(&self.text)
    }
}

///
/// Comments
///
/// [See](http://id3.org/id3v2.4.0-frames) > 4.10. Comments
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct COMM {
    pub language: String,
    pub description: String,
    pub comment: String
}

impl COMM {
    pub fn new<L, D, C>(language: L, description: D, comment: C) -> Result<Self>
        where L: Into<String>, D: Into<String>, C: Into<String> {
        let language = language.into();
        check_language(&language)?;

        Ok(COMM {
            language: language,
            description: description.into(),
            comment: comment.into()
        })
    }

    pub fn can_handle(id: &str) -> bool {
        id == id::COMM_STR
    }
}

impl FrameReader<COMM> for COMM {
    fn read(readable: &mut Readable) -> Result<COMM> {
        let encoding = read_encoding(readable)?;
        let language = readable.read_iso8859_1(3)?;
        let description = read_terminated(encoding, readable)?;
        let comment = read_text_to_end(encoding, readable);

        Ok(COMM {
            language: language,
            description: description,
            comment: comment
        })
    }
}

impl FrameWriter for COMM {
    fn write(&self, writable: &mut Writable<Vec<u8>>) -> Result<()> {
        check_language(&self.language)?;

        writable.u8(WRITE_ENCODING)?;
        writable.string(&self.language)?;
        writable.non_utf16_string(&self.description)?;
        writable.string(&self.comment)
    }
}

///
/// Popularimeter
///
/// `counter` may be wider than 4 bytes.
///
/// [See](http://id3.org/id3v2.4.0-frames) > 4.17. Popularimeter
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct POPM {
    pub email: String,
    rating: u8,
    pub counter: PlayCounter
}

impl POPM {
    pub fn new<E, T, C>(email: E, rating: T, counter: C) -> Result<Self>
        where E: Into<String>, T: TryInto<u8> + Display + Copy, C: Into<PlayCounter> {
        let email = email.into();
        util::from_iso8859_1(&email)?;

        Ok(POPM {
            email: email,
            rating: to_rating(rating)?,
            counter: counter.into()
        })
    }

    pub fn can_handle(id: &str) -> bool {
        id == id::POPM_STR
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// Rejects anything outside 0..=255 and leaves the rating untouched.
    pub fn set_rating<T>(&mut self, rating: T) -> Result<()> where T: TryInto<u8> + Display + Copy {
        self.rating = to_rating(rating)?;
        Ok(())
    }
}

impl FrameReader<POPM> for POPM {
    fn read(readable: &mut Readable) -> Result<POPM> {
        let email = read_terminated(TextEncoding::ISO88591, readable)?;
        let rating = readable.read_u8()?;
        let counter = PlayCounter::from_bytes(readable.all_bytes());

        Ok(POPM {
            email: email,
            rating: rating,
            counter: counter
        })
    }
}

impl FrameWriter for POPM {
    fn write(&self, writable: &mut Writable<Vec<u8>>) -> Result<()> {
        writable.write(&util::from_iso8859_1(&self.email)?)?;
        writable.u8(0)?;
        writable.u8(self.rating)?;
        writable.write(&self.counter.to_bytes(4))
    }
}

///
/// Play counter
///
/// [See](http://id3.org/id3v2.4.0-frames) > 4.16. Play counter
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PCNT {
    pub counter: PlayCounter
}

impl PCNT {
    pub fn new<C: Into<PlayCounter>>(counter: C) -> Self {
        PCNT { counter: counter.into() }
    }

    pub fn can_handle(id: &str) -> bool {
        id == id::PCNT_STR
    }
}

impl FrameReader<PCNT> for PCNT {
    fn read(readable: &mut Readable) -> Result<PCNT> {
        Ok(PCNT { counter: PlayCounter::from_bytes(readable.all_bytes()) })
    }
}

impl FrameWriter for PCNT {
    fn write(&self, writable: &mut Writable<Vec<u8>>) -> Result<()> {
        writable.write(&self.counter.to_bytes(4))
    }
}

///
/// Any frame without a dedicated type. Kept as raw bytes and written back unchanged.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OBJECT {
    pub data: Vec<u8>
}

impl FrameReader<OBJECT> for OBJECT {
    fn read(readable: &mut Readable) -> Result<OBJECT> {
        Ok(OBJECT { data: readable.all_bytes().to_vec() })
    }
}

impl FrameWriter for OBJECT {
    fn write(&self, writable: &mut Writable<Vec<u8>>) -> Result<()> {
        writable.write(&self.data)
    }
}

///
/// Frame types
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FrameBody {
    /// Comments
    COMM(COMM),

    /// Play counter
    PCNT(PCNT),

    /// Popularimeter
    POPM(POPM),

    /// Text information frames
    TEXT(TEXT),

    /// Everything else
    OBJECT(OBJECT)
}

impl FrameWriter for FrameBody {
    fn write(&self, writable: &mut Writable<Vec<u8>>) -> Result<()> {
        match *self {
            FrameBody::COMM(ref frame) => frame.write(writable),
            FrameBody::PCNT(ref frame) => frame.write(writable),
            FrameBody::POPM(ref frame) => frame.write(writable),
            FrameBody::TEXT(ref frame) => frame.write(writable),
            FrameBody::OBJECT(ref frame) => frame.write(writable)
        }
    }
}
