use std::{
    error,
    io,
    fmt,
    result
};

pub type Result<T> = result::Result<T, Id3Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum FormatErrorKind {
    InvalidTagId,
    InvalidFrameId(String),
    UnknownTextEncoding(u8),
    UnexpectedEnd { needed: usize, available: usize },
    MissingTerminator,
    InvalidExtendedHeaderSize
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feature {
    Compression,
    Encryption,
    ExtendedHeader
}

#[derive(Debug)]
pub enum Id3Error {
    /// Malformed structural data.
    IllegalFormat(FormatErrorKind),
    /// The tag's major version is newer than 2.4.
    UnsupportedVersion { major: u8, minor: u8 },
    UnsupportedFeature(Feature),
    InvalidArgument(String),
    IoError(io::Error)
}

impl Id3Error {
    pub fn is_illegal_format(&self) -> bool {
        match *self {
            Id3Error::IllegalFormat(_) => true,
            _ => false
        }
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Id3Error {
        Id3Error::InvalidArgument(msg.into())
    }
}

impl From<FormatErrorKind> for Id3Error {
    fn from(kind: FormatErrorKind) -> Id3Error {
        Id3Error::IllegalFormat(kind)
    }
}

impl From<io::Error> for Id3Error {
    fn from(err: io::Error) -> Id3Error {
        Id3Error::IoError(err)
    }
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FormatErrorKind::InvalidTagId => write!(f, "Only 'ID3' is allowed"),
            FormatErrorKind::InvalidFrameId(ref id) => write!(f, "Invalid frame id: {:?}", id),
            FormatErrorKind::UnknownTextEncoding(code) =>
                write!(f, "Unknown text encoding 0x{:02x}", code),
            FormatErrorKind::UnexpectedEnd { needed, available } =>
                write!(f, "Need {} bytes, but only {} left", needed, available),
            FormatErrorKind::MissingTerminator => write!(f, "String terminator not found"),
            FormatErrorKind::InvalidExtendedHeaderSize =>
                write!(f, "Extended header is larger than the tag")
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Feature::Compression => write!(f, "frame compression"),
            Feature::Encryption => write!(f, "frame encryption"),
            Feature::ExtendedHeader => write!(f, "writing an extended header")
        }
    }
}

impl fmt::Display for Id3Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Id3Error::IllegalFormat(ref kind) => write!(f, "Illegal format: {}", kind),
            Id3Error::UnsupportedVersion { major, minor } =>
                write!(f, "Unsupported version: ID3v2.{}.{}", major, minor),
            Id3Error::UnsupportedFeature(ref feature) =>
                write!(f, "Unsupported feature: {}", feature),
            Id3Error::InvalidArgument(ref msg) => write!(f, "Invalid argument: {}", msg),
            Id3Error::IoError(ref err) => fmt::Display::fmt(err, f)
        }
    }
}

impl error::Error for Id3Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Id3Error::IoError(ref err) => Some(err),
            _ => None
        }
    }
}
