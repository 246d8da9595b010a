//!
//! # Usage
//!
//! This can be used by adding `id3codec` to your dependencies in your project's `Cargo.toml`.
//!
//! ```toml
//! [dependencies]
//! id3codec = "0.1"
//! ```
//!
//! Tags are read from v2.2 to v2.4 and always written as v2.4.0. Text, comment,
//! popularimeter and play counter frames are decoded, every other frame is kept
//! as raw bytes and written back unchanged.
//!
//! # Example: read a tag
//!
//! ```rust
//! use id3codec::frame::body::FrameBody;
//! use id3codec::metadata::Tag;
//!
//! let bytes = b"ID3\x04\x00\x00\x00\x00\x00\x1bTIT2\x00\x00\x00\x11\x00\x00\x03Die Toten Hosen\x00";
//! let tag = Tag::from_bytes(bytes).unwrap();
//!
//! match tag.frame_by_id("TIT2").unwrap().body {
//!     FrameBody::TEXT(ref frame) => assert_eq!("Die Toten Hosen", frame.text),
//!     _ => panic!("not a text frame")
//! }
//! ```
//!
//! # Example: build a tag
//!
//! ```rust
//! use id3codec::frame::Frame;
//! use id3codec::metadata::Tag;
//!
//! let mut tag = Tag::new();
//! tag.add_frame(Frame::text("TPE1", "The Offspring").unwrap());
//! tag.add_frame(Frame::popularimeter("user@localhost", 128, 30u32).unwrap());
//!
//! let bytes = tag.serialize(500).unwrap();
//! assert_eq!(500, bytes.len());
//! assert_eq!(2, Tag::from_bytes(&bytes).unwrap().frames().len());
//! ```
//!
//! # Example: update a file in place
//!
//! ```rust
//! use std::io::Cursor;
//! use id3codec::frame::Frame;
//! use id3codec::metadata::Tag;
//!
//! // a "file" without a tag
//! let mut storage = Cursor::new(b"\xff\xfb\x90\x00".to_vec());
//!
//! let mut tag = Tag::new();
//! tag.add_frame(Frame::text("TIT2", "Welcome").unwrap());
//! tag.write_to_storage(&mut storage).unwrap();
//!
//! let bytes = storage.into_inner();
//! assert!(bytes.starts_with(b"ID3"));
//! assert!(bytes.ends_with(b"\xff\xfb\x90\x00"));
//! ```
//!
//! With files, [`Tag::from_path`](metadata/struct.Tag.html#method.from_path) and
//! [`Tag::write`](metadata/struct.Tag.html#method.write) do the same.
//!
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod counter;
pub mod errors;
pub mod frame;
pub mod header;
pub mod metadata;
pub mod readable;
pub mod rw;
pub mod util;
pub mod writable;
