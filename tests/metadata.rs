extern crate env_logger;
extern crate id3codec;
extern crate serde_json;
extern crate tempdir;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempdir::TempDir;

use id3codec::counter::PlayCounter;
use id3codec::errors::*;
use id3codec::frame::*;
use id3codec::frame::body::*;
use id3codec::frame::constants::HeadFlag;
use id3codec::metadata::*;

const AVERAGE_CASE: &'static [u8] = b"ID3\x04\x00\x00\x00\x00\x06\x1fCOMM\x00\x00\x00\x0d\x00\x00\x00deu\x008E0A3B0DTSSE\x00\
    \x00\x00H\x00\x00\x00Audiograbber 1.81.03, LAME dll 3.97, 320 Kbit/s, Stereo, Normal qua\
    lityTIT2\x00\x00\x00\x19\x00\x00\x00Why Don't You Get A Job?TYER\x00\x00\x00\x05\x00\x00\
    \x001998TPUB\x00\x00\x00\x09\x00\x00\x00ColumbiaTCON\x00\x00\x00\x06\x00\x00\x00(121)TAL\
    B\x00\x00\x00\x0a\x00\x00\x00AmericanaTRCK\x00\x00\x00\x03\x00\x00\x0011PRIV\x00\x00\x00\
    '\x00\x00WM/MediaClassPrimaryID\x00\xbc}`\xd1#\xe3\xe2K\x86\xa1H\xa4*(D\x1ePRIV\x00\x00\
    \x00)\x00\x00WM/MediaClassSecondaryID\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
    \x00\x00\x00\x00\x00PRIV\x00\x00\x00\x1f\x00\x00WM/WMContentID\x00\xf5\xee\xa0\xe1\xf2x\
    \xa9J\xb1G\xbe\xb0\xd9$k\x07PRIV\x00\x00\x00\x8a\x00\x00WM/UniqueFileIdentifier\x00A\x00\
    M\x00G\x00a\x00_\x00i\x00d\x00=\x00R\x00 \x00 \x00 \x003\x008\x001\x006\x003\x007\x00;\
    \x00A\x00M\x00G\x00p\x00_\x00i\x00d\x00=\x00P\x00 \x00 \x00 \x00 \x002\x006\x008\x001\
    \x000\x00;\x00A\x00M\x00G\x00t\x00_\x00i\x00d\x00=\x00T\x00 \x00 \x002\x003\x005\x009\
    \x007\x008\x009\x00\x00\x00TPE2\x00\x00\x00\x0e\x00\x00\x00The OffspringPRIV\x00\x00\x00\
    \x22\x00\x00WM/WMCollectionID\x00\x1f\x1e\xd0\x14\xfa\xd0EG\x8d1\xfe:u\x82{\xdcPRIV\x00\
    \x00\x00'\x00\x00WM/WMCollectionGroupID\x00\x1f\x1e\xd0\x14\xfa\xd0EG\x8d1\xfe:u\x82{\
    \xdcPRIV\x00\x00\x00\x14\x00\x00WM/Provider\x00A\x00M\x00G\x00\x00\x00POPM\x00\x00\x00\
    \x1f\x00\x00Windows Media Player 9 Series\x00\xffPRIV\x00\x00\x00\x11\x00\x00AverageLeve\
    l\x00{#\x00\x00PRIV\x00\x00\x00\x0e\x00\x00PeakValue\x00\xa1\x7f\x00\x00TCOM\x00\x00\x00\
    \x0e\x00\x00\x00The OffspringTPE1\x00\x00\x00\x0e\x00\x00\x00The Offspring";

const V3_LYRICS: &'static [u8] = b"ID3\x03\x00\x00\x00\x00\x08JUSLT\x00\x00\x04@\x00\x00\x00deu\x00I wrote her off for the \
    tenth time today\x0d\x0aAnd practiced all the things I would say\x0d\x0aBut she came ove\
    r\x0d\x0aI lost my nerve\x0d\x0aI took her back and made her dessert\x0d\x0aNow I know I\
    'm being used\x0d\x0aThat's okay man cause I like the abuse\x0d\x0aI know she's playing \
    with me\x0d\x0aThat's okay cause I've got no self esteem\x0d\x0aWe make plans to go out \
    at night\x0d\x0aI wait till 2 then I turn out the light\x0d\x0aAll this rejection's got \
    me so low\x0d\x0aIf she keeps it up I just might tell her so\x0d\x0aWhen she's saying th\
    at she wants only me\x0d\x0aThen I wonder why she sleeps with my friends\x0d\x0aWhen she\
    's saying that I'm like a disease\x0d\x0aThen I wonder how much more I can spend\x0d\x0a\
    Well I guess I should stick up for myself\x0d\x0aBut I really think it's better this way\
    \x0d\x0aThe more you suffer\x0d\x0aThe more it shows you really care Right?\x0d\x0aNow I\
    'll relate this a little bit\x0d\x0aThat happens more than I'd like to admit\x0d\x0aLate\
    \x20at night she knocks on my door\x0d\x0aDrunk again and looking to score\x0d\x0aNow I \
    know I should say no\x0d\x0aBut that's kind of hard when she's ready to go\x0d\x0aI may \
    be dumb\x0d\x0aBut I'm not a dweeb\x0d\x0aI'm just a sucker with no self esteem\x0d\x0aA\
    straLyrics";

const MP3: &'static [u8] = b"\xff\xf0...the.mp3.file...";

fn text_of<'a>(tag: &'a Tag, id: &str) -> &'a str {
    match tag.frame_by_id(id).unwrap().body {
        FrameBody::TEXT(ref frame) => frame.text.as_str(),
        ref other => panic!("{} is not a text frame: {:?}", id, other)
    }
}

fn bodies(tag: &Tag) -> Vec<(&str, &FrameBody)> {
    tag.frames().iter().map(|frame| (frame.id(), &frame.body)).collect()
}

fn make_id3() -> Tag {
    let mut tag = Tag::new();
    tag.add_frame(Frame::text("TPE1", "The Offspring").unwrap());
    tag
}

fn make_mp3(dir: &TempDir, name: &str, tag: Option<Vec<u8>>) -> PathBuf {
    let path = dir.path().join(name);
    let _ = fs::remove_file(&path);

    let mut file = File::create(&path).unwrap();
    if let Some(tag) = tag {
        file.write_all(&tag).unwrap();
    }
    file.write_all(MP3).unwrap();

    path
}

fn verify_id3(path: &Path) {
    let tag = Tag::from_path(path).unwrap();
    assert_eq!(2, tag.frames().len());
    assert_eq!("Welcome", text_of(&tag, "TIT2"));
    assert_eq!("The Offspring", text_of(&tag, "TPE1"));
}

fn verify_mp3(path: &Path) {
    let bytes = fs::read(path).unwrap();
    assert_eq!(MP3, &bytes[bytes.len() - MP3.len()..]);
}

#[test]
fn average_case_deserialization() {
    let _ = env_logger::try_init();

    let tag = Tag::from_bytes(AVERAGE_CASE).unwrap();

    assert_eq!(4, tag.header.version);
    assert_eq!(799, tag.header.size);
    assert_eq!(21, tag.frames().len());
    assert_eq!("11", text_of(&tag, "TRCK"));
    assert_eq!("Why Don't You Get A Job?", text_of(&tag, "TIT2"));
    assert_eq!("The Offspring", text_of(&tag, "TPE1"));
    assert_eq!("The Offspring", text_of(&tag, "TPE2"));
    assert_eq!("The Offspring", text_of(&tag, "TCOM"));
    assert_eq!("Americana", text_of(&tag, "TALB"));
    assert_eq!("Audiograbber 1.81.03, LAME dll 3.97, 320 Kbit/s, Stereo, Normal quality",
               text_of(&tag, "TSSE"));
    assert_eq!("(121)", text_of(&tag, "TCON"));
    assert_eq!("Columbia", text_of(&tag, "TPUB"));
    assert_eq!("1998", text_of(&tag, "TYER"));

    match tag.frame_by_id("COMM").unwrap().body {
        FrameBody::COMM(ref frame) => {
            assert_eq!("deu", frame.language);
            assert_eq!("", frame.description);
            assert_eq!("8E0A3B0D", frame.comment);
        }
        ref other => panic!("unexpected: {:?}", other)
    }

    let private = tag.frames_by_id("PRIV");
    assert!(private.len() > 1);
    assert!(private.iter().any(|frame| match frame.body {
        FrameBody::OBJECT(ref object) => object.data == b"WM/Provider\x00A\x00M\x00G\x00\x00\x00".to_vec(),
        _ => false
    }));
}

#[test]
fn average_case_round_trip() {
    let _ = env_logger::try_init();

    let tag = Tag::from_bytes(AVERAGE_CASE).unwrap();
    let again = Tag::from_bytes(&tag.to_bytes().unwrap()).unwrap();
    assert_eq!(bodies(&tag), bodies(&again));

    // written frames are stable from the second round on
    let bytes = again.to_bytes().unwrap();
    assert_eq!(bytes, Tag::from_bytes(&bytes).unwrap().to_bytes().unwrap());
}

#[test]
fn serialization_with_minimal_length() {
    let tag = make_id3();
    assert!(tag.to_bytes().unwrap().len() < 500);
    assert_eq!(500, tag.serialize(500).unwrap().len());
}

#[test]
fn footer() {
    let mut tag = Tag::new();
    tag.header.set_flag(HeadFlag::FooterPresent);
    tag.add_frame(Frame::text("TIT2", "Why Don't You Get A Job?").unwrap());

    let bytes = tag.to_bytes().unwrap();
    assert_eq!(&bytes[3..10], &bytes[bytes.len() - 7..]);
    assert_eq!(b"3DI", &bytes[bytes.len() - 10..bytes.len() - 7]);

    let read = Tag::from_bytes(&bytes).unwrap();
    assert!(read.header.has_flag(HeadFlag::FooterPresent));
    assert_eq!(bodies(&tag), bodies(&read));
}

#[test]
fn read_stops_after_footer() {
    let mut tag = make_id3();
    tag.header.set_flag(HeadFlag::FooterPresent);
    let mut bytes = tag.serialize(40).unwrap();
    assert_eq!(50, bytes.len());
    bytes.extend_from_slice(MP3);

    let mut input = &bytes[..];
    let read = Tag::from_reader(&mut input).unwrap();
    assert_eq!(MP3, input);
    assert_eq!("The Offspring", text_of(&read, "TPE1"));
}

#[test]
fn version_3_frame_size() {
    let tag = Tag::from_bytes(V3_LYRICS).unwrap();
    assert_eq!(3, tag.header.version);
    assert_eq!(1088, tag.frame_by_id("USLT").unwrap().header.body_size);
}

#[test]
fn serialization_with_extended_header() {
    let mut tag = Tag::new();
    tag.header.set_flag(HeadFlag::ExtendedHeader);

    match tag.to_bytes() {
        Err(Id3Error::UnsupportedFeature(Feature::ExtendedHeader)) => (),
        other => panic!("unexpected: {:?}", other)
    }
}

#[test]
fn read_extended_header() {
    let bytes = b"ID3\x04\x00\x40\x00\x00\x00\x19\
                  \x00\x00\x00\x0a\x01\x00\x00\x00\x00\x00\
                  TIT2\x00\x00\x00\x05\x00\x00\x03abc\x00";
    let tag = Tag::from_bytes(bytes).unwrap();
    assert_eq!(Some(10), tag.extended_header.as_ref().map(|header| header.size));
    assert_eq!("abc", text_of(&tag, "TIT2"));
    assert!(tag.to_bytes().is_err());
}

const UNUSUAL_FRAME_ID: &'static [u8] = b"ID3\x04\x00\x00\x00\x00\x00\x28\
    TPE1\x00\x00\x00\x05\x00\x00\x03abc\x00\
    XyZ1\x00\x00\x00\x02\x00\x00hi\
    TIT2\x00\x00\x00\x03\x00\x00\x03x\x00";

#[test]
fn unusual_frame_id_in_the_middle() {
    let tag = Tag::from_bytes(UNUSUAL_FRAME_ID).unwrap();
    let ids: Vec<&str> = tag.frames().iter().map(|frame| frame.id()).collect();
    assert_eq!(vec!["TPE1", "XyZ1", "TIT2"], ids);
    assert_eq!("abc", text_of(&tag, "TPE1"));
    assert_eq!("x", text_of(&tag, "TIT2"));
    assert_eq!(UNUSUAL_FRAME_ID.to_vec(), tag.to_bytes().unwrap());
}

#[test]
fn write_to_file_with_unusual_frame_id() {
    let _ = env_logger::try_init();

    let tmp_dir = TempDir::new("id3codec").unwrap();
    let path = make_mp3(&tmp_dir, "unusual.mp3", Some(UNUSUAL_FRAME_ID.to_vec()));

    let mut tag = Tag::from_path(&path).unwrap();
    assert_eq!(3, tag.frames().len());
    tag.add_frame(Frame::text("TALB", "Americana").unwrap());
    tag.write().unwrap();

    let tag = Tag::from_path(&path).unwrap();
    let ids: Vec<&str> = tag.frames().iter().map(|frame| frame.id()).collect();
    assert_eq!(vec!["TPE1", "XyZ1", "TIT2", "TALB"], ids);
    assert_eq!("abc", text_of(&tag, "TPE1"));
    verify_mp3(&path);
}

#[test]
fn rejected_constructions() {
    match Frame::text("ABCD", "Caught Me Thinking") {
        Err(Id3Error::InvalidArgument(_)) => (),
        other => panic!("unexpected: {:?}", other)
    }
    assert!(Frame::popularimeter("user@localhost", 256, 0u32).is_err());
    assert!(Frame::popularimeter("user@localhost", -1, 0u32).is_err());
    assert!(Frame::popularimeter("user@localhost", 0, 0u32).is_ok());
    assert!(Frame::popularimeter("user@localhost", 255, 0u32).is_ok());
    assert!(Frame::unknown("abcd", vec![]).is_err());
}

#[test]
fn json_dump() {
    let mut tag = Tag::from_bytes(AVERAGE_CASE).unwrap();
    tag.add_frame(Frame::popularimeter("user@localhost", 128, 9999999999u64).unwrap());
    tag.add_frame(Frame::play_counter(PlayCounter::from(u128::max_value())).unwrap());

    let json = serde_json::to_string(&tag).unwrap();
    assert!(json.contains("\"9999999999\""));
    assert!(json.contains(&format!("\"{}\"", u128::max_value())));
    assert!(!json.contains("path"));

    let read: Tag = serde_json::from_str(&json).unwrap();
    assert_eq!(tag, read);
}

#[test]
fn write_to_file_where_file_contains_bigger_tag() {
    let _ = env_logger::try_init();

    let tmp_dir = TempDir::new("id3codec").unwrap();
    let path = make_mp3(&tmp_dir, "bigger.mp3", Some(make_id3().serialize(60).unwrap()));
    let len = fs::metadata(&path).unwrap().len();

    let mut tag = Tag::from_path(&path).unwrap();
    tag.add_frame(Frame::text("TIT2", "Welcome").unwrap());
    tag.write().unwrap();

    verify_id3(&path);
    verify_mp3(&path);
    assert_eq!(len, fs::metadata(&path).unwrap().len());
}

#[test]
fn write_to_file_where_file_contains_smaller_tag() {
    let _ = env_logger::try_init();

    let tmp_dir = TempDir::new("id3codec").unwrap();
    let path = make_mp3(&tmp_dir, "smaller.mp3", Some(make_id3().to_bytes().unwrap()));

    let mut tag = Tag::from_path(&path).unwrap();
    tag.add_frame(Frame::text("TIT2", "Welcome").unwrap());
    tag.write().unwrap();

    verify_id3(&path);
    verify_mp3(&path);
    assert_eq!((tag.to_bytes().unwrap().len() + MP3.len()) as u64,
               fs::metadata(&path).unwrap().len());
}

#[test]
fn write_to_file_where_file_contains_no_tag() {
    let _ = env_logger::try_init();

    let tmp_dir = TempDir::new("id3codec").unwrap();
    let path = make_mp3(&tmp_dir, "none.mp3", None);

    let mut tag = Tag::from_path(&path).unwrap();
    assert!(tag.frames().is_empty());
    assert_eq!(Some(path.as_path()), tag.path());

    tag.add_frame(Frame::text("TPE1", "The Offspring").unwrap());
    tag.add_frame(Frame::text("TIT2", "Welcome").unwrap());
    tag.write().unwrap();

    verify_id3(&path);
    verify_mp3(&path);
}

#[test]
fn load_from_one_file_save_to_another() {
    let tmp_dir = TempDir::new("id3codec").unwrap();
    let path = make_mp3(&tmp_dir, "another.mp3", Some(make_id3().serialize(60).unwrap()));

    let mut tag = make_id3();
    tag.add_frame(Frame::text("TIT2", "Welcome").unwrap());
    tag.write_to(&path).unwrap();

    verify_id3(&path);
    verify_mp3(&path);
}

#[test]
fn write_to_new_file() {
    let tmp_dir = TempDir::new("id3codec").unwrap();
    let path = tmp_dir.path().join("new.mp3");

    let mut tag = make_id3();
    tag.add_frame(Frame::text("TIT2", "Welcome").unwrap());
    tag.write_to(&path).unwrap();

    verify_id3(&path);
    assert_eq!(tag.to_bytes().unwrap(), fs::read(&path).unwrap());
}

#[test]
fn load_errors() {
    let tmp_dir = TempDir::new("id3codec").unwrap();

    match Tag::from_path(tmp_dir.path().join("missing.mp3")) {
        Err(Id3Error::IoError(_)) => (),
        other => panic!("unexpected: {:?}", other)
    }

    let path = make_mp3(&tmp_dir, "v5.mp3", Some(b"ID3\x05\x00\x00\x00\x00\x00\x00".to_vec()));
    match Tag::from_path(&path) {
        Err(Id3Error::UnsupportedVersion { major: 5, .. }) => (),
        other => panic!("unexpected: {:?}", other)
    }

    let path = make_mp3(&tmp_dir, "compressed.mp3",
                        Some(b"ID3\x04\x00\x00\x00\x00\x00\x15TPE1\x00\x00\x00\x0b\x00\x08\x03compressed".to_vec()));
    match Tag::from_path(&path) {
        Err(Id3Error::UnsupportedFeature(Feature::Compression)) => (),
        other => panic!("unexpected: {:?}", other)
    }
}
