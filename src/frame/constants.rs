pub const TAG_HEADER_SIZE: usize = 10;
pub const FRAME_HEADER_SIZE: usize = 10;
pub const FOOTER_SIZE: usize = 10;
pub const SUPPORTED_MAJOR_VERSION: u8 = 4;

pub const SYNCHSAFE_BASE: u64 = 128;
pub const DEFAULT_BASE: u64 = 256;

pub const TAG_ID: &'static [u8] = b"ID3";
pub const FOOTER_ID: &'static [u8] = b"3DI";

pub mod id {
    pub const COMM_STR: &'static str = "COMM";
    // 2.3 only
    pub const IPLS_STR: &'static str = "IPLS";
    pub const PCNT_STR: &'static str = "PCNT";
    pub const POPM_STR: &'static str = "POPM";
    pub const TXXX_STR: &'static str = "TXXX";
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FrameHeaderFlag {
    TagAlter,
    FileAlter,
    ReadOnly,
    GroupIdentity,
    Compression,
    Encryption,
    Unsynchronisation,
    DataLength
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum HeadFlag {
    Unsynchronisation,
    ExtendedHeader,
    ExperimentalIndicator,
    FooterPresent
}
