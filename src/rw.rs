use std::cmp;
use std::fs::File;
use std::io::{self, Cursor, ErrorKind, Read, Seek, SeekFrom, Write};

const DEFAULT_BUF_SIZE: usize = 1024;

///
/// Reads up to `amount` bytes. Fewer bytes come back only when the input ends.
///
pub fn read_bytes<R: Read + ?Sized>(input: &mut R, amount: usize) -> io::Result<Vec<u8>> {
    let mut ret = Vec::with_capacity(cmp::min(amount, DEFAULT_BUF_SIZE));
    let mut buf = [0u8; DEFAULT_BUF_SIZE];

    while ret.len() < amount {
        let want = cmp::min(amount - ret.len(), DEFAULT_BUF_SIZE);
        let read = match input.read(&mut buf[..want]) {
            Ok(read) => read,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e)
        };

        if read == 0 {
            trace!("read_bytes=> wanted:{}, but got:{}", amount, ret.len());
            break;
        }

        ret.extend_from_slice(&buf[..read]);
    }

    Ok(ret)
}

///
/// A random access byte store that a tag can be patched into.
///
pub trait Storage: Read + Write + Seek {
    fn read_bytes_at(&mut self, offset: u64, amount: usize) -> io::Result<Vec<u8>> {
        self.seek(SeekFrom::Start(offset))?;
        read_bytes(self, amount)
    }

    /// Everything from `offset` to the end of the store.
    fn read_to_end_from(&mut self, offset: u64) -> io::Result<Vec<u8>> {
        let mut buf = vec![];
        self.seek(SeekFrom::Start(offset))?;
        self.read_to_end(&mut buf)?;

        Ok(buf)
    }

    fn write_at(&mut self, offset: u64, bytes: &[u8]) -> io::Result<()> {
        self.seek(SeekFrom::Start(offset))?;
        self.write_all(bytes)
    }
}

impl Storage for File {}
impl Storage for Cursor<Vec<u8>> {}
impl<'a> Storage for Cursor<&'a mut Vec<u8>> {}
