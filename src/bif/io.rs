//! Byte-level read cursor over a mapped or buffered file.

use byteorder::{ByteOrder, LittleEndian};

use crate::util::{Error, Result};

/// Sequential little-endian reader over a byte slice.
pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.data.len() - self.pos {
            return Err(Error::UnexpectedEof(self.pos as u64));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.take(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    /// Length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Element count decoded as usize, guarded against truncated files:
    /// a count that cannot possibly fit in the remaining bytes is rejected
    /// before any allocation happens.
    pub fn read_count(&mut self, min_element_bytes: usize) -> Result<usize> {
        let count = self.read_u64()? as usize;
        let remaining = self.data.len() - self.pos;
        if min_element_bytes > 0 && count > remaining / min_element_bytes {
            return Err(Error::UnexpectedEof(self.pos as u64));
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_reads() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&7u32.to_le_bytes());
        buf.extend_from_slice(&(-3i32).to_le_bytes());
        buf.extend_from_slice(&3u32.to_le_bytes());
        buf.extend_from_slice(b"abc");

        let mut cur = Cursor::new(&buf);
        assert_eq!(cur.read_u32().unwrap(), 7);
        assert_eq!(cur.read_i32().unwrap(), -3);
        assert_eq!(cur.read_string().unwrap(), "abc");
        assert_eq!(cur.pos(), buf.len());
        assert!(matches!(cur.read_u8(), Err(Error::UnexpectedEof(_))));
    }

    #[test]
    fn test_count_guard() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&u64::MAX.to_le_bytes());
        let mut cur = Cursor::new(&buf);
        assert!(matches!(cur.read_count(4), Err(Error::UnexpectedEof(_))));
    }
}
