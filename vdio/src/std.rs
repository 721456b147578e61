// SPDX-License-Identifier: MIT

use std::io::{Error, Read, Seek, SeekFrom, Write};

use crate::{VdIO, VdIOError, VdIOResult};

/// `VdIO` over any seekable std stream, typically an opened image file.
#[derive(Debug)]
pub struct StdVdIO<'a, T: Read + Write + Seek> {
    io: &'a mut T,
}

impl<'a, T: Read + Write + Seek> StdVdIO<'a, T> {
    #[inline]
    pub fn new(io: &'a mut T) -> Self {
        Self { io }
    }
}

impl<'a, T: Read + Write + Seek> VdIO for StdVdIO<'a, T> {
    fn write_at(&mut self, offset: u64, data: &[u8]) -> VdIOResult {
        self.io.seek(SeekFrom::Start(offset))?;
        self.io.write_all(data)?;
        Ok(())
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> VdIOResult {
        self.io.seek(SeekFrom::Start(offset))?;
        self.io.read_exact(buf)?;
        Ok(())
    }

    fn flush(&mut self) -> VdIOResult {
        self.io.flush()?;
        Ok(())
    }

    fn len(&mut self) -> VdIOResult<u64> {
        let current = self.io.stream_position()?;
        let end = self.io.seek(SeekFrom::End(0))?;
        self.io.seek(SeekFrom::Start(current))?;
        Ok(end)
    }
}

impl From<Error> for VdIOError {
    #[cold]
    #[inline(never)]
    fn from(e: Error) -> Self {
        // Leak the string to produce a 'static str. Acceptable for error mapping.
        let leaked_str: &'static str = Box::leak(e.to_string().into_boxed_str());
        VdIOError::Other(leaked_str)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::*;
    use tempfile::tempfile;

    #[test]
    fn test_rw() {
        let mut file = tempfile().unwrap();
        let mut io = StdVdIO::new(&mut file);
        io.write_at(10, &[1, 2, 3, 4]).unwrap();

        let mut output = [0u8; 4];
        io.read_at(10, &mut output).unwrap();
        assert_eq!(output, [1, 2, 3, 4]);
    }

    #[test]
    fn test_len_of_sized_file() {
        let mut file = tempfile().unwrap();
        file.set_len(1024).unwrap();
        let mut io = StdVdIO::new(&mut file);

        assert_eq!(io.len().unwrap(), 1024);

        let buf = io.read_vec(1000, 24).unwrap();
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_read_past_end_fails() {
        let mut file = tempfile().unwrap();
        file.set_len(16).unwrap();
        let mut io = StdVdIO::new(&mut file);

        let mut buf = [0u8; 8];
        assert!(io.read_at(12, &mut buf).is_err());
    }

    #[test]
    fn test_primitive_rw_little_endian() {
        let mut file = tempfile().unwrap();
        let mut io = StdVdIO::new(&mut file);

        io.write_i32_at(4, -1).unwrap();
        io.write_i32_at(8, 0xEF53).unwrap();
        assert_eq!(io.read_i32_at(4).unwrap(), -1);
        assert_eq!(io.read_vec(8, 4).unwrap(), vec![0x53, 0xEF, 0x00, 0x00]);
    }

    #[test]
    fn test_zero_fill_reports_progress() {
        let mut file = tempfile().unwrap();
        let mut io = StdVdIO::new(&mut file);

        io.fill(0, 10_000, 0xFF).unwrap();
        let mut written = 0;
        io.zero_fill_with(0, 10_000, |n| written += n).unwrap();

        assert_eq!(written, 10_000);
        assert!(io.read_vec(0, 10_000).unwrap().iter().all(|&b| b == 0));
    }
}
