//! Little-endian helpers for the binary model format.
//!
//! Strings are stored as a 4-byte length followed by the raw UTF-8 bytes.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::Result;

pub(crate) fn write_str<W: Write>(mut wtr: W, s: &str) -> Result<()> {
    wtr.write_u32::<LittleEndian>(s.len() as u32)?;
    wtr.write_all(s.as_bytes())?;
    Ok(())
}

pub(crate) fn read_str<R: Read>(mut rdr: R) -> Result<String> {
    let len = rdr.read_u32::<LittleEndian>()?;
    let mut bytes = vec![0u8; len as usize];
    rdr.read_exact(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}
