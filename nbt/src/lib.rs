#![allow(dead_code)]

//! A read-only reader for the Named Binary Tag (NBT) tree format used by
//! schematic files.
//!
//! The whole tag tree is parsed up-front from an in-memory byte slice (the
//! caller has already gzip-inflated the schematic) into a borrowed tree of
//! [`Tag`]s; there is no streaming/lazy mode since nothing in this system
//! ever re-reads a schematic larger than fits in memory at once.

use log::warn;
use std::collections::HashMap;
use std::error;
use std::fmt;
use std::str;

#[derive(Debug)]
pub enum NbtError {
    UnexpectedEnd { offset: usize },
    UnknownTagType { tag_type: u8, offset: usize },
    InvalidString { offset: usize },
    TruncatedBuffer { needed: usize, offset: usize },
}

impl error::Error for NbtError {}
impl fmt::Display for NbtError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnexpectedEnd { offset } => {
                write!(f, "unexpected end of NBT buffer at offset {}", offset)
            }
            Self::UnknownTagType { tag_type, offset } => {
                write!(f, "unknown NBT tag type {} at offset {}", tag_type, offset)
            }
            Self::InvalidString { offset } => {
                write!(f, "invalid UTF-8 string in NBT buffer at offset {}", offset)
            }
            Self::TruncatedBuffer { needed, offset } => {
                write!(
                    f,
                    "NBT buffer truncated: needed {} more bytes at offset {}",
                    needed, offset
                )
            }
        }
    }
}

pub const TAG_END: u8 = 0;
pub const TAG_BYTE: u8 = 1;
pub const TAG_SHORT: u8 = 2;
pub const TAG_INT: u8 = 3;
pub const TAG_LONG: u8 = 4;
pub const TAG_FLOAT: u8 = 5;
pub const TAG_DOUBLE: u8 = 6;
pub const TAG_BYTE_ARRAY: u8 = 7;
pub const TAG_STRING: u8 = 8;
pub const TAG_LIST: u8 = 9;
pub const TAG_COMPOUND: u8 = 10;
pub const TAG_INT_ARRAY: u8 = 11;

/// A decoded NBT value. Only `Short` and `ByteArray` are ever read out by
/// callers in this system; the other variants exist so the tree walk can
/// skip unknown/irrelevant children without misparsing the stream.
#[derive(Debug)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<u8>),
    String(String),
    List(Vec<Tag>),
    Compound(HashMap<String, Tag>),
    IntArray(Vec<i32>),
}

impl Tag {
    pub fn tag_type(&self) -> u8 {
        match self {
            Tag::Byte(_) => TAG_BYTE,
            Tag::Short(_) => TAG_SHORT,
            Tag::Int(_) => TAG_INT,
            Tag::Long(_) => TAG_LONG,
            Tag::Float(_) => TAG_FLOAT,
            Tag::Double(_) => TAG_DOUBLE,
            Tag::ByteArray(_) => TAG_BYTE_ARRAY,
            Tag::String(_) => TAG_STRING,
            Tag::List(_) => TAG_LIST,
            Tag::Compound(_) => TAG_COMPOUND,
            Tag::IntArray(_) => TAG_INT_ARRAY,
        }
    }

    /// Looks up a named child of a `Compound` tag. Returns `None` for
    /// missing children or if `self` is not a `Compound`.
    pub fn find_child(&self, name: &str) -> Option<&Tag> {
        match self {
            Tag::Compound(children) => children.get(name),
            _ => None,
        }
    }

    pub fn get_short(&self) -> Option<i16> {
        match self {
            Tag::Short(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_byte_array(&self) -> Option<&[u8]> {
        match self {
            Tag::ByteArray(v) => Some(v),
            _ => None,
        }
    }
}

struct Cursor<'a> {
    buffer: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buffer: &'a [u8]) -> Self {
        Cursor { buffer, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], NbtError> {
        if self.pos + len > self.buffer.len() {
            return Err(NbtError::TruncatedBuffer {
                needed: self.pos + len - self.buffer.len(),
                offset: self.pos,
            });
        }
        let slice = &self.buffer[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, NbtError> {
        Ok(self.take(1)?[0])
    }

    fn read_i8(&mut self) -> Result<i8, NbtError> {
        Ok(self.read_u8()? as i8)
    }

    fn read_i16(&mut self) -> Result<i16, NbtError> {
        let bytes = self.take(2)?;
        Ok(i16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_i32(&mut self) -> Result<i32, NbtError> {
        let bytes = self.take(4)?;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i64(&mut self) -> Result<i64, NbtError> {
        let bytes = self.take(8)?;
        let mut array = [0u8; 8];
        array.copy_from_slice(bytes);
        Ok(i64::from_be_bytes(array))
    }

    fn read_f32(&mut self) -> Result<f32, NbtError> {
        Ok(f32::from_bits(self.read_i32()? as u32))
    }

    fn read_f64(&mut self) -> Result<f64, NbtError> {
        Ok(f64::from_bits(self.read_i64()? as u64))
    }

    fn read_string(&mut self) -> Result<String, NbtError> {
        let len = self.read_i16()? as u16 as usize;
        let offset = self.pos;
        let bytes = self.take(len)?;
        str::from_utf8(bytes)
            .map(|s| s.to_owned())
            .map_err(|_| NbtError::InvalidString { offset })
    }

    fn read_byte_array(&mut self) -> Result<Vec<u8>, NbtError> {
        let len = self.read_i32()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    fn read_int_array(&mut self) -> Result<Vec<i32>, NbtError> {
        let len = self.read_i32()? as usize;
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(self.read_i32()?);
        }
        Ok(values)
    }

    fn read_payload(&mut self, tag_type: u8) -> Result<Tag, NbtError> {
        match tag_type {
            TAG_BYTE => Ok(Tag::Byte(self.read_i8()?)),
            TAG_SHORT => Ok(Tag::Short(self.read_i16()?)),
            TAG_INT => Ok(Tag::Int(self.read_i32()?)),
            TAG_LONG => Ok(Tag::Long(self.read_i64()?)),
            TAG_FLOAT => Ok(Tag::Float(self.read_f32()?)),
            TAG_DOUBLE => Ok(Tag::Double(self.read_f64()?)),
            TAG_BYTE_ARRAY => Ok(Tag::ByteArray(self.read_byte_array()?)),
            TAG_STRING => Ok(Tag::String(self.read_string()?)),
            TAG_LIST => {
                let element_type = self.read_u8()?;
                let count = self.read_i32()? as usize;
                let mut values = Vec::with_capacity(count);
                if element_type != TAG_END {
                    for _ in 0..count {
                        values.push(self.read_payload(element_type)?);
                    }
                }
                Ok(Tag::List(values))
            }
            TAG_COMPOUND => {
                let mut children = HashMap::new();
                loop {
                    let child_type = self.read_u8()?;
                    if child_type == TAG_END {
                        break;
                    }
                    let name = self.read_string()?;
                    let value = self.read_payload(child_type)?;
                    children.insert(name, value);
                }
                Ok(Tag::Compound(children))
            }
            TAG_INT_ARRAY => Ok(Tag::IntArray(self.read_int_array()?)),
            other => Err(NbtError::UnknownTagType {
                tag_type: other,
                offset: self.pos,
            }),
        }
    }
}

/// Parses a full NBT document (a single named root `Compound` tag) from a
/// byte slice, returning the root tag itself (its name is discarded, as no
/// caller in this system ever needs it).
pub fn decode(buffer: &[u8]) -> Result<Tag, NbtError> {
    let mut cursor = Cursor::new(buffer);
    let root_type = cursor.read_u8()?;
    if root_type != TAG_COMPOUND {
        warn!("NBT root tag is not a Compound (type {})", root_type);
    }
    let _root_name = cursor.read_string()?;
    cursor.read_payload(root_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_string(buf: &mut Vec<u8>, s: &str) {
        buf.extend_from_slice(&(s.len() as i16).to_be_bytes());
        buf.extend_from_slice(s.as_bytes());
    }

    fn fixture_schematic(sx: i16, sy: i16, sz: i16, blocks: &[u8], data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(TAG_COMPOUND);
        push_string(&mut buf, "Schematic");

        buf.push(TAG_SHORT);
        push_string(&mut buf, "Height");
        buf.extend_from_slice(&sy.to_be_bytes());

        buf.push(TAG_SHORT);
        push_string(&mut buf, "Length");
        buf.extend_from_slice(&sz.to_be_bytes());

        buf.push(TAG_SHORT);
        push_string(&mut buf, "Width");
        buf.extend_from_slice(&sx.to_be_bytes());

        buf.push(TAG_BYTE_ARRAY);
        push_string(&mut buf, "Blocks");
        buf.extend_from_slice(&(blocks.len() as i32).to_be_bytes());
        buf.extend_from_slice(blocks);

        buf.push(TAG_BYTE_ARRAY);
        push_string(&mut buf, "Data");
        buf.extend_from_slice(&(data.len() as i32).to_be_bytes());
        buf.extend_from_slice(data);

        buf.push(TAG_END);
        buf
    }

    #[test]
    fn decodes_required_schematic_fields() {
        let buffer = fixture_schematic(1, 1, 1, &[1], &[0]);
        let root = decode(&buffer).unwrap();

        assert_eq!(root.find_child("Height").unwrap().get_short(), Some(1));
        assert_eq!(root.find_child("Length").unwrap().get_short(), Some(1));
        assert_eq!(root.find_child("Width").unwrap().get_short(), Some(1));
        assert_eq!(
            root.find_child("Blocks").unwrap().get_byte_array(),
            Some(&[1u8][..])
        );
        assert_eq!(
            root.find_child("Data").unwrap().get_byte_array(),
            Some(&[0u8][..])
        );
    }

    #[test]
    fn missing_child_is_none() {
        let buffer = fixture_schematic(1, 1, 1, &[1], &[0]);
        let root = decode(&buffer).unwrap();
        assert!(root.find_child("Entities").is_none());
    }

    #[test]
    fn truncated_buffer_is_an_error() {
        let mut buffer = fixture_schematic(1, 1, 1, &[1], &[0]);
        buffer.truncate(buffer.len() - 5);
        assert!(decode(&buffer).is_err());
    }

    #[test]
    fn skips_unrelated_tag_types_in_compound() {
        let mut buf = Vec::new();
        buf.push(TAG_COMPOUND);
        push_string(&mut buf, "Root");

        buf.push(TAG_INT);
        push_string(&mut buf, "Version");
        buf.extend_from_slice(&3i32.to_be_bytes());

        buf.push(TAG_LIST);
        push_string(&mut buf, "Ignored");
        buf.push(TAG_INT);
        buf.extend_from_slice(&0i32.to_be_bytes());

        buf.push(TAG_SHORT);
        push_string(&mut buf, "Height");
        buf.extend_from_slice(&2i16.to_be_bytes());

        buf.push(TAG_END);

        let root = decode(&buf).unwrap();
        assert_eq!(root.find_child("Height").unwrap().get_short(), Some(2));
    }
}
