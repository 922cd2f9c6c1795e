//! Minimal NBT decoder covering the tags found in Anvil chunk data.

use byteorder::{BigEndian, ReadBytesExt};
use fnv::FnvHashMap;
use std::io::{self, Cursor, Read};

const TAG_END: u8 = 0;
const TAG_BYTE: u8 = 1;
const TAG_SHORT: u8 = 2;
const TAG_INT: u8 = 3;
const TAG_LONG: u8 = 4;
const TAG_FLOAT: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_BYTE_ARRAY: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_LIST: u8 = 9;
const TAG_COMPOUND: u8 = 10;
const TAG_INT_ARRAY: u8 = 11;
const TAG_LONG_ARRAY: u8 = 12;

#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<u8>),
    String(String),
    List(Vec<Tag>),
    Compound(FnvHashMap<String, Tag>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    /// Looks up a child of a compound tag.
    pub fn get(&self, name: &str) -> Option<&Tag> {
        match self {
            Tag::Compound(entries) => entries.get(name),
            _ => None,
        }
    }

    /// Widens any integer tag to i64.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Tag::Byte(v) => Some(i64::from(*v)),
            Tag::Short(v) => Some(i64::from(*v)),
            Tag::Int(v) => Some(i64::from(*v)),
            Tag::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Tag]> {
        match self {
            Tag::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_long_array(&self) -> Option<&[i64]> {
        match self {
            Tag::LongArray(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&FnvHashMap<String, Tag>> {
        match self {
            Tag::Compound(entries) => Some(entries),
            _ => None,
        }
    }
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

/// Decodes an uncompressed NBT document. The root must be a named compound.
pub fn decode(data: &[u8]) -> io::Result<Tag> {
    let mut cursor = Cursor::new(data);
    let root_type = cursor.read_u8()?;
    if root_type != TAG_COMPOUND {
        return Err(invalid_data(format!(
            "root tag must be a compound, got type {root_type}"
        )));
    }
    read_string(&mut cursor)?;
    read_compound(&mut cursor)
}

/// Length-prefixed, signed length. Non-positive lengths mean an empty string.
fn read_string(cursor: &mut Cursor<&[u8]>) -> io::Result<String> {
    let length = cursor.read_i16::<BigEndian>()?;
    if length <= 0 {
        return Ok(String::new());
    }
    let mut bytes = vec![0; length as usize];
    cursor.read_exact(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_compound(cursor: &mut Cursor<&[u8]>) -> io::Result<Tag> {
    let mut entries = FnvHashMap::default();
    loop {
        let tag_type = cursor.read_u8()?;
        if tag_type == TAG_END {
            break;
        }
        let name = read_string(cursor)?;
        entries.insert(name, read_value(cursor, tag_type)?);
    }
    Ok(Tag::Compound(entries))
}

fn read_value(cursor: &mut Cursor<&[u8]>, tag_type: u8) -> io::Result<Tag> {
    match tag_type {
        TAG_END => Ok(Tag::End),
        TAG_BYTE => Ok(Tag::Byte(cursor.read_i8()?)),
        TAG_SHORT => Ok(Tag::Short(cursor.read_i16::<BigEndian>()?)),
        TAG_INT => Ok(Tag::Int(cursor.read_i32::<BigEndian>()?)),
        TAG_LONG => Ok(Tag::Long(cursor.read_i64::<BigEndian>()?)),
        TAG_FLOAT => Ok(Tag::Float(cursor.read_f32::<BigEndian>()?)),
        TAG_DOUBLE => Ok(Tag::Double(cursor.read_f64::<BigEndian>()?)),
        TAG_BYTE_ARRAY => {
            let length = cursor.read_i32::<BigEndian>()?.max(0) as usize;
            let mut bytes = vec![0; length];
            cursor.read_exact(&mut bytes)?;
            Ok(Tag::ByteArray(bytes))
        }
        TAG_STRING => Ok(Tag::String(read_string(cursor)?)),
        TAG_LIST => {
            let element_type = cursor.read_u8()?;
            let length = cursor.read_i32::<BigEndian>()?;
            let mut items = Vec::new();
            for _ in 0..length.max(0) {
                items.push(read_value(cursor, element_type)?);
            }
            Ok(Tag::List(items))
        }
        TAG_COMPOUND => read_compound(cursor),
        TAG_INT_ARRAY => {
            let length = cursor.read_i32::<BigEndian>()?;
            let mut values = Vec::new();
            for _ in 0..length.max(0) {
                values.push(cursor.read_i32::<BigEndian>()?);
            }
            Ok(Tag::IntArray(values))
        }
        TAG_LONG_ARRAY => {
            let length = cursor.read_i32::<BigEndian>()?;
            let mut values = Vec::new();
            for _ in 0..length.max(0) {
                values.push(cursor.read_i64::<BigEndian>()?);
            }
            Ok(Tag::LongArray(values))
        }
        _ => Err(invalid_data(format!("unknown NBT tag type: {tag_type}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::Write;

    fn write_name(out: &mut Vec<u8>, name: &str) {
        out.write_i16::<BigEndian>(name.len() as i16).unwrap();
        out.write_all(name.as_bytes()).unwrap();
    }

    fn document(body: impl FnOnce(&mut Vec<u8>)) -> Vec<u8> {
        let mut out = Vec::new();
        out.push(TAG_COMPOUND);
        write_name(&mut out, "");
        body(&mut out);
        out.push(TAG_END);
        out
    }

    #[test]
    fn test_decode_every_tag_type() {
        let data = document(|out| {
            out.push(TAG_BYTE);
            write_name(out, "byte");
            out.write_i8(-3).unwrap();

            out.push(TAG_SHORT);
            write_name(out, "short");
            out.write_i16::<BigEndian>(-4096).unwrap();

            out.push(TAG_INT);
            write_name(out, "int");
            out.write_i32::<BigEndian>(123_456).unwrap();

            out.push(TAG_LONG);
            write_name(out, "long");
            out.write_i64::<BigEndian>(-1).unwrap();

            out.push(TAG_FLOAT);
            write_name(out, "float");
            out.write_f32::<BigEndian>(0.5).unwrap();

            out.push(TAG_DOUBLE);
            write_name(out, "double");
            out.write_f64::<BigEndian>(-2.25).unwrap();

            out.push(TAG_BYTE_ARRAY);
            write_name(out, "bytes");
            out.write_i32::<BigEndian>(3).unwrap();
            // Bytes above 0x7F stay raw rather than reading as negative.
            out.write_all(&[1, 0x80, 0xFF]).unwrap();

            out.push(TAG_STRING);
            write_name(out, "string");
            write_name(out, "minecraft:stone");

            out.push(TAG_LIST);
            write_name(out, "list");
            out.push(TAG_INT);
            out.write_i32::<BigEndian>(2).unwrap();
            out.write_i32::<BigEndian>(7).unwrap();
            out.write_i32::<BigEndian>(9).unwrap();

            out.push(TAG_COMPOUND);
            write_name(out, "nested");
            out.push(TAG_BYTE);
            write_name(out, "inner");
            out.write_i8(1).unwrap();
            out.push(TAG_END);

            out.push(TAG_INT_ARRAY);
            write_name(out, "ints");
            out.write_i32::<BigEndian>(2).unwrap();
            out.write_i32::<BigEndian>(-5).unwrap();
            out.write_i32::<BigEndian>(5).unwrap();

            out.push(TAG_LONG_ARRAY);
            write_name(out, "longs");
            out.write_i32::<BigEndian>(1).unwrap();
            out.write_i64::<BigEndian>(i64::MIN).unwrap();
        });

        let root = decode(&data).unwrap();
        assert_eq!(root.get("byte").and_then(Tag::as_int), Some(-3));
        assert_eq!(root.get("short").and_then(Tag::as_int), Some(-4096));
        assert_eq!(root.get("int").and_then(Tag::as_int), Some(123_456));
        assert_eq!(root.get("long").and_then(Tag::as_int), Some(-1));
        assert_eq!(root.get("float"), Some(&Tag::Float(0.5)));
        assert_eq!(root.get("double"), Some(&Tag::Double(-2.25)));
        assert_eq!(root.get("bytes"), Some(&Tag::ByteArray(vec![1, 0x80, 0xFF])));
        assert_eq!(root.get("string").and_then(Tag::as_str), Some("minecraft:stone"));
        assert_eq!(
            root.get("list").and_then(Tag::as_list),
            Some(&[Tag::Int(7), Tag::Int(9)][..])
        );
        assert_eq!(
            root.get("nested").and_then(|t| t.get("inner")).and_then(Tag::as_int),
            Some(1)
        );
        assert_eq!(root.get("ints"), Some(&Tag::IntArray(vec![-5, 5])));
        assert_eq!(
            root.get("longs").and_then(Tag::as_long_array),
            Some(&[i64::MIN][..])
        );
    }

    #[test]
    fn test_root_must_be_a_compound() {
        let mut data = Vec::new();
        data.push(TAG_BYTE);
        write_name(&mut data, "");
        data.write_i8(0).unwrap();
        let err = decode(&data).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_unknown_tag_type_is_rejected() {
        let data = document(|out| {
            out.push(13);
            write_name(out, "bogus");
        });
        let err = decode(&data).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_negative_string_length_reads_as_empty() {
        let data = document(|out| {
            out.push(TAG_STRING);
            write_name(out, "name");
            out.write_i16::<BigEndian>(-7).unwrap();
        });
        let root = decode(&data).unwrap();
        assert_eq!(root.get("name").and_then(Tag::as_str), Some(""));
    }

    #[test]
    fn test_truncated_document_errors() {
        let data = document(|out| {
            out.push(TAG_INT_ARRAY);
            write_name(out, "ints");
            out.write_i32::<BigEndian>(100).unwrap();
        });
        assert!(decode(&data).is_err());
    }

    #[test]
    fn test_negative_list_length_reads_as_empty() {
        let data = document(|out| {
            out.push(TAG_LIST);
            write_name(out, "list");
            out.push(TAG_INT);
            out.write_i32::<BigEndian>(-1).unwrap();
        });
        let root = decode(&data).unwrap();
        assert_eq!(root.get("list").and_then(Tag::as_list), Some(&[][..]));
    }
}
