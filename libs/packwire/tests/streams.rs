#![allow(unused_crate_dependencies)]
use std::io::Cursor;

use packwire::{
    Decode, Encode, Enumerable, Error, IoRead, KeyValue, Message, OpaqueMessage, SliceCursor,
    encode_enumerable, encode_key_value, from_reader, to_writer,
};

/// Counter message with a fixed 8-byte little-endian body.
#[derive(Debug, Default, PartialEq)]
struct Counter(u64);

#[derive(Debug, thiserror::Error)]
#[error("counter body must be 8 bytes, got {0}")]
struct BadCounter(usize);

impl OpaqueMessage for Counter {
    type Error = BadCounter;

    fn serialize_to_bytes(&self) -> Result<Vec<u8>, BadCounter> {
        Ok(self.0.to_le_bytes().to_vec())
    }

    fn parse_from_bytes(&mut self, bytes: &[u8]) -> Result<(), BadCounter> {
        let bytes: [u8; 8] = bytes.try_into().map_err(|_| BadCounter(bytes.len()))?;
        self.0 = u64::from_le_bytes(bytes);
        Ok(())
    }
}

/// Collection that hands out its elements in reverse.
struct Reversed {
    items: Vec<i32>,
    pos: usize,
}

impl Enumerable for Reversed {
    type Item = i32;

    fn reset(&mut self) {
        self.pos = 0;
    }

    fn size(&self) -> usize {
        self.items.len()
    }

    fn move_next(&mut self) -> bool {
        if self.pos < self.items.len() {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn element(&self) -> &i32 {
        &self.items[self.items.len() - self.pos]
    }
}

struct Setting {
    name: &'static str,
    enabled: bool,
}

impl KeyValue for Setting {
    type Key = str;
    type Value = bool;

    fn key(&self) -> &str {
        self.name
    }

    fn value(&self) -> &bool {
        &self.enabled
    }
}

#[test]
fn io_stream_of_mixed_values() {
    let mut buf = Vec::new();
    to_writer(&mut buf, &1.25f64).expect("float");
    to_writer(&mut buf, &Message(Counter(77))).expect("message");
    to_writer(&mut buf, &f32::NEG_INFINITY).expect("float");
    to_writer(&mut buf, "tail").expect("str");

    // one IoRead for the whole stream so peeked bytes aren't lost
    let mut reader = IoRead::new(Cursor::new(buf));
    assert_eq!(f64::decode(&mut reader).expect("float"), 1.25, "float");
    assert_eq!(
        Message::<Counter>::decode(&mut reader).expect("message").0,
        Counter(77),
        "message"
    );
    assert_eq!(
        f32::decode(&mut reader).expect("float"),
        f32::NEG_INFINITY,
        "ninf"
    );
    assert_eq!(String::decode(&mut reader).expect("str"), "tail", "str");

    let cursor = reader.into_inner();
    assert_eq!(cursor.position(), 28, "must stop at the end");
}

#[test]
fn from_reader_leaves_rest() {
    let mut buf = Vec::new();
    to_writer(&mut buf, &vec![1u16, 2]).expect("a");
    to_writer(&mut buf, &true).expect("b");

    let mut cursor = Cursor::new(buf);
    let a: Vec<u16> = from_reader(&mut cursor).expect("a");
    assert_eq!(a, [1, 2], "a");
    assert_eq!(cursor.position(), 6, "must not read past a");
    let b: bool = from_reader(&mut cursor).expect("b");
    assert!(b, "b");
}

#[test]
fn message_errors() {
    let err = packwire::from_slice::<Message<Counter>>(b"\x03\x00\x00\x00abc")
        .expect_err("short body");
    assert!(
        matches!(err.root(), Error::Message(e) if e.to_string() == "counter body must be 8 bytes, got 3"),
        "must carry parse error: {err:?}"
    );
}

#[test]
fn capabilities_compose() {
    let mut reversed = Reversed {
        items: vec![1, -2, 3],
        pos: 0,
    };

    let mut buf = Vec::new();
    encode_enumerable(&mut reversed, &mut buf).expect("enumerable");
    assert_eq!(
        packwire::from_slice::<Vec<i32>>(&buf).expect("vec"),
        [3, -2, 1],
        "cursor order"
    );
    assert_eq!(reversed.pos, 0, "must reset");

    let mut buf = Vec::new();
    encode_key_value(
        &Setting {
            name: "verbose",
            enabled: true,
        },
        &mut buf,
    )
    .expect("key/value");
    let (name, enabled): (String, bool) = packwire::from_slice(&buf).expect("pair");
    assert_eq!((name.as_str(), enabled), ("verbose", true), "pair");

    let items = ["a", "bc"];
    let mut cursor = SliceCursor::new(&items);
    let mut buf = Vec::new();
    encode_enumerable(&mut cursor, &mut buf).expect("slice cursor");
    let mut other = Vec::new();
    items.as_slice().encode(&mut other).expect("slice");
    assert_eq!(buf, other, "same as slice");
}
