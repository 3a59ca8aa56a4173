//! Framing for values that bring their own serialization.
//!
//! An opaque message is written as a 4-byte little-endian length followed by
//! whatever bytes the message produced. The bytes are not interpreted in any
//! way. A declared length of zero is rejected when reading, so messages that
//! serialize to nothing can be written but not read back.

use std::io;

use crate::byte_order::ByteOrder as _;
use crate::codec::{Decode, Encode};
use crate::error::{Error, Op, Result, ResultExt as _};
use crate::read::Read;

/// A value with its own byte serialization, such as a generated protocol
/// buffer message.
pub trait OpaqueMessage {
    /// Error produced by the message's own serialization.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Serializes the message into a byte buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be serialized.
    fn serialize_to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Replaces the contents of the message with the parsed `bytes`.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not a valid message.
    fn parse_from_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Writes `msg` as a length-prefixed blob.
///
/// # Errors
///
/// Returns [`Error::Message`] if the message fails to serialize,
/// [`Error::MessageTooLarge`] if it produced more than [`u32::MAX`] bytes, or
/// an I/O error if the writer fails.
pub fn encode_message<M, W>(msg: &M, mut writer: W) -> Result<()>
where
    M: OpaqueMessage + ?Sized,
    W: io::Write,
{
    let bytes = msg
        .serialize_to_bytes()
        .map_err(|e| Error::Message(Box::new(e)))?;

    let mut len = u32::try_from(bytes.len()).map_err(|_| Error::MessageTooLarge(bytes.len()))?;
    len.host_to_little();

    log::debug!("writing opaque message of {} bytes", bytes.len());
    writer.write_all(&len.to_ne_bytes())?;
    writer.write_all(&bytes)?;
    Ok(())
}

/// Reads a length-prefixed blob and parses it into `msg`.
///
/// # Errors
///
/// Returns [`Error::EmptyMessage`] if the declared length is zero,
/// [`Error::Message`] if parsing fails, or an I/O error if the reader runs
/// out of data.
pub fn decode_message<'de, M, R>(msg: &mut M, mut reader: R) -> Result<()>
where
    M: OpaqueMessage + ?Sized,
    R: Read<'de>,
{
    let mut len = u32::from_ne_bytes(reader.read_bytes()?);
    len.little_to_host();

    if len == 0 {
        return Err(Error::EmptyMessage);
    }

    let len = usize::try_from(len).map_err(|_| Error::MessageTooLarge(usize::MAX))?;
    log::debug!("reading opaque message of {len} bytes");
    reader.read_byte_view(len, |bytes| {
        msg.parse_from_bytes(bytes)
            .map_err(|e| Error::Message(Box::new(e)))
    })
}

/// Wrapper to use an [`OpaqueMessage`] where [`Encode`] or [`Decode`] is
/// expected.
///
/// Decoding starts from [`Default::default`] and parses into it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Message<M>(pub M);

impl<M: OpaqueMessage> Encode for Message<M> {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        encode_message(&self.0, writer).context(Op::Encode, "message")
    }
}

impl<M: OpaqueMessage + Default> Decode for Message<M> {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        let mut msg = M::default();
        decode_message(&mut msg, reader).context(Op::Decode, "message")?;
        Ok(Self(msg))
    }
}

#[cfg(test)]
mod tests {
    use std::{fmt, str};

    use super::*;
    use crate::{from_slice, to_vec};

    /// A message storing its text verbatim, refusing anything but ASCII.
    #[derive(Debug, Default, PartialEq)]
    struct Note(String);

    #[derive(Debug)]
    struct NotAscii;

    impl fmt::Display for NotAscii {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("note is not ascii")
        }
    }

    impl std::error::Error for NotAscii {}

    impl OpaqueMessage for Note {
        type Error = NotAscii;

        fn serialize_to_bytes(&self) -> Result<Vec<u8>, NotAscii> {
            if self.0.is_ascii() {
                Ok(self.0.as_bytes().to_vec())
            } else {
                Err(NotAscii)
            }
        }

        fn parse_from_bytes(&mut self, bytes: &[u8]) -> Result<(), NotAscii> {
            if !bytes.is_ascii() {
                return Err(NotAscii);
            }

            self.0.clear();
            self.0.push_str(str::from_utf8(bytes).map_err(|_| NotAscii)?);
            Ok(())
        }
    }

    #[test]
    fn length_prefixed_blob() {
        let msg = Message(Note("hi!".to_owned()));
        let buf = to_vec(&msg).expect("message");
        assert_eq!(buf, b"\x03\x00\x00\x00hi!", "4-byte little-endian length");
        assert_eq!(from_slice::<Message<Note>>(&buf).expect("message"), msg, "round-trip");
    }

    #[test]
    fn empty_frame_is_rejected() {
        let buf = to_vec(&Message(Note::default())).expect("empty message");
        assert_eq!(buf, [0, 0, 0, 0], "empty message still writes a frame");

        let err = from_slice::<Message<Note>>(&buf).expect_err("empty frame");
        assert!(
            matches!(err.root(), Error::EmptyMessage),
            "must reject zero length: {err:?}"
        );
    }

    #[test]
    fn message_errors_are_wrapped() {
        let err = to_vec(&Message(Note("ü".to_owned()))).expect_err("not ascii");
        assert!(
            matches!(err.root(), Error::Message(e) if e.to_string() == "note is not ascii"),
            "must carry the message error: {err:?}"
        );

        let err = from_slice::<Message<Note>>(b"\x02\x00\x00\x00\xC3\xBC").expect_err("not ascii");
        assert!(
            matches!(err.root(), Error::Message(_)),
            "must carry the parse error: {err:?}"
        );
        assert_eq!(err.trail().collect::<Vec<_>>(), ["message"], "trail");
    }

    #[test]
    fn short_frame() {
        let err = from_slice::<Message<Note>>(b"\x05\x00\x00\x00abc").expect_err("too short");
        assert!(err.is_eof(), "must be eof: {err:?}");

        let err = from_slice::<Message<Note>>(b"\x05\x00").expect_err("no length");
        assert!(err.is_eof(), "must be eof: {err:?}");
    }

    #[test]
    fn parses_into_existing_value() {
        let mut note = Note("old".to_owned());
        decode_message(&mut note, &b"\x03\x00\x00\x00new"[..]).expect("message");
        assert_eq!(note.0, "new", "must replace contents");
    }
}
