//! Exposes a specialized reader trait.

use std::io;

use crate::error::{Error, Result};

/// Returns an [`Error::Io`] with kind [`io::ErrorKind::UnexpectedEof`].
pub(crate) fn eof() -> Error {
    // this doesn't have quite the right error message, but it doesn't allocate and
    // honestly who cares whether it says it's eof or that it couldn't fill a buffer
    io::Error::from(io::ErrorKind::UnexpectedEof).into()
}

/// Specialized reader trait used by [`Decode`](crate::Decode) and the serde
/// [`Deserializer`](crate::de::Deserializer).
///
/// By default, this is implemented for `&[u8]` (byte slices), [`IoRead`] and
/// mutable references to [`Read`] implementations.
///
/// This trait also allows access to borrowed data if supported at runtime.
/// `'de` represents that borrowed lifetime and is otherwise unused.
pub trait Read<'de> {
    /// Reads a constant size chunk of bytes.
    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]>;

    /// Reads a chunk of bytes, possibly borrowed from the reader for the
    /// duration of the call.
    fn read_byte_view<F, T>(&mut self, len: usize, access: F) -> Result<T>
    where
        F: FnOnce(&[u8]) -> Result<T>;

    /// Reads a chunk of bytes, returning it as a newly allocated [`Vec`].
    fn read_byte_vec(&mut self, len: usize) -> Result<Vec<u8>>;

    /// Returns the next byte without consuming it, or [`None`] at the end of
    /// the data.
    fn peek_byte(&mut self) -> Result<Option<u8>>;

    /// Attempts to read a chunk of bytes, borrowing from the reader.
    ///
    /// If the reader supports borrowing data from it, returns [`Some`] with the
    /// result of the operation. If the reader does not support it, returns
    /// [`None`] without advancing.
    ///
    /// If [`None`] was returned, calling another reader method with the same
    /// `len` must have the same result as if this method was never called.
    fn try_read_bytes_borrow(&mut self, len: usize) -> Option<Result<&'de [u8]>> {
        _ = len;
        None
    }
}

// this implementation is required so the reader can be reborrowed
impl<'de, R: Read<'de> + ?Sized> Read<'de> for &mut R {
    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        (**self).read_bytes()
    }

    fn read_byte_view<F, T>(&mut self, len: usize, access: F) -> Result<T>
    where
        F: FnOnce(&[u8]) -> Result<T>,
    {
        (**self).read_byte_view(len, access)
    }

    fn read_byte_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        (**self).read_byte_vec(len)
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        (**self).peek_byte()
    }

    fn try_read_bytes_borrow(&mut self, len: usize) -> Option<Result<&'de [u8]>> {
        (**self).try_read_bytes_borrow(len)
    }
}

impl<'de> Read<'de> for &'de [u8] {
    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let (out, rem) = self.split_first_chunk::<N>().ok_or_else(eof)?;
        *self = rem;
        Ok(*out)
    }

    fn read_byte_view<F, T>(&mut self, len: usize, access: F) -> Result<T>
    where
        F: FnOnce(&[u8]) -> Result<T>,
    {
        let (out, rem) = self.split_at_checked(len).ok_or_else(eof)?;
        *self = rem;
        access(out)
    }

    fn read_byte_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let (out, rem) = self.split_at_checked(len).ok_or_else(eof)?;
        *self = rem;
        Ok(out.to_vec())
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.first().copied())
    }

    fn try_read_bytes_borrow(&mut self, len: usize) -> Option<Result<&'de [u8]>> {
        Some(self.split_at_checked(len).ok_or_else(eof).map(|(out, rem)| {
            *self = rem;
            out
        }))
    }
}

/// Wraps a [`io::Read`] implementation so it can be used as a [`Read`].
///
/// Peeking is supported by holding on to at most one byte. That byte is
/// lost if the wrapper is dropped, so unwrap it with
/// [`Self::into_inner`] only at value boundaries.
#[derive(Debug)]
pub struct IoRead<R> {
    inner: R,
    peeked: Option<u8>,
}

impl<R> IoRead<R> {
    /// Wraps a reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            peeked: None,
        }
    }

    /// Gets a reference to the inner reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwraps the inner reader.
    ///
    /// A byte that was peeked but not consumed is discarded.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: io::Read> IoRead<R> {
    fn fill_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let buf = match self.peeked.take() {
            Some(b) if !buf.is_empty() => {
                buf[0] = b;
                &mut buf[1..]
            },
            peeked => {
                self.peeked = peeked;
                buf
            },
        };

        self.inner.read_exact(buf)?;
        Ok(())
    }
}

impl<R: io::Read> Read<'_> for IoRead<R> {
    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.fill_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_byte_view<F, T>(&mut self, len: usize, access: F) -> Result<T>
    where
        F: FnOnce(&[u8]) -> Result<T>,
    {
        const STACK: usize = 0x1000;

        if len <= STACK {
            let mut buf = [0u8; STACK];
            let buf = &mut buf[..len];
            self.fill_exact(buf)?;
            access(buf)
        } else {
            // allocate if more than 4KiB is requested. we don't want to blow up the stack
            // in case the data is wrong.
            let vec = self.read_byte_vec(len)?;
            access(&vec)
        }
    }

    #[inline(never)]
    fn read_byte_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        use std::io::Read as _;

        // don't allocate too much or incorrect data could lead to a DoS
        let mut buf = Vec::with_capacity(len.min(0x1000));
        let mut len = len;
        if len != 0
            && let Some(b) = self.peeked.take()
        {
            buf.push(b);
            len -= 1;
        }

        let limit = u64::try_from(len).map_err(|_| eof())?;
        let read = self.inner.by_ref().take(limit).read_to_end(&mut buf)?;

        if read == len {
            Ok(buf)
        } else {
            Err(eof())
        }
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        if self.peeked.is_none() {
            let mut buf = [0u8];
            loop {
                match self.inner.read(&mut buf) {
                    Ok(0) => return Ok(None),
                    Ok(_) => break,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {},
                    Err(e) => return Err(e.into()),
                }
            }
            self.peeked = Some(buf[0]);
        }

        Ok(self.peeked)
    }
}
