//! Encode-side hooks for types that expose their contents through a cursor
//! or as a key and a value.
//!
//! Neither capability can be decoded by this crate. Types implementing them
//! are responsible for reading themselves back, usually by decoding the same
//! sequence of element types.

use std::io;

use crate::codec::{Encode, encoding};
use crate::error::Result;
use crate::pack;

/// A collection that is walked with an internal cursor.
///
/// The cursor starts before the first element. [`Self::move_next`] advances
/// it and [`Self::element`] returns the element it currently points at.
pub trait Enumerable {
    type Item: Encode;

    /// Moves the cursor back before the first element.
    fn reset(&mut self);

    /// Total number of elements.
    fn size(&self) -> usize;

    /// Advances the cursor. Returns `false` once past the last element.
    fn move_next(&mut self) -> bool;

    /// The element the cursor points at.
    ///
    /// Only called after [`Self::move_next`] returned `true`.
    fn element(&self) -> &Self::Item;
}

/// A value that consists of a key and a value.
pub trait KeyValue {
    type Key: Encode + ?Sized;
    type Value: Encode + ?Sized;

    fn key(&self) -> &Self::Key;
    fn value(&self) -> &Self::Value;
}

/// Writes an [`Enumerable`] as a count followed by its elements in cursor
/// order.
///
/// The cursor is reset before and after writing, also when writing fails.
///
/// # Errors
///
/// Returns an error if writing any element fails.
pub fn encode_enumerable<E, W>(item: &mut E, writer: &mut W) -> Result<()>
where
    E: Enumerable + ?Sized,
    W: io::Write,
{
    item.reset();
    let res = encoding("enumerable", || {
        pack::write_count(&mut *writer, item.size())?;
        while item.move_next() {
            item.element().encode(writer)?;
        }
        Ok(())
    });
    item.reset();
    res
}

/// Writes a [`KeyValue`] as its key followed by its value.
///
/// # Errors
///
/// Returns an error if writing the key or value fails.
pub fn encode_key_value<P, W>(pair: &P, writer: &mut W) -> Result<()>
where
    P: KeyValue + ?Sized,
    W: io::Write,
{
    encoding("key/value pair", || {
        pair.key().encode(writer)?;
        pair.value().encode(writer)
    })
}

/// Adapts a [`KeyValue`] so it can be used wherever [`Encode`] is expected.
#[derive(Debug, Clone, Copy)]
pub struct AsKeyValue<'a, P: ?Sized>(pub &'a P);

impl<P: KeyValue + ?Sized> Encode for AsKeyValue<'_, P> {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        encode_key_value(self.0, writer)
    }
}

/// An [`Enumerable`] over a slice.
#[derive(Debug, Clone)]
pub struct SliceCursor<'a, T> {
    items: &'a [T],
    pos: Option<usize>,
}

impl<'a, T> SliceCursor<'a, T> {
    /// Creates a cursor positioned before the first element.
    pub fn new(items: &'a [T]) -> Self {
        Self { items, pos: None }
    }

    /// Whether the cursor is before the first element.
    pub fn at_start(&self) -> bool {
        self.pos.is_none()
    }
}

impl<T: Encode> Enumerable for SliceCursor<'_, T> {
    type Item = T;

    fn reset(&mut self) {
        self.pos = None;
    }

    fn size(&self) -> usize {
        self.items.len()
    }

    fn move_next(&mut self) -> bool {
        let next = self.pos.map_or(0, |p| p + 1);
        self.pos = Some(next.min(self.items.len()));
        next < self.items.len()
    }

    fn element(&self) -> &T {
        // `move_next` never leaves `pos` past `len`, only at it
        &self.items[self.pos.unwrap_or(0)]
    }
}
