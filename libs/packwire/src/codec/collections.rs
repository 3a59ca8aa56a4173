use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::io;

use super::{Decode, Encode, PREALLOC_LIMIT, decoding, encoding};
use crate::codec::primitive::{FALSE, TRUE};
use crate::error::{Error, Result};
use crate::pack;
use crate::read::Read;

impl<T: Encode> Encode for [T] {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        encoding("Vec", || {
            pack::write_count(&mut *writer, self.len())?;
            T::encode_slice(self, writer)
        })
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.as_slice().encode(writer)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        decoding("Vec", || {
            let len = pack::read_count(&mut *reader)?;
            T::decode_vec(reader, len)
        })
    }
}

impl<T: Encode> Encode for VecDeque<T> {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        encoding("VecDeque", || {
            pack::write_count(&mut *writer, self.len())?;
            let (head, tail) = self.as_slices();
            T::encode_slice(head, writer)?;
            T::encode_slice(tail, writer)
        })
    }
}

impl<T: Decode> Decode for VecDeque<T> {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        decoding("VecDeque", || {
            let len = pack::read_count(&mut *reader)?;
            T::decode_vec(reader, len).map(Self::from)
        })
    }
}

// arrays repeat their length on the wire so that reading into an array of a
// different length fails instead of silently desyncing the stream.
impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        encoding("array", || {
            pack::write_count(&mut *writer, N)?;
            T::encode_slice(self, writer)
        })
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        decoding("array", || {
            let len = pack::read_count(&mut *reader)?;
            if len != N {
                return Err(Error::LengthMismatch {
                    expected: N,
                    actual: len,
                });
            }

            T::decode_vec(reader, N)?
                .try_into()
                .map_err(|v: Vec<T>| Error::LengthMismatch {
                    expected: N,
                    actual: v.len(),
                })
        })
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        encoding("BTreeMap", || encode_entries(writer, self.len(), self.iter()))
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        decoding("BTreeMap", || {
            let len = pack::read_count(&mut *reader)?;
            let mut map = Self::new();
            for _ in 0..len {
                let key = K::decode(reader)?;
                let value = V::decode(reader)?;
                map.insert(key, value);
            }
            Ok(map)
        })
    }
}

// hash maps and sets are written in key order so their wire form matches
// the `BTree` equivalents and doesn't depend on the hasher.
impl<K: Encode + Ord, V: Encode, S> Encode for HashMap<K, V, S> {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        encoding("HashMap", || {
            let mut entries: Vec<_> = self.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            encode_entries(writer, entries.len(), entries)
        })
    }
}

impl<K, V, S> Decode for HashMap<K, V, S>
where
    K: Decode + Eq + Hash,
    V: Decode,
    S: BuildHasher + Default,
{
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        decoding("HashMap", || {
            let len = pack::read_count(&mut *reader)?;
            let mut map = Self::with_capacity_and_hasher(len.min(PREALLOC_LIMIT), S::default());
            for _ in 0..len {
                let key = K::decode(reader)?;
                let value = V::decode(reader)?;
                map.insert(key, value);
            }
            Ok(map)
        })
    }
}

impl<T: Encode> Encode for BTreeSet<T> {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        encoding("BTreeSet", || {
            pack::write_count(&mut *writer, self.len())?;
            self.iter().try_for_each(|item| item.encode(writer))
        })
    }
}

impl<T: Decode + Ord> Decode for BTreeSet<T> {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        decoding("BTreeSet", || {
            let len = pack::read_count(&mut *reader)?;
            let mut set = Self::new();
            for _ in 0..len {
                set.insert(T::decode(reader)?);
            }
            Ok(set)
        })
    }
}

impl<T: Encode + Ord, S> Encode for HashSet<T, S> {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        encoding("HashSet", || {
            let mut items: Vec<_> = self.iter().collect();
            items.sort_unstable();
            pack::write_count(&mut *writer, items.len())?;
            items.into_iter().try_for_each(|item| item.encode(writer))
        })
    }
}

impl<T, S> Decode for HashSet<T, S>
where
    T: Decode + Eq + Hash,
    S: BuildHasher + Default,
{
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        decoding("HashSet", || {
            let len = pack::read_count(&mut *reader)?;
            let mut set = Self::with_capacity_and_hasher(len.min(PREALLOC_LIMIT), S::default());
            for _ in 0..len {
                set.insert(T::decode(reader)?);
            }
            Ok(set)
        })
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        encoding("Option", || match self {
            None => Ok(writer.write_all(&[FALSE])?),
            Some(value) => {
                writer.write_all(&[TRUE])?;
                value.encode(writer)
            },
        })
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        decoding("Option", || match reader.read_bytes()? {
            [FALSE] => Ok(None),
            [TRUE] => T::decode(reader).map(Some),
            [b] => Err(Error::InvalidOption(b)),
        })
    }
}

fn encode_entries<'a, W, K, V, I>(writer: &mut W, len: usize, entries: I) -> Result<()>
where
    W: io::Write,
    K: Encode + 'a,
    V: Encode + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    pack::write_count(&mut *writer, len)?;
    for (key, value) in entries {
        key.encode(writer)?;
        value.encode(writer)?;
    }
    Ok(())
}

macro_rules! impl_tuple {
    ($name:literal => $($T:ident $idx:tt),*) => {
        impl<$($T: Encode),*> Encode for ($($T,)*) {
            fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
                encoding($name, || {
                    $( self.$idx.encode(writer)?; )*
                    Ok(())
                })
            }
        }

        impl<$($T: Decode),*> Decode for ($($T,)*) {
            fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
                decoding($name, || Ok(($($T::decode(reader)?,)*)))
            }
        }
    };
}

impl_tuple!("tuple" => A 0);
impl_tuple!("pair" => A 0, B 1);
impl_tuple!("tuple" => A 0, B 1, C 2);
impl_tuple!("tuple" => A 0, B 1, C 2, D 3);
impl_tuple!("tuple" => A 0, B 1, C 2, D 3, E 4);
impl_tuple!("tuple" => A 0, B 1, C 2, D 3, E 4, F 5);
