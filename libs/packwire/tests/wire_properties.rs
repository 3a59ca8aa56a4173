#![allow(unused_crate_dependencies)]
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

use num_complex::Complex;
use packwire::{Decode, Encode, Error, WideString, from_slice, pack, to_vec};

fn round_trip<T>(value: &T) -> Vec<u8>
where
    T: Encode + Decode + PartialEq + fmt::Debug,
{
    let buf = to_vec(value).expect("encoding must work");
    let rev: T = from_slice(&buf).expect("decoding must work");
    assert_eq!(*value, rev, "encoding messed up data");
    buf
}

#[test]
fn round_trip_shapes() {
    round_trip(&true);
    round_trip(&-7i8);
    round_trip(&u64::MAX);
    round_trip(&i64::MIN);
    round_trip(&'ヴ');
    round_trip(&"text".to_owned());
    round_trip(&WideString::from("wide ヴ"));
    round_trip(&vec![Some(1u16), None, Some(3)]);
    round_trip(&VecDeque::from([1i32, -2, 3]));
    round_trip(&[[1u8, 2], [3, 4], [5, 6]]);
    round_trip(&BTreeSet::from(["b".to_owned(), "a".to_owned()]));
    round_trip(&HashSet::<u32>::from([5, 1, 9]));
    round_trip(&Complex::new(0.5f64, -1.0 / 3.0));
    round_trip(&(1u8, "two".to_owned(), 3.0f32, Box::new(4i64)));
    round_trip(&BTreeMap::from([
        (1u32, vec![(true, 'x')]),
        (2, Vec::new()),
    ]));
}

#[test]
fn special_floats_round_trip() {
    let values = [f64::INFINITY, f64::NEG_INFINITY];
    let buf = round_trip(&values.to_vec());
    assert_eq!(buf, b"\x01\x02inf ninf ", "tokens");

    let nan: f64 = from_slice(&to_vec(&f64::NAN).expect("nan")).expect("nan");
    assert!(nan.is_nan(), "nan must stay nan");
}

#[test]
fn zero_is_one_byte() {
    assert_eq!(to_vec(&0u16).expect("u16"), [0x00], "u16");
    assert_eq!(to_vec(&0u32).expect("u32"), [0x00], "u32");
    assert_eq!(to_vec(&0i64).expect("i64"), [0x00], "i64");
    assert_eq!(to_vec(&0usize).expect("usize"), [0x00], "usize");
    assert_eq!(to_vec(&255u32).expect("255"), [0x01, 0xFF], "255");
}

#[test]
fn three_hundred() {
    let buf = to_vec(&300u32).expect("300");
    assert_eq!(buf, [0x02, 0x2C, 0x01], "size 2, little-endian 0x012C");

    let v: u16 = from_slice(&buf).expect("fits u16");
    assert_eq!(v, 300, "u16");

    let err = pack::read::<u8, _>(buf.as_slice()).expect_err("u8 has 1 byte");
    assert!(
        matches!(err, Error::IntegerOverflow { ty: "u8", size: 2 }),
        "must overflow: {err:?}"
    );
}

#[test]
fn cross_width() {
    let buf = to_vec(&-1234i16).expect("i16");
    assert_eq!(from_slice::<i32>(&buf).expect("i32"), -1234, "i32");
    assert_eq!(from_slice::<i64>(&buf).expect("i64"), -1234, "i64");
    assert_eq!(from_slice::<isize>(&buf).expect("isize"), -1234, "isize");

    let buf = to_vec(&u64::MAX).expect("u64");
    let err = from_slice::<u32>(&buf).expect_err("too wide");
    assert!(
        matches!(err, Error::IntegerOverflow { ty: "u32", size: 8 }),
        "must overflow: {err:?}"
    );

    // a set sign flag is never valid for unsigned targets
    let buf = to_vec(&-1i32).expect("i32");
    let err = from_slice::<u64>(&buf).expect_err("negative");
    assert!(
        matches!(err, Error::NegativeUnsigned { ty: "u64" }),
        "must reject sign: {err:?}"
    );
}

#[test]
fn concatenated_values() {
    let mut buf = Vec::new();
    300u32.encode(&mut buf).expect("a");
    "next".encode(&mut buf).expect("b");
    2.5f64.encode(&mut buf).expect("c");
    vec![1u8, 2].encode(&mut buf).expect("d");

    let mut slice = buf.as_slice();
    assert_eq!(u32::decode(&mut slice).expect("a"), 300, "a");
    assert_eq!(slice[..2], [0x01, 0x04], "a must not read into b");
    assert_eq!(String::decode(&mut slice).expect("b"), "next", "b");
    assert_eq!(f64::decode(&mut slice).expect("c"), 2.5, "c");
    assert_eq!(Vec::<u8>::decode(&mut slice).expect("d"), [1, 2], "d");
    assert!(slice.is_empty(), "must consume everything");
}

#[test]
fn composite_counts() {
    let map = HashMap::from([(3u8, 'c'), (1, 'a'), (2, 'b')]);
    let rev: HashMap<u8, char> = from_slice(&round_trip(&map)).expect("map");
    assert_eq!(rev.len(), 3, "map count");

    let buf = to_vec(&[1u32, 2, 3]).expect("array");
    let err = from_slice::<[u32; 4]>(&buf).expect_err("wrong length");
    assert!(
        matches!(
            err.root(),
            Error::LengthMismatch {
                expected: 4,
                actual: 3
            }
        ),
        "must mismatch: {err:?}"
    );
    assert_eq!(
        from_slice::<Vec<u32>>(&buf).expect("vec"),
        [1, 2, 3],
        "arrays read as vec"
    );
}

#[test]
fn hash_containers_are_sorted() {
    let map = HashMap::from([(3u8, 'c'), (1, 'a'), (2, 'b')]);
    let sorted = BTreeMap::from([(1u8, 'a'), (2, 'b'), (3, 'c')]);
    assert_eq!(
        to_vec(&map).expect("hash"),
        to_vec(&sorted).expect("btree"),
        "hash map must write in key order"
    );

    let set = HashSet::from([30u16, 10, 20]);
    assert_eq!(
        to_vec(&set).expect("hash"),
        to_vec(&vec![10u16, 20, 30]).expect("vec"),
        "hash set must write in order"
    );
}

#[test]
fn bool_is_strict() {
    for b in 0..=u8::MAX {
        let res = from_slice::<bool>(&[b]);
        match b {
            b'0' => assert!(matches!(res, Ok(false)), "'0' is false"),
            b'1' => assert!(matches!(res, Ok(true)), "'1' is true"),
            _ => assert!(
                matches!(res, Err(Error::InvalidBool(x)) if x == b),
                "byte {b:#04x} must be rejected"
            ),
        }
    }
}

#[test]
fn nested_error_message() {
    // one entry: key 1, then a list of one bool with byte 0x02
    let buf = b"\x01\x01\x01\x01\x01\x01\x02";
    let err = from_slice::<BTreeMap<u32, Vec<bool>>>(buf).expect_err("bad bool");
    assert_eq!(
        err.to_string(),
        "invalid bool byte 0x02, expected '0' or '1'\n   \
         while decoding object of type Vec\n   \
         while decoding object of type BTreeMap",
        "innermost first"
    );
}
