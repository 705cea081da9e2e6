//! Packing of concatenated codes into whole bytes and back.

use crate::error::{Error, Result};
use bitvec::prelude::*;

/// Growable bit sequence, most significant bit of each byte first.
pub type Bits = BitVec<u8, Msb0>;

/// Concatenates `codes` in order and zero-pads the result to a byte boundary.
///
/// Returns the packed bytes and the number of padding bits (0..=7).
pub fn pack<'a, I>(codes: I) -> (Vec<u8>, u8)
where
    I: IntoIterator<Item = &'a BitSlice<u8, Msb0>>,
{
    let mut bits = Bits::new();
    for code in codes {
        bits.extend_from_bitslice(code);
    }

    let padding = (8 - bits.len() % 8) % 8;
    bits.resize(bits.len() + padding, false);

    (bits.into_vec(), padding as u8)
}

/// Reverses [`pack`], dropping the trailing `padding` bits.
///
/// Fails if `padding` is not below 8, exceeds the payload, or covers any set
/// bit.
pub fn unpack(bytes: &[u8], padding: u8) -> Result<Bits> {
    let padding = usize::from(padding);
    if padding >= 8 {
        return Err(Error::corrupt(format!("padding of {padding} bits")));
    }

    let mut bits = Bits::from_slice(bytes);
    let Some(len) = bits.len().checked_sub(padding) else {
        return Err(Error::corrupt("padding longer than payload"));
    };
    if bits[len..].any() {
        return Err(Error::corrupt("padding bits are not zero"));
    }

    bits.truncate(len);
    Ok(bits)
}
