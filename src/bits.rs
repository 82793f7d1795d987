use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Bit order within a packed byte
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
)]
pub enum BitOrder {
    /// First bit in time is the most significant bit
    #[default]
    MsbFirst,
    /// First bit in time is the least significant bit
    LsbFirst,
}

/// Pack a single-bit stream into bytes.
///
/// The last byte is zero-padded.
///
/// ```
/// # use pdm::{pack, BitOrder};
/// let b = [true, true, false, true, false, true, false, true, true];
/// assert_eq!(pack(b, BitOrder::MsbFirst), [0b1101_0101, 0b1000_0000]);
/// assert_eq!(pack(b, BitOrder::LsbFirst), [0b1010_1011, 0b0000_0001]);
/// ```
pub fn pack(bits: impl IntoIterator<Item = bool>, order: BitOrder) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (i, b) in bits.into_iter().enumerate() {
        let j = i & 7;
        if j == 0 {
            bytes.push(0);
        }
        if b {
            let mask: u8 = match order {
                BitOrder::MsbFirst => 0x80 >> j,
                BitOrder::LsbFirst => 1 << j,
            };
            if let Some(last) = bytes.last_mut() {
                *last |= mask;
            }
        }
    }
    bytes
}

/// Unpack bytes into a single-bit stream of `len` bits.
///
/// Missing bytes read as zero bits.
pub fn unpack(bytes: &[u8], len: usize, order: BitOrder) -> impl Iterator<Item = bool> + '_ {
    (0..len).map(move |i| {
        let byte = bytes.get(i >> 3).copied().unwrap_or(0);
        let j = i & 7;
        match order {
            BitOrder::MsbFirst => byte & (0x80 >> j) != 0,
            BitOrder::LsbFirst => byte & (1 << j) != 0,
        }
    })
}
