/*
  Copyright (C) 2018-2020 The Indigo Core Developers.
  This file is part of the Indigo Core Library.

  The Indigo Core Library is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  The Indigo Core Library is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with the Indigo Core Library. If not, see <http://www.gnu.org/licenses/>.
*/

//! Proof-of-work target arithmetic.
//!
//! Targets are 256-bit quantities bounded by [`BLOCK_TARGET_MAX`] and
//! travel in block headers in the Bitcoin-style compact `nBits` form.
//! Work is expressed in fixed-point units: a block mined exactly at
//! `BLOCK_TARGET_MAX` is worth `1 << WORK_SCALE_BITS` units.

use constants::{BLOCK_TARGET_MAX_BITS, WORK_SCALE_BITS};
use crypto::Hash;
use lazy_static::*;
use num_bigint::BigUint;
use num_traits::{One, Zero};

lazy_static! {
    /// The largest admissible proof-of-work target, `2^BLOCK_TARGET_MAX_BITS`.
    pub static ref BLOCK_TARGET_MAX: BigUint =
        BigUint::one() << BLOCK_TARGET_MAX_BITS as usize;
}

/// Returns `true` if the given target is in the admissible range
/// `1 ..= BLOCK_TARGET_MAX`.
pub fn is_valid_target(target: &BigUint) -> bool {
    !target.is_zero() && *target <= *BLOCK_TARGET_MAX
}

/// Interprets a block hash as a big-endian target value.
pub fn hash_to_target(hash: &Hash) -> BigUint {
    BigUint::from_bytes_be(&hash.0)
}

/// Returns the superblock depth of a target: the number of times the
/// target halves `BLOCK_TARGET_MAX`, i.e. `floor(log2(MAX / target))`.
///
/// Values above `BLOCK_TARGET_MAX` have depth 0; a zero target saturates
/// at the maximum depth.
pub fn target_depth(target: &BigUint) -> u32 {
    if target.is_zero() {
        return BLOCK_TARGET_MAX_BITS;
    }

    ((&*BLOCK_TARGET_MAX / target).bits() as u32).saturating_sub(1)
}

/// The claimed work of a block mined at the given target, in fixed-point
/// work units. Yields zero for a zero target, which never passes
/// [`is_valid_target`] in the first place.
pub fn difficulty(target: &BigUint) -> BigUint {
    if target.is_zero() {
        return BigUint::zero();
    }

    (&*BLOCK_TARGET_MAX << WORK_SCALE_BITS as usize) / target
}

/// The work actually expended on a block, inferred from its hash, in the
/// same fixed-point units as [`difficulty`].
pub fn real_difficulty(hash: &Hash) -> BigUint {
    let target = hash_to_target(hash).max(BigUint::one());
    (&*BLOCK_TARGET_MAX << WORK_SCALE_BITS as usize) / target
}

/// Decodes a compact `nBits` value into a full target.
///
/// The compact form is `0x[size][mantissa]` with a one byte size and a
/// 23-bit mantissa; the sign bit must be clear. Returns `None` for a
/// malformed encoding or a target outside the admissible range.
pub fn compact_to_target(n_bits: u32) -> Option<BigUint> {
    if n_bits & 0x0080_0000 != 0 {
        return None;
    }

    let size = n_bits >> 24;
    let mantissa = n_bits & 0x007f_ffff;

    let target = if size <= 3 {
        BigUint::from(mantissa >> (8 * (3 - size)))
    } else {
        BigUint::from(mantissa) << (8 * (size - 3)) as usize
    };

    if is_valid_target(&target) {
        Some(target)
    } else {
        None
    }
}

/// Encodes a target in the compact `nBits` form. Precision beyond the
/// 23-bit mantissa is truncated.
pub fn target_to_compact(target: &BigUint) -> u32 {
    if target.is_zero() {
        return 0;
    }

    let bytes = target.to_bytes_be();
    let mut size = bytes.len() as u32;
    let mut word: u32 = 0;

    for (i, byte) in bytes.iter().take(3).enumerate() {
        word |= (*byte as u32) << (8 * (2 - i));
    }

    // Shift out the high byte when it would collide with the sign bit.
    if word & 0x0080_0000 != 0 {
        word >>= 8;
        size += 1;
    }

    (size << 24) | word
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::*;

    #[test]
    fn max_target_compact_roundtrip() {
        let n_bits = target_to_compact(&BLOCK_TARGET_MAX);
        assert_eq!(n_bits, 0x2010_0000);
        assert_eq!(compact_to_target(n_bits).unwrap(), *BLOCK_TARGET_MAX);
    }

    #[test]
    fn small_target_compact_roundtrip() {
        for value in &[1u32, 0x7f, 0x80, 0xffff, 0x12_3456] {
            let target = BigUint::from(*value);
            let n_bits = target_to_compact(&target);
            assert_eq!(compact_to_target(n_bits).unwrap(), target, "value {:#x}", value);
        }
    }

    #[test]
    fn sign_bit_is_rejected() {
        assert_eq!(compact_to_target(0x0480_0000), None);
    }

    #[test]
    fn oversized_target_is_rejected() {
        // 2^253 does not fit under BLOCK_TARGET_MAX.
        assert_eq!(compact_to_target(0x2020_0000), None);
    }

    #[test]
    fn zero_target_is_rejected() {
        assert_eq!(compact_to_target(0x0100_0000), None);
        assert!(!is_valid_target(&BigUint::zero()));
    }

    #[test]
    fn depth_halving_steps() {
        assert_eq!(target_depth(&BLOCK_TARGET_MAX), 0);
        assert_eq!(target_depth(&(&*BLOCK_TARGET_MAX / 2u8)), 1);
        assert_eq!(target_depth(&(&*BLOCK_TARGET_MAX / 4u8)), 2);
        assert_eq!(target_depth(&(&*BLOCK_TARGET_MAX / 3u8)), 1);
    }

    #[test]
    fn difficulty_scales_with_target() {
        let base = difficulty(&BLOCK_TARGET_MAX);
        assert_eq!(base, BigUint::from(1u64 << WORK_SCALE_BITS));

        let harder = difficulty(&(&*BLOCK_TARGET_MAX / 2u8));
        assert_eq!(harder, &base * 2u8);
    }

    quickcheck! {
        fn real_difficulty_is_positive(hash: Hash) -> bool {
            !real_difficulty(&hash).is_zero()
        }

        fn compact_decode_encode_roundtrip(n_bits: u32) -> TestResult {
            match compact_to_target(n_bits) {
                Some(target) => {
                    // A decodable value re-encodes to a target of equal depth.
                    let reencoded = compact_to_target(target_to_compact(&target)).unwrap();
                    TestResult::from_bool(target_depth(&reencoded) == target_depth(&target))
                }
                None => TestResult::discard(),
            }
        }
    }
}
