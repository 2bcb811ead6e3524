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

/// The number of blocks in the dense suffix of a chain proof.
/// Proof producers and consumers must agree on this value.
pub const DENSE_SUFFIX_LENGTH: usize = 30;

/// The minimum number of superblocks that a proof prefix must
/// accumulate at a level before that level is eligible to score
/// the prefix. Prevents a single lucky block from scoring an
/// entire chain at a high level.
pub const MIN_SUPERBLOCK_COUNT: usize = 20;

/// The targeted number of seconds between two blocks.
pub const BLOCK_TIME: u64 = 60;

/// The number of blocks averaged over when computing the next
/// proof-of-work target.
pub const DIFFICULTY_BLOCK_WINDOW: u64 = 10;

/// The maximum factor by which the proof-of-work target can grow
/// or shrink in a single retarget step.
pub const DIFFICULTY_MAX_ADJUSTMENT_FACTOR: u64 = 2;

/// The exponent of the largest admissible proof-of-work target.
/// `BLOCK_TARGET_MAX` in the block crate is `2^BLOCK_TARGET_MAX_BITS`.
pub const BLOCK_TARGET_MAX_BITS: u32 = 252;

/// Fixed-point scale applied when converting a target to work units.
/// A block mined exactly at `BLOCK_TARGET_MAX` is worth `1 << WORK_SCALE_BITS`
/// units, so sub-integer difficulty adjustments remain comparable.
pub const WORK_SCALE_BITS: u32 = 16;

static_assertions::const_assert!(crate::DENSE_SUFFIX_LENGTH > 0);
static_assertions::const_assert!(crate::MIN_SUPERBLOCK_COUNT > 0);
static_assertions::const_assert!(crate::DIFFICULTY_BLOCK_WINDOW > 0);
static_assertions::const_assert!(crate::BLOCK_TARGET_MAX_BITS + crate::WORK_SCALE_BITS < 512);
