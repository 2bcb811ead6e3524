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

use crate::target::{compact_to_target, hash_to_target};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use chrono::prelude::*;
use crypto::{hash_slice, Hash, HASH_BYTES};
use num_bigint::BigUint;
use std::io::Cursor;
use std::str;

/// Serialized size of a block header in bytes, excluding the
/// length-prefixed timestamp text at the tail.
pub const HEADER_BASE_SIZE: usize = 1 + 8 + HASH_BYTES + HASH_BYTES + 4 + 8;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A light block header. Carries everything needed to verify the
/// proof-of-work and the link to the predecessor, but no body.
pub struct BlockHeader {
    /// The height of the block.
    height: u64,

    /// The hash of the parent block.
    prev_hash: Hash,

    /// The hash of the interlink structure the block commits to.
    interlink_hash: Hash,

    /// The proof-of-work target in compact form.
    n_bits: u32,

    /// The proof-of-work nonce.
    nonce: u64,

    /// The timestamp of the block.
    timestamp: DateTime<Utc>,
}

impl BlockHeader {
    pub fn new(
        height: u64,
        prev_hash: Hash,
        interlink_hash: Hash,
        n_bits: u32,
        nonce: u64,
        timestamp: DateTime<Utc>,
    ) -> BlockHeader {
        BlockHeader {
            height,
            prev_hash,
            interlink_hash,
            n_bits,
            nonce,
            timestamp,
        }
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn prev_hash(&self) -> Hash {
        self.prev_hash
    }

    pub fn interlink_hash(&self) -> Hash {
        self.interlink_hash
    }

    pub fn n_bits(&self) -> u32 {
        self.n_bits
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Re-stamps the nonce. Only meaningful while mining a header.
    pub fn set_nonce(&mut self, nonce: u64) {
        self.nonce = nonce;
    }

    /// The hash of the header. Computed over the serialized form.
    pub fn hash(&self) -> Hash {
        hash_slice(&self.to_bytes())
    }

    /// The full proof-of-work target encoded in `n_bits`, if admissible.
    pub fn target(&self) -> Option<BigUint> {
        compact_to_target(self.n_bits)
    }

    /// Verifies that the header hash satisfies its own declared target.
    pub fn verify_proof_of_work(&self) -> bool {
        match self.target() {
            Some(target) => hash_to_target(&self.hash()) <= target,
            None => false,
        }
    }

    /// Returns `true` if this header directly succeeds `prev`: the parent
    /// link matches, the height increments by one and time moves forward.
    pub fn is_immediate_successor_of(&self, prev: &BlockHeader) -> bool {
        self.prev_hash == prev.hash()
            && self.height == prev.height + 1
            && self.timestamp > prev.timestamp
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let ts = self.timestamp.to_rfc3339();
        let timestamp = ts.as_bytes();
        let timestamp_len = timestamp.len() as u8;

        let mut buf: Vec<u8> = Vec::with_capacity(HEADER_BASE_SIZE + timestamp.len());

        buf.write_u8(timestamp_len).unwrap();
        buf.write_u64::<BigEndian>(self.height).unwrap();
        buf.extend_from_slice(&self.prev_hash.0);
        buf.extend_from_slice(&self.interlink_hash.0);
        buf.write_u32::<BigEndian>(self.n_bits).unwrap();
        buf.write_u64::<BigEndian>(self.nonce).unwrap();
        buf.extend_from_slice(timestamp);
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<BlockHeader, &'static str> {
        if bytes.is_empty() {
            return Err("Bad header length");
        }

        let timestamp_len = bytes[0] as usize;

        if bytes.len() != HEADER_BASE_SIZE + timestamp_len {
            return Err("Bad header length");
        }

        let mut rdr = Cursor::new(bytes);
        rdr.set_position(1);

        let height = rdr.read_u64::<BigEndian>().map_err(|_| "Bad height")?;

        let mut hash_buf = [0; HASH_BYTES];
        let pos = rdr.position() as usize;
        hash_buf.copy_from_slice(&bytes[pos..pos + HASH_BYTES]);
        let prev_hash = Hash(hash_buf);
        rdr.set_position((pos + HASH_BYTES) as u64);

        let pos = rdr.position() as usize;
        hash_buf.copy_from_slice(&bytes[pos..pos + HASH_BYTES]);
        let interlink_hash = Hash(hash_buf);
        rdr.set_position((pos + HASH_BYTES) as u64);

        let n_bits = rdr.read_u32::<BigEndian>().map_err(|_| "Bad target bits")?;
        let nonce = rdr.read_u64::<BigEndian>().map_err(|_| "Bad nonce")?;

        let pos = rdr.position() as usize;
        let ts = str::from_utf8(&bytes[pos..]).map_err(|_| "Bad timestamp")?;
        let timestamp = DateTime::parse_from_rfc3339(ts)
            .map_err(|_| "Bad timestamp")?
            .with_timezone(&Utc);

        Ok(BlockHeader {
            height,
            prev_hash,
            interlink_hash,
            n_bits,
            nonce,
            timestamp,
        })
    }
}

impl quickcheck::Arbitrary for BlockHeader {
    fn arbitrary(g: &mut quickcheck::Gen) -> BlockHeader {
        use quickcheck::Arbitrary;

        BlockHeader {
            height: u64::arbitrary(g),
            prev_hash: Hash::arbitrary(g),
            interlink_hash: Hash::arbitrary(g),
            n_bits: u32::arbitrary(g),
            nonce: u64::arbitrary(g),
            timestamp: Utc.timestamp_opt(u32::arbitrary(g) as i64, 0).unwrap(),
        }
    }
}
