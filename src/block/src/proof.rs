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

use crate::block::Block;
use crate::block_chain::BlockChain;
use crate::header::BlockHeader;
use crate::header_chain::HeaderChain;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A chain proof: a sparse prefix of interlinked superblocks backing
/// the bulk of the claimed work, followed by the dense suffix of the
/// most recent blocks.
pub struct ChainProof {
    prefix: BlockChain,
    suffix: HeaderChain,
}

impl ChainProof {
    pub fn new(prefix: BlockChain, suffix: HeaderChain) -> ChainProof {
        ChainProof { prefix, suffix }
    }

    pub fn prefix(&self) -> &BlockChain {
        &self.prefix
    }

    pub fn suffix(&self) -> &HeaderChain {
        &self.suffix
    }

    /// The last block of the prefix.
    pub fn prefix_head(&self) -> Option<&Arc<Block>> {
        self.prefix.head()
    }

    /// The header at the tip of the proof: the last suffix header, or
    /// the prefix head's header when the suffix is empty.
    pub fn head_header(&self) -> Option<BlockHeader> {
        self.suffix
            .head()
            .cloned()
            .or_else(|| self.prefix.head().map(|b| b.header().clone()))
    }

    /// The height of the proof's tip.
    pub fn head_height(&self) -> u64 {
        self.head_header().map(|h| h.height()).unwrap_or(0)
    }

    /// Verifies the internal consistency of the proof: a non-empty,
    /// well-linked prefix, and a dense suffix attached to the prefix
    /// head. Interlink recomputation against the consumer's own view
    /// is the engine's job, not the proof's.
    pub fn verify(&self) -> bool {
        let prefix_head = match self.prefix.head() {
            Some(head) => head,
            None => return false,
        };

        if !self.prefix.verify_prefix() {
            return false;
        }

        if let Some(first) = self.suffix.headers().first() {
            if !first.is_immediate_successor_of(prefix_head.header()) {
                return false;
            }
        }

        self.suffix.verify_dense()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::new();

        buf.write_u32::<BigEndian>(self.prefix.len() as u32).unwrap();

        for block in self.prefix.blocks() {
            let bytes = block.to_bytes();
            buf.write_u32::<BigEndian>(bytes.len() as u32).unwrap();
            buf.extend_from_slice(&bytes);
        }

        buf.write_u32::<BigEndian>(self.suffix.len() as u32).unwrap();

        for header in self.suffix.headers() {
            buf.extend_from_slice(&header.to_bytes());
        }

        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<ChainProof, &'static str> {
        let mut rdr = Cursor::new(bytes);

        let block_count = rdr.read_u32::<BigEndian>().map_err(|_| "Bad proof")?;
        let mut blocks = Vec::with_capacity(block_count as usize);

        for _ in 0..block_count {
            let len = rdr.read_u32::<BigEndian>().map_err(|_| "Bad proof")? as usize;
            let pos = rdr.position() as usize;

            if pos + len > bytes.len() {
                return Err("Bad proof");
            }

            blocks.push(Block::from_bytes(&bytes[pos..pos + len])?);
            rdr.set_position((pos + len) as u64);
        }

        let header_count = rdr.read_u32::<BigEndian>().map_err(|_| "Bad proof")?;
        let mut headers = Vec::with_capacity(header_count as usize);

        for _ in 0..header_count {
            let pos = rdr.position() as usize;

            if pos >= bytes.len() {
                return Err("Bad proof");
            }

            // The leading byte is the header's timestamp length.
            let end = pos + crate::header::HEADER_BASE_SIZE + bytes[pos] as usize;

            if end > bytes.len() {
                return Err("Bad proof");
            }

            headers.push(BlockHeader::from_bytes(&bytes[pos..end])?);
            rdr.set_position(end as u64);
        }

        if rdr.position() as usize != bytes.len() {
            return Err("Bad proof");
        }

        Ok(ChainProof {
            prefix: BlockChain::new(blocks),
            suffix: HeaderChain::new(headers),
        })
    }
}
