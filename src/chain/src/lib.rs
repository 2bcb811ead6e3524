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

#[macro_use]
extern crate log;

mod chain_data;
mod light_chain;
mod score;
mod serializer;
mod store;
mod validation;
mod verification;

#[cfg(test)]
mod test_helpers;

pub use crate::chain_data::*;
pub use crate::light_chain::*;
pub use crate::score::*;
pub use crate::store::*;
pub use crate::verification::*;
