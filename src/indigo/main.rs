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

use chain::LightChainRef;
use clap::{App, Arg};

const DEFAULT_NETWORK_NAME: &str = "indigo";

fn main() {
    env_logger::init();

    let argv = parse_cli_args();
    let chain = LightChainRef::new();
    let head_changed = chain.subscribe_head_changed();

    info!(
        "Starting {} light client at {} (height {})",
        argv.network_name,
        chain.head_hash(),
        chain.height()
    );

    // Proofs and headers arrive through the network layer, which hands
    // them to `chain.push_proof` / `chain.push_header`. Until it is
    // wired up, follow the head from the subscription alone.
    for head in head_changed.iter() {
        info!("New head {} at height {}", head.hash(), head.height());
    }
}

struct Argv {
    network_name: String,
}

fn parse_cli_args() -> Argv {
    let matches = App::new("indigo")
        .about("Reference implementation of the Indigo light-client protocol")
        .arg(
            Arg::with_name("network_name")
                .long("network-name")
                .value_name("NAME")
                .help("The name of the network to join")
                .takes_value(true),
        )
        .get_matches();

    let network_name = matches
        .value_of("network_name")
        .unwrap_or(DEFAULT_NETWORK_NAME)
        .to_owned();

    Argv { network_name }
}
