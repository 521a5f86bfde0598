// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::audit::{self, Action, Module};
use crate::utils::set_partner_names;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-partners", sub)) => {
            let a = sub.get_one::<String>("a").unwrap();
            let b = sub.get_one::<String>("b").unwrap();
            set_partner_names(conn, a, b)?;
            let actor = sub
                .get_one::<String>("actor")
                .map(|s| s.as_str())
                .unwrap_or("office");
            audit::record(
                conn,
                actor,
                Action::Update,
                Module::System,
                &format!("Partner names set: A='{}' B='{}'", a, b),
            )?;
            println!("Partners set to '{}' and '{}'", a, b);
        }
        _ => {}
    }
    Ok(())
}
