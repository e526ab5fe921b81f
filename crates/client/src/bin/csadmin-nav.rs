//! Preview which admin UI sections a set of permissions unlocks.
//!
//! Usage: `csadmin-nav <username> [PERMISSION...]`

use anyhow::Context;
use serde::Serialize;

use csadmin_auth::{NavigationEntry, NavigationTable, PermissionSet, RouteName, Session};
use csadmin_client::ClientConfig;

#[derive(Debug, Serialize)]
struct NavigationReport<'a> {
    username: &'a str,
    landing_route: RouteName,
    reachable: Vec<NavigationEntry>,
    unrecognized_permissions: Vec<&'a str>,
    session_poll_interval_ms: u64,
}

fn main() -> anyhow::Result<()> {
    csadmin_observability::init();

    let config = ClientConfig::from_env().context("invalid client configuration")?;

    let mut args = std::env::args().skip(1);
    let username = args
        .next()
        .context("usage: csadmin-nav <username> [PERMISSION...]")?;
    let granted = PermissionSet::from_names(args);

    let mut session = Session::new();
    session.authenticate(username.clone(), granted);

    let table = NavigationTable::main_tabs();
    let access = session.access(&table);
    let report = NavigationReport {
        username: &username,
        landing_route: access.landing_route(),
        reachable: access.reachable_entries(),
        unrecognized_permissions: session.state().permissions().unrecognized().collect(),
        session_poll_interval_ms: u64::try_from(config.poll_interval().as_millis())
            .unwrap_or(u64::MAX),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
