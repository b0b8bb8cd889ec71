//! Fetch command - look up a user by email

use anyhow::{bail, Result};

use super::get_context;
use crate::output;
use userstate_core::{OperationResult, UserState};

/// Render the session state as a two-column table
pub fn print_state(state: &UserState) {
    let profile = &state.profile;
    let address = &profile.address;

    let mut table = output::create_table();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Status".to_string(), output::status_cell(state.status)]);
    table.add_row(vec!["ID".to_string(), profile.id.to_string()]);
    table.add_row(vec!["Name".to_string(), profile.name.clone()]);
    table.add_row(vec!["Username".to_string(), profile.username.clone()]);
    table.add_row(vec!["Email".to_string(), profile.email.clone()]);
    table.add_row(vec!["Street".to_string(), address.street.clone()]);
    table.add_row(vec!["Suite".to_string(), address.suite.clone()]);
    table.add_row(vec!["City".to_string(), address.city.clone()]);
    table.add_row(vec!["Zipcode".to_string(), address.zipcode.clone()]);
    table.add_row(vec![
        "Geo".to_string(),
        format!("{}, {}", address.geo.lat, address.geo.lng),
    ]);
    println!("{}", table);
}

pub async fn run(email: &str, json: bool) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        bail!("Email cannot be empty");
    }

    let ctx = get_context("fetch")?;
    let store = &ctx.user_store;
    let result = store.fetch_user(email).await;
    let state = store.state();

    if json {
        let report = match &result {
            Ok(_) => OperationResult::ok(state),
            Err(e) => OperationResult::from(e).with_context("state", serde_json::to_value(&state)?),
        };
        output::print_json(&report)?;
    } else {
        print_state(&state);
        if result.is_ok() {
            output::success(&format!("Logged in as user {}", state.id()));
        }
    }

    result.map(|_| ()).map_err(Into::into)
}
