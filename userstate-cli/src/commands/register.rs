//! Register command - submit a new user to the registration endpoint

use anyhow::{bail, Result};
use clap::Args;

use super::get_context;
use crate::output;
use userstate_core::{Address, Geo, OperationResult, UserProfile};

#[derive(Args)]
pub struct RegisterArgs {
    /// Display name
    #[arg(long)]
    pub name: String,
    /// Login handle
    #[arg(long)]
    pub username: String,
    /// Email address
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub street: String,
    #[arg(long, default_value = "")]
    pub suite: String,
    #[arg(long, default_value = "")]
    pub city: String,
    #[arg(long, default_value = "")]
    pub zipcode: String,
    /// Latitude
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub lat: f64,
    /// Longitude
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub lng: f64,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl RegisterArgs {
    fn into_profile(self) -> UserProfile {
        UserProfile::new(0, self.name, self.username, self.email).with_address(Address {
            street: self.street,
            suite: self.suite,
            city: self.city,
            zipcode: self.zipcode,
            geo: Geo {
                lat: self.lat,
                lng: self.lng,
            },
        })
    }
}

pub async fn run(args: RegisterArgs) -> Result<()> {
    if args.email.trim().is_empty() {
        bail!("Email cannot be empty");
    }

    let json = args.json;
    let profile = args.into_profile();

    let ctx = get_context("register")?;
    let result = ctx.user_store.register(&profile).await;

    if json {
        let report = match &result {
            Ok(()) => OperationResult::ok(profile),
            Err(e) => OperationResult::from(e),
        };
        output::print_json(&report)?;
    } else if result.is_ok() {
        output::success(&format!(
            "Registered {} with the {} directory",
            profile.username,
            ctx.user_store.directory_name()
        ));
    }

    result.map_err(Into::into)
}
