//! Command-line front end for StoreRate
//!
//! ```text
//! cargo run --features cli --bin storerate -- login --email me@example.com --password 'Secret#12'
//! cargo run --features cli --bin storerate -- stores --search bakery --sort rating
//! ```

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

use storerate_client::auth::Role;
use storerate_client::config::{ClientOptions, API_URL_ENV};
use storerate_client::format::{format_date, format_rating, or_dash};
use storerate_client::guard::Decision;
use storerate_client::stores::{StoreQuery, StoreSort};
use storerate_client::users::{self, UserSort};
use storerate_client::StoreRate;

fn cli() -> Command<'static> {
    Command::new("storerate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Browse and rate stores on a StoreRate server")
        .subcommand_required(true)
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .value_name("URL")
                .env(API_URL_ENV)
                .help("API base URL")
                .takes_value(true),
        )
        .arg(
            Arg::new("session-file")
                .long("session-file")
                .value_name("FILE")
                .help("Where the session is kept between runs")
                .takes_value(true),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in")
                .arg(Arg::new("email").long("email").takes_value(true).required(true))
                .arg(Arg::new("password").long("password").takes_value(true).required(true)),
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(Command::new("whoami").about("Show the stored session"))
        .subcommand(
            Command::new("stores")
                .about("List stores")
                .arg(Arg::new("search").long("search").takes_value(true))
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .takes_value(true)
                        .possible_values(["name", "rating", "address"])
                        .default_value("name"),
                ),
        )
        .subcommand(
            Command::new("store")
                .about("Show one store and its ratings")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(
            Command::new("rate")
                .about("Rate a store from 1 to 5")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("rating").required(true)),
        )
        .subcommand(
            Command::new("users")
                .about("List users (admins only)")
                .arg(
                    Arg::new("role")
                        .long("role")
                        .takes_value(true)
                        .possible_values(["normal_user", "store_owner", "system_admin"]),
                )
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .takes_value(true)
                        .possible_values(["name", "email", "role"])
                        .default_value("name"),
                ),
        )
        .subcommand(
            Command::new("password")
                .about("Change your password")
                .arg(Arg::new("current").long("current").takes_value(true).required(true))
                .arg(Arg::new("new").long("new").takes_value(true).required(true)),
        )
}

fn default_session_file() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".storerate")
        .join("session.json")
}

fn client(matches: &ArgMatches) -> Result<StoreRate> {
    let mut options = ClientOptions::from_env();
    if let Some(url) = matches.value_of("api-url") {
        options = options.with_api_url(url);
    }
    let session_file = matches
        .value_of("session-file")
        .map(PathBuf::from)
        .unwrap_or_else(default_session_file);
    options = options.with_session_file(session_file);
    StoreRate::new_with_options(options).context("failed to create client")
}

/// Refuse to run a command whose screen the session may not open
fn require(client: &StoreRate, path: &str) -> Result<()> {
    match client.navigate(path) {
        Decision::Render => Ok(()),
        Decision::Redirect(route) => bail!("not allowed here, go to {} instead", route),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let matches = cli().get_matches();
    let client = client(&matches)?;

    match matches.subcommand() {
        Some(("login", sub)) => {
            let email = sub.value_of("email").unwrap_or_default();
            let password = sub.value_of("password").unwrap_or_default();
            let response = client
                .auth()
                .sign_in(email, password)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message("Login failed")))?;
            println!("Signed in as user {}", response.user_id);
        }
        Some(("logout", _)) => {
            client.auth().sign_out()?;
            println!("Signed out");
        }
        Some(("whoami", _)) => match client.session().get_session() {
            Some(session) => println!("user {} ({})", session.user_id, session.role.label()),
            None => println!("not signed in"),
        },
        Some(("stores", sub)) => {
            let sort: StoreSort = sub
                .value_of("sort")
                .unwrap_or("name")
                .parse()
                .map_err(anyhow::Error::msg)?;
            let query = StoreQuery::new(sub.value_of("search").unwrap_or_default(), sort);
            let stores = client.stores().list(&query).await?;
            if stores.is_empty() {
                println!("No stores found");
            }
            for store in stores {
                println!(
                    "{:>5}  {:<30} {:<40} ★ {} ({} ratings)",
                    store.id,
                    store.name,
                    store.address,
                    format_rating(store.average_rating),
                    store.total_ratings
                );
            }
        }
        Some(("store", sub)) => {
            let id = sub.value_of("id").unwrap_or_default();
            let store = client.stores().get(id).await?;
            println!("{}\n{}", store.name, store.address);
            println!(
                "★ {} / 5, {} total ratings",
                format_rating(store.average_rating),
                store.total_ratings
            );
            if client.session().is_authenticated() {
                match client.ratings().mine(id).await? {
                    Some(rating) => println!("Your rating: {}", rating.rating),
                    None => println!("You have not rated this store"),
                }
            }
            for rating in client.ratings().for_store(id).await? {
                println!(
                    "  {:<30} ★ {}  {}",
                    or_dash(rating.name.as_deref()),
                    rating.rating,
                    rating.created_at.as_deref().map(format_date).unwrap_or_default()
                );
            }
        }
        Some(("rate", sub)) => {
            if !client.session().is_authenticated() {
                bail!("Please login to submit a rating");
            }
            let id = sub.value_of("id").unwrap_or_default();
            let rating: u8 = sub
                .value_of("rating")
                .unwrap_or_default()
                .parse()
                .context("rating must be a number from 1 to 5")?;
            client
                .ratings()
                .submit(id, rating)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message("Error submitting rating")))?;
            println!("Rated store {} with {}", id, rating);
        }
        Some(("users", sub)) => {
            require(&client, "/admin")?;
            let role: Option<Role> = sub.value_of("role").map(str::parse).transpose()?;
            let sort: UserSort = sub
                .value_of("sort")
                .unwrap_or("name")
                .parse()
                .map_err(anyhow::Error::msg)?;
            for user in users::filter_and_sort(client.users().list().await?, role, sort) {
                println!(
                    "{:<30} {:<30} {:<30} {}",
                    user.name,
                    user.email,
                    or_dash(user.address.as_deref()),
                    user.role
                );
            }
        }
        Some(("password", sub)) => {
            require(&client, "/dashboard")?;
            client
                .auth()
                .update_password(
                    sub.value_of("current").unwrap_or_default(),
                    sub.value_of("new").unwrap_or_default(),
                )
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message("Error updating password")))?;
            println!("Password updated successfully");
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}
