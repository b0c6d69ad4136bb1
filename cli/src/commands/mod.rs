//! Subcommand implementations.

pub mod admin;
pub mod contact;
pub mod read;

use anyhow::Result;
use blog_shared::AdminSession;
use serde::Serialize;

use crate::{
    api::BlogApiClient,
    cli::{Cli, Commands},
    gateway::AdminGateway,
};

/// Dispatches one parsed command.
pub async fn run(cli: Cli) -> Result<()> {
    let client = BlogApiClient::new(cli.api_base);
    tracing::debug!(api_base = client.base(), "using blog API");

    match cli.command {
        Commands::List {
            expand,
            format,
        } => read::list(client, expand, format).await,
        Commands::Read {
            id,
            expand,
            format,
        } => read::read(&client, id, expand, format).await,
        Commands::Render {
            file,
            format,
        } => read::render(file.as_deref(), format).await,
        Commands::Create {
            fields,
        } => admin::create(&gateway(client, cli.admin_secret), fields).await,
        Commands::Update {
            id,
            fields,
        } => admin::update(&gateway(client, cli.admin_secret), id, fields).await,
        Commands::Delete {
            id,
        } => admin::delete(&gateway(client, cli.admin_secret), id).await,
        Commands::Contact {
            name,
            email,
            message,
        } => contact::run(&client, name, email, message).await,
    }
}

fn gateway(client: BlogApiClient, secret: Option<String>) -> AdminGateway {
    let session = secret
        .map(AdminSession::with_credential)
        .unwrap_or_else(AdminSession::anonymous);
    AdminGateway::new(client, session)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
