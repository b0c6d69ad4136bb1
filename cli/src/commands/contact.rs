//! `contact`.

use anyhow::{Context, Result};

use crate::api::{BlogApiClient, ContactForm};

/// Submits the contact form and prints the server's reply.
pub async fn run(client: &BlogApiClient, name: String, email: String, message: String) -> Result<()> {
    let form = ContactForm {
        name,
        email,
        message,
    };
    let reply = client
        .submit_contact(&form)
        .await
        .context("failed to send contact message")?;
    println!("{reply}");
    Ok(())
}
