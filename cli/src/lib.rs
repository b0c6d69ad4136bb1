//! Client side of the blog: a typed API client, the fetch-once article
//! loader behind expandable cards, the authenticated admin gateway and the
//! `blog-cli` command surface built on them.

pub mod api;
pub mod card;
pub mod cli;
pub mod commands;
pub mod gateway;
pub mod loader;
pub mod render;
