//! Types and a client for the parts of Github's REST API that deal with
//! repositories and their deployments
//! https://docs.github.com/en/rest

pub mod client;
mod common;
mod deployment;
mod repo;

pub use client::Client;
pub use common::*;
pub use deployment::*;
pub use repo::*;
