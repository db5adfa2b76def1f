use std::io;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Io error")]
    Io(#[from] io::Error),
    #[error("github error")]
    Github(#[from] github::client::Error),
    #[error("json error")]
    Json(#[from] serde_json::Error),
    #[error("toml parsing error")]
    Toml(#[from] toml::de::Error),
    #[error("template error")]
    Template(#[from] liquid::Error),
    #[error("Missing token. Set {primary} (preferred) or {fallback}.")]
    MissingToken { primary: String, fallback: String },
}
