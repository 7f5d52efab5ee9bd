//! Runtime configuration from the environment.

use std::env;
use std::path::PathBuf;

use crate::database::connection::get_database_url;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub blob_root: PathBuf,
    pub groq_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = env::var("WELLLOG_DATABASE_URL")
            .unwrap_or_else(|_| get_database_url(env::var("WELLLOG_DATABASE").ok().as_deref()));
        let blob_root = env::var("WELLLOG_BLOB_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("blobs"));
        let groq_api_key = env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty());
        Self {
            database_url,
            blob_root,
            groq_api_key,
        }
    }
}
