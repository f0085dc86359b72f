use crate::fetch::FetchError;
use crate::parse::ParseError;

/// Errors that abort a scrape
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to parse {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },

    #[error("Failed to write {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Errors loading `config.toml`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
