use crate::errors::ConfigError;
use crate::rest::{DEFAULT_TABLE, RestConfig};
use crate::stats::{DEFAULT_RESIDENT_TOTAL, DEFAULT_STAFF_TOTAL, PopulationTotals};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/submissions.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Rest(RestConfig),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub totals: PopulationTotals,
    pub backend: StoreBackend,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// - `PORT`: listen port (default 8080)
    /// - `VAX_STAFF_TOTAL` / `VAX_RESIDENT_TOTAL`: percentage denominators
    /// - `VAX_STORE_URL`, `VAX_STORE_KEY`, `VAX_STORE_TABLE`: hosted table;
    ///   when the URL is unset the local file store is used
    /// - `APP_DATA_PATH`: file store location
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = number(read("PORT"), "PORT", DEFAULT_PORT)?;

        let totals = PopulationTotals {
            staff: number(read("VAX_STAFF_TOTAL"), "VAX_STAFF_TOTAL", DEFAULT_STAFF_TOTAL)?,
            resident: number(
                read("VAX_RESIDENT_TOTAL"),
                "VAX_RESIDENT_TOTAL",
                DEFAULT_RESIDENT_TOTAL,
            )?,
        };

        let backend = match read("VAX_STORE_URL") {
            Some(url) => {
                let key = read("VAX_STORE_KEY").ok_or(ConfigError::Missing("VAX_STORE_KEY"))?;
                let table = read("VAX_STORE_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string());
                StoreBackend::Rest(RestConfig::new(url.trim(), key.trim()).with_table(table.trim()))
            }
            None => StoreBackend::File(PathBuf::from(
                read("APP_DATA_PATH").unwrap_or_else(|| DEFAULT_DATA_PATH.to_string()),
            )),
        };

        Ok(Self {
            port,
            totals,
            backend,
        })
    }
}

fn number<T: FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}
