use std::{fmt, path::PathBuf, str::FromStr};

use url::Url;

use crate::{generator::Target, value::Quoting, Error};

/// Backend used when the connection url is assembled from its parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Driver {
    #[default]
    PostgreSQL,
    MySQL,
    SQLite,
}

impl Driver {
    pub fn default_port(self) -> Option<u16> {
        match self {
            Driver::PostgreSQL => Some(5432),
            Driver::MySQL => Some(3306),
            Driver::SQLite => None,
        }
    }

    fn scheme(self) -> &'static str {
        match self {
            Driver::PostgreSQL => "postgresql",
            Driver::MySQL => "mysql",
            Driver::SQLite => "sqlite",
        }
    }
}

impl FromStr for Driver {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(Driver::PostgreSQL),
            "mysql" => Ok(Driver::MySQL),
            "sqlite" => Ok(Driver::SQLite),
            other => Err(anyhow::anyhow!("Invalid database type: {}", other)),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// Either a full url or the pieces to build one from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Url(String),
    Parts {
        driver: Driver,
        host: String,
        port: Option<u16>,
        username: String,
        password: String,
        /// Database name, or the file path for SQLite.
        service: String,
    },
}

impl Connection {
    pub fn url(&self) -> Result<String, Error> {
        let (driver, host, port, username, password, service) = match self {
            Connection::Url(url) => return Ok(url.clone()),
            Connection::Parts {
                driver,
                host,
                port,
                username,
                password,
                service,
            } => (*driver, host, port, username, password, service),
        };

        if driver == Driver::SQLite {
            return Ok(format!("sqlite:///{}", service));
        }

        let invalid = || Error::config(format!("cannot build a {} url for host {:?}", driver, host));
        let mut url = Url::parse(&format!("{}://{}", driver.scheme(), host)).map_err(|_| invalid())?;
        url.set_port(port.or(driver.default_port()))
            .map_err(|_| invalid())?;
        url.set_username(username).map_err(|_| invalid())?;
        url.set_password(Some(password)).map_err(|_| invalid())?;
        url.set_path(&format!("/{}", service));
        Ok(url.into())
    }
}

/// Everything one export run needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub connection: Connection,
    pub query: String,
    pub target: Target,
    /// Column names to write instead of the query's own.
    pub columns: Option<Vec<String>>,
    pub out_file: PathBuf,
    pub quoting: Quoting,
}

impl Config {
    /// Checks the flag combinations that must hold before connecting.
    pub fn validate(&self) -> Result<(), Error> {
        if let Connection::Parts {
            password, service, ..
        } = &self.connection
        {
            if password.is_empty() {
                return Err(Error::config("password is required"));
            }
            if service.is_empty() {
                return Err(Error::config("service is required"));
            }
        }

        if normalize_query(&self.query).is_empty() {
            return Err(Error::config("select query is required"));
        }
        if self.target.table.is_empty() {
            return Err(Error::config("export table name is required"));
        }
        if let Some(columns) = &self.columns {
            if columns.iter().any(|column| column.is_empty()) {
                return Err(Error::config("export column names must not be empty"));
            }
        }
        Ok(())
    }
}

/// Trim the query and drop one trailing `;`.
pub fn normalize_query(query: &str) -> &str {
    let query = query.trim();
    query.strip_suffix(';').unwrap_or(query)
}

/// Replace the password in a connection url with `****`.
pub fn redact_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            if parsed.set_password(Some("****")).is_ok() {
                parsed.into()
            } else {
                url.to_string()
            }
        }
        _ => url.to_string(),
    }
}
