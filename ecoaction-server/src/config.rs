use std::net::SocketAddr;

use crate::ServerError;

pub const ENV_ADDR: &str = "ECOACTION_ADDR";
pub const ENV_MAX_ATTEMPTS: &str = "ECOACTION_MAX_ATTEMPTS";

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
/// One attempt means no retry.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1;
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub max_attempts: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or blank keys take
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let addr_raw = read(ENV_ADDR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_raw.trim().parse::<SocketAddr>().map_err(|err| {
            ServerError::Config(format!("{ENV_ADDR}={addr_raw:?} is not a socket address: {err}"))
        })?;

        let max_attempts = match read(ENV_MAX_ATTEMPTS) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(ServerError::Config(format!(
                        "{ENV_MAX_ATTEMPTS}={raw:?} must be a positive integer"
                    )))
                }
            },
            None => DEFAULT_MAX_ATTEMPTS,
        };

        Ok(Self { addr, max_attempts })
    }
}
