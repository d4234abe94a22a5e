//! HTTP server binding configuration.

use super::env_parse;
use std::{env, path::Path};

const DEFAULT_PORT: u16 = 5000;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Full `host:port` to bind
    pub bind_address: String,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: format!("127.0.0.1:{DEFAULT_PORT}"),
            workers: None,
        }
    }
}

impl ServerConfig {
    /// `BIND_ADDRESS` wins; otherwise bind all interfaces inside a container
    /// and loopback elsewhere, on `PORT` (default 5000).
    pub fn from_env() -> Self {
        let port = env_parse("PORT").unwrap_or(DEFAULT_PORT);
        let in_container = is_container_environment(
            env::var("KUBERNETES_SERVICE_HOST").ok().as_deref(),
            env::var("DOCKER_CONTAINER").ok().as_deref(),
            Path::new("/.dockerenv").exists(),
        );

        Self {
            bind_address: resolve_bind_address(
                env::var("BIND_ADDRESS").ok().as_deref(),
                in_container,
                port,
            ),
            workers: env_parse("SERVER_WORKERS"),
        }
    }
}

pub fn is_container_environment(
    k8s_service_host: Option<&str>,
    docker_container: Option<&str>,
    dockerenv_exists: bool,
) -> bool {
    k8s_service_host.is_some() || docker_container.is_some() || dockerenv_exists
}

pub fn resolve_bind_address(bind_override: Option<&str>, in_container: bool, port: u16) -> String {
    if let Some(bind) = bind_override.filter(|b| !b.is_empty()) {
        return bind.to_string();
    }

    if in_container {
        format!("0.0.0.0:{port}")
    } else {
        format!("127.0.0.1:{port}")
    }
}
