//! Server configuration.
//!
//! Every option can come from the command line or the environment:
//!
//! | Variable          | Default     | Description                        |
//! |-------------------|-------------|------------------------------------|
//! | `HOST`            | 127.0.0.1   | Address to bind                    |
//! | `PORT`            | 8080        | HTTP port                          |
//! | `STREAM_PORT`     | 7000        | Interaction channel port           |
//! | `STORE_URL`       | mem:        | Storage connection target          |
//! | `CACHE_ENABLED`   | true        | Read cache on the product service  |
//! | `STREAM_DELAY_MS` | 2000        | Minimum spacing between stream emissions |
//! | `LOG_LEVEL`       | info        | Default filter when RUST_LOG is unset |

use clap::Parser;

/// Configuration for the resource server.
#[derive(Debug, Clone, Parser)]
#[command(name = "resource-server")]
#[command(about = "Product catalog API with a clinic interaction channel")]
pub struct ServerConfig {
    /// Host address to bind to.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port for the HTTP endpoint.
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Port for the interaction channel listener.
    #[arg(long, env = "STREAM_PORT", default_value_t = 7000)]
    pub stream_port: u16,

    /// Storage connection target. Only the in-memory scheme is wired.
    #[arg(long, env = "STORE_URL", default_value = "mem:")]
    pub store_url: String,

    /// Enable the read cache on the product service.
    #[arg(
        long,
        env = "CACHE_ENABLED",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub cache_enabled: bool,

    /// Minimum delay between stream emissions, in milliseconds.
    #[arg(long, env = "STREAM_DELAY_MS", default_value_t = 2000)]
    pub stream_delay_ms: u64,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            stream_port: 7000,
            store_url: "mem:".to_string(),
            cache_enabled: true,
            stream_delay_ms: 2000,
            log_level: "info".to_string(),
        }
    }
}
