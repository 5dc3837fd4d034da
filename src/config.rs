use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use clap::Parser;

#[derive(Parser, Clone, Debug)]
#[command(about = "CRUD API over a JSON file of places")]
pub struct Config {
    /// JSON file the places collection is loaded from and written back to.
    #[clap(env = "PLACES_FILE", long, default_value = "places.json")]
    pub places_file: PathBuf,

    #[clap(env = "PLACES_HOST", long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[clap(env = "PLACES_PORT", long, default_value_t = 8080)]
    pub port: u16,

    /// Comma separated list of allowed CORS origins, `*` for any.
    #[clap(env = "ORIGIN_URLS", long, default_value = "*")]
    pub origin_urls: String,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.origin_urls.split(',').any(|s| s.trim() == "*")
    }
}
