//! Process configuration from environment variables.

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: String,
    pub db_path: String,
    /// Token required by the force-refresh endpoint. Unset disables
    /// the endpoint entirely rather than leaving it open.
    pub admin_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let listen_addr =
            std::env::var("VESRATE_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let db_path =
            std::env::var("VESRATE_DB_PATH").unwrap_or_else(|_| "vesrate.db".to_string());
        let admin_token = std::env::var("VESRATE_ADMIN_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Config {
            listen_addr,
            db_path,
            admin_token,
        }
    }
}
