use std::env;

pub const DEFAULT_SECRET: &str = "some secret text";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: String,
    pub delay_ms: u64,
    pub secret: String,
}

impl Config {
    pub fn init() -> Config {
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(3000);
        let db_path = env::var("DB_PATH").unwrap_or_else(|_| "db.json".to_string());
        let delay_ms = env::var("DELAY_MS")
            .ok()
            .and_then(|delay| delay.parse().ok())
            .unwrap_or(500);
        let secret = env::var("SECRET").unwrap_or_else(|_| DEFAULT_SECRET.to_string());

        Config {
            port,
            db_path,
            delay_ms,
            secret,
        }
    }
}
