use std::path::PathBuf;

#[derive(Clone, Default)]
pub struct Config {
    pub db_url: String,
    pub db_path: String,
    pub logs_path: PathBuf,
}

impl Config {
    pub fn new() -> Self {
        Self {
            db_url: std::env::var("DB_URL").unwrap_or("sqlite://data.db".to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or("data.db".to_string()),
            logs_path: std::env::var("LOGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("logs")),
        }
    }
}
