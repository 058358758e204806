use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub request_timeout_seconds: u64,
    pub latest_guesses_count: usize,
}

impl Config {
    pub fn new() -> Self {
        Self {
            api_url: env::var("API_URL").unwrap_or_else(|_| "http://localhost:8081".to_string()),
            request_timeout_seconds: env::var("REQUEST_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("Invalid REQUEST_TIMEOUT_SECONDS"),
            latest_guesses_count: env::var("LATEST_GUESSES_COUNT")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .expect("Invalid LATEST_GUESSES_COUNT"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
