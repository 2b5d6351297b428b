use std::env;
use std::path::PathBuf;

/// Default document name, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "blog_posts.json";

/// Default listen address for `serve`.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Configuration shared by the CLI and the HTTP server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the JSON document holding every post
    pub data_file: PathBuf,

    /// Address the HTTP server binds to, e.g. `0.0.0.0:5000`
    pub bind_addr: String,

    /// Output format: "human" (default) or "json"
    pub output_format: String,

    /// Log level: "info", "debug", "warn", "error" (default: "info")
    pub log_level: String,
}

impl Config {
    /// Create a new config with defaults
    pub fn new() -> Self {
        let data_file = env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_DATA_FILE);

        Config {
            data_file,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            output_format: "human".to_string(),
            log_level: "info".to_string(),
        }
    }

    /// Create config with a custom data file
    pub fn with_data_file(data_file: PathBuf) -> Self {
        Config {
            data_file,
            ..Config::new()
        }
    }

    pub fn get_data_file(&self) -> &PathBuf {
        &self.data_file
    }

    pub fn set_data_file(&mut self, path: PathBuf) {
        self.data_file = path;
    }

    pub fn get_bind_addr(&self) -> &str {
        &self.bind_addr
    }

    pub fn set_bind_addr(&mut self, addr: String) {
        self.bind_addr = addr;
    }

    pub fn get_output_format(&self) -> &str {
        &self.output_format
    }

    /// Set output format ("human" or "json")
    pub fn set_output_format(&mut self, format: String) {
        self.output_format = format;
    }

    pub fn get_log_level(&self) -> &str {
        &self.log_level
    }

    pub fn set_log_level(&mut self, level: String) {
        self.log_level = level;
    }

    /// Load config from environment variables
    ///
    /// Environment variables:
    /// - `POSTBOARD_DATA_FILE`: override the post document path
    /// - `POSTBOARD_BIND_ADDR`: server listen address
    /// - `POSTBOARD_OUTPUT_FORMAT`: "human" or "json"
    /// - `POSTBOARD_LOG_LEVEL`: log level
    pub fn from_env() -> Self {
        let mut config = Config::new();

        if let Ok(path) = env::var("POSTBOARD_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }

        if let Ok(addr) = env::var("POSTBOARD_BIND_ADDR") {
            config.bind_addr = addr;
        }

        if let Ok(format) = env::var("POSTBOARD_OUTPUT_FORMAT") {
            config.output_format = format;
        }

        if let Ok(level) = env::var("POSTBOARD_LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
