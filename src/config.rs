//! Environment configuration.

use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    /// Serve the test upload page at `/`
    pub is_test: bool,
    /// Media service cloud name
    pub cloud_name: String,
    /// Media service API key
    pub api_key: String,
    /// Media service API secret
    pub api_secret: String,
    /// Folder all uploads land in
    pub folder: String,
    /// Short public id of the badge-frame template
    pub frame_id: String,
    /// Local path to the bundled badge-frame asset
    pub badge_frame_path: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Panics if the media service credentials are not set.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            addr: env::var("ADDR").unwrap_or_else(|_| String::from("127.0.0.1")),
            port: env::var("PORT").unwrap_or_else(|_| String::from("3000")),
            is_test: env::var("IS_TEST")
                .unwrap_or_else(|_| String::from("true"))
                .parse()
                .unwrap_or(true),
            cloud_name: env::var("CLOUD_NAME").expect("CLOUD_NAME env var required"),
            api_key: env::var("API_KEY").expect("API_KEY env var required"),
            api_secret: env::var("API_SECRET").expect("API_SECRET env var required"),
            folder: env::var("MEDIA_FOLDER").unwrap_or_else(|_| String::from("virtual-event-tags")),
            frame_id: env::var("BADGE_FRAME_ID").unwrap_or_else(|_| String::from("badge-frame")),
            badge_frame_path: env::var("BADGE_FRAME_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("assets/badge-frame.png")),
        }
    }
}
