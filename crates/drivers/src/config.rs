#[derive(Debug, Clone)]
pub struct AppConfig {
    pub export_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            export_dir: "exports".to_string(),
        }
    }
}
