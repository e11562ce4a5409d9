use pixelcraft_application::Clock;

/// Unix milliseconds, matching the `edited-image-<millis>.png` export
/// naming convention.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_timestamp_string(&self) -> String {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|duration| duration.as_millis())
            .unwrap_or_default();
        millis.to_string()
    }
}
