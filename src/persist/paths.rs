//! Typed paths into the output directory.
use crate::schema::Timestamp;
use crate::util::file_name_component;
use std::path::{Path, PathBuf};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUT_DIR: &str = "outputs";

const HISTORY_FILE: &str = "history.json";

/// Convenience wrapper for locating run outputs.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    root: PathBuf,
}

impl OutputPaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the `history.json` path.
    pub fn history_path(&self) -> PathBuf {
        self.root.join(HISTORY_FILE)
    }

    /// Return the report path for a crop and run time.
    ///
    /// `attempt` 1 yields `recommendation_<crop>_<stamp>.txt`; later attempts
    /// append `_<attempt>` to keep names unique within the same second.
    pub fn report_path(&self, crop: &str, timestamp: &Timestamp, attempt: u32) -> PathBuf {
        let crop = file_name_component(crop);
        let stamp = timestamp.format("%Y%m%d_%H%M%S");
        let name = if attempt <= 1 {
            format!("recommendation_{crop}_{stamp}.txt")
        } else {
            format!("recommendation_{crop}_{stamp}_{attempt}.txt")
        };
        self.root.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn report_path_embeds_crop_and_stamp() {
        let paths = OutputPaths::new(PathBuf::from("outputs"));
        let timestamp =
            DateTime::parse_from_rfc3339("2024-05-01T09:30:07+03:00").expect("parse timestamp");
        assert_eq!(
            paths.report_path("maize", &timestamp, 1),
            PathBuf::from("outputs/recommendation_maize_20240501_093007.txt")
        );
        assert_eq!(
            paths.report_path("Sweet Potato", &timestamp, 3),
            PathBuf::from("outputs/recommendation_sweet_potato_20240501_093007_3.txt")
        );
        assert_eq!(paths.history_path(), PathBuf::from("outputs/history.json"));
    }
}
