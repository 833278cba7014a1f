//! Output-directory and file-naming helpers for the rendering pipeline.

use serde::Serialize;
use std::path::PathBuf;

pub fn extract_base_name(path: &str) -> &str {
    std::path::Path::new(path)
        .file_stem()
        .and_then(|name| name.to_str())
        .expect("Unable to extract base name")
}

/// Builds `out/<project>/<params base name>[/<date-time>]` and creates the
/// directory chain on disk.
pub fn build_output_path_with_date_time(
    params_path: &str,
    project: &str,
    datetime: &Option<String>,
) -> PathBuf {
    let mut dirs = vec!["out", project, extract_base_name(params_path)];
    if let Some(inner_datetime_str) = datetime {
        dirs.push(inner_datetime_str);
    }

    let directory_path: PathBuf = dirs.iter().collect();
    std::fs::create_dir_all(&directory_path).unwrap();
    directory_path
}

pub fn date_time_string() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

pub fn maybe_date_time_string(enable: bool) -> Option<String> {
    if enable {
        Some(date_time_string())
    } else {
        None
    }
}

/// A directory and file-name stem, used to drop a family of related output
/// files (image frames, params copy, diagnostics) next to each other.
pub struct FilePrefix {
    pub directory_path: PathBuf,
    pub file_base: String,
}

impl FilePrefix {
    pub fn full_path_with_suffix(&self, suffix: &str) -> PathBuf {
        self.directory_path.join(self.file_base.clone() + suffix)
    }

    pub fn create_file_with_suffix(&self, suffix: &str) -> std::io::BufWriter<std::fs::File> {
        let path = self.full_path_with_suffix(suffix);
        let file = std::fs::File::create(&path)
            .unwrap_or_else(|_| panic!("failed to create file: {:?}", path));
        std::io::BufWriter::new(file)
    }
}

pub fn serialize_to_json_or_panic<T: Serialize>(path: PathBuf, data: &T) {
    let contents = serde_json::to_string_pretty(data).expect("Unable to serialize data");
    std::fs::write(&path, contents).unwrap_or_else(|_| panic!("failed to write file: {:?}", path));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_directories_and_extension() {
        assert_eq!(extract_base_name("demos/render-double-pendulum.json"), "render-double-pendulum");
        assert_eq!(extract_base_name("plain"), "plain");
    }

    #[test]
    fn file_prefix_joins_suffixes() {
        let file_prefix = FilePrefix {
            directory_path: PathBuf::from("out/test"),
            file_base: "run".to_owned(),
        };
        assert_eq!(
            file_prefix.full_path_with_suffix("_diagnostics.txt"),
            PathBuf::from("out/test/run_diagnostics.txt")
        );
    }
}
