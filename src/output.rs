use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{GenerateError, GenerateResult};
use crate::format::Formatter;

/// Prefix of the file written when formatting fails.
pub const RAW_PREFIX: &str = "raw_";

pub fn output_file_name(api_name: &str) -> String {
    format!("{api_name}_discovery.py")
}

/// Where a run's output ended up.
#[derive(Debug, Clone)]
pub struct Emitted {
    pub path: PathBuf,
    /// Formatter error text when the unformatted fallback was written.
    pub format_error: Option<String>,
}

impl Emitted {
    pub fn formatted(&self) -> bool {
        self.format_error.is_none()
    }
}

/// Formats `source` and writes it to `<api_name>_discovery.py` in `dir`.
///
/// When the formatter fails the raw text goes to `raw_<api_name>_discovery.py`
/// instead and the previous formatted file is left alone. A successful run
/// removes a leftover raw file.
pub fn emit(
    dir: &Path,
    api_name: &str,
    source: &str,
    formatter: &dyn Formatter,
) -> GenerateResult<Emitted> {
    if api_name.is_empty() || api_name.starts_with('.') || api_name.contains(['/', '\\']) {
        return Err(GenerateError::Config(format!(
            "API name '{api_name}' cannot be used as an output file name"
        )));
    }
    fs::create_dir_all(dir)?;
    let file_name = output_file_name(api_name);
    let raw_path = dir.join(format!("{RAW_PREFIX}{file_name}"));

    match formatter.format(source) {
        Ok(formatted) => {
            let path = dir.join(&file_name);
            fs::write(&path, formatted)?;
            info!(path = %path.display(), "wrote formatted module");
            if raw_path.exists() {
                if let Err(err) = fs::remove_file(&raw_path) {
                    warn!(
                        path = %raw_path.display(),
                        error = %err,
                        "could not remove stale raw output"
                    );
                }
            }
            Ok(Emitted {
                path,
                format_error: None,
            })
        }
        Err(err) => {
            warn!(error = %err, "formatter failed, writing unformatted output");
            fs::write(&raw_path, source)?;
            Ok(Emitted {
                path: raw_path,
                format_error: Some(err.to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FormatError, Unformatted};

    struct Failing;

    impl Formatter for Failing {
        fn format(&self, _source: &str) -> Result<String, FormatError> {
            Err(FormatError::Encoding {
                program: "black".into(),
            })
        }
    }

    #[test]
    fn test_should_write_formatted_file_and_drop_stale_raw() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("raw_sheets_discovery.py");
        fs::write(&stale, "old").unwrap();

        let emitted = emit(dir.path(), "sheets", "x = 1\n", &Unformatted).unwrap();
        assert!(emitted.formatted());
        assert_eq!(emitted.path, dir.path().join("sheets_discovery.py"));
        assert_eq!(fs::read_to_string(&emitted.path).unwrap(), "x = 1\n");
        assert!(!stale.exists());
    }

    #[test]
    fn test_should_reject_api_name_escaping_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["../sheets", "nested/sheets", "nested\\sheets", "..", ""] {
            let err = emit(dir.path(), name, "x = 1\n", &Unformatted).unwrap_err();
            assert!(matches!(err, GenerateError::Config(_)), "name {name:?}");
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_should_fall_back_to_raw_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("sheets_discovery.py");
        fs::write(&good, "previous").unwrap();

        let emitted = emit(dir.path(), "sheets", "x=1", &Failing).unwrap();
        assert!(!emitted.formatted());
        assert_eq!(emitted.path, dir.path().join("raw_sheets_discovery.py"));
        assert_eq!(fs::read_to_string(&emitted.path).unwrap(), "x=1");
        assert_eq!(fs::read_to_string(&good).unwrap(), "previous");
    }
}
