//! This module provides the `DescriptionLoader` struct, responsible for
//! loading machine descriptions from files and strings.

use crate::parser::parse;
use crate::types::{Description, DescriptionError, MAX_DESCRIPTION_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// `DescriptionLoader` is a utility struct for loading machine descriptions.
/// It reads `.tm` files (the text format), `.json` files (the serde
/// encoding of a [`Description`]), raw strings, and whole directories.
pub struct DescriptionLoader;

impl DescriptionLoader {
    /// Loads a single machine description from the specified file path.
    ///
    /// Files with a `.json` extension are decoded with serde; anything else
    /// goes through the `.tm` parser.
    ///
    /// # Returns
    ///
    /// * `Ok(Description)` if the file is successfully read and parsed.
    /// * `Err(DescriptionError::File)` if the file cannot be read or is
    ///   larger than [`MAX_DESCRIPTION_SIZE`].
    /// * `Err(DescriptionError::Parse)` / `Err(DescriptionError::Validation)`
    ///   if the content is not a valid description.
    pub fn load(path: &Path) -> Result<Description<char>, DescriptionError> {
        let content = fs::read_to_string(path).map_err(|e| {
            DescriptionError::File(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if content.len() > MAX_DESCRIPTION_SIZE {
            return Err(DescriptionError::File(format!(
                "Description file {} exceeds {} bytes",
                path.display(),
                MAX_DESCRIPTION_SIZE
            )));
        }

        if path.extension().is_some_and(|ext| ext == "json") {
            return serde_json::from_str(&content).map_err(|e| {
                DescriptionError::Validation(format!(
                    "Failed to decode {}: {}",
                    path.display(),
                    e
                ))
            });
        }

        parse(&content)
    }

    /// Loads a machine description from text in the `.tm` format.
    ///
    /// This is useful for descriptions that are not stored in files, e.g.
    /// from user input.
    pub fn load_from_string(content: &str) -> Result<Description<char>, DescriptionError> {
        parse(content)
    }

    /// Loads every description file (`.tm` or `.json` extension) from a
    /// given directory.
    ///
    /// Directories and files with other extensions are skipped. Each element
    /// of the result is either a successfully loaded description with its
    /// path, or the error that loading it produced.
    pub fn load_directory(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, Description<char>), DescriptionError>> {
        if !directory.exists() {
            return vec![Err(DescriptionError::File(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(DescriptionError::File(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(DescriptionError::File(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                // Skip directories and files that are not descriptions
                let is_description = path
                    .extension()
                    .is_some_and(|ext| ext == "tm" || ext == "json");
                if path.is_dir() || !is_description {
                    return None;
                }

                match Self::load(&path) {
                    Ok(description) => Some(Ok((path, description))),
                    Err(e) => Some(Err(DescriptionError::File(format!(
                        "Failed to load description from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_valid_description() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.tm");

        let content = "name: Test Machine\nrules:\n  start:\n    a -> b, R, stop\n  stop:";

        let mut file = File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let result = DescriptionLoader::load(&file_path);
        assert!(result.is_ok());

        let description = result.unwrap();
        assert_eq!(description.name, "Test Machine");
        assert_eq!(description.start_state, "start");
        assert_eq!(description.delta.len(), 1);
    }

    #[test]
    fn test_load_invalid_description() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.tm");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"This is not a valid description").unwrap();

        let result = DescriptionLoader::load(&file_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_json_description() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("machine.json");

        let description =
            DescriptionLoader::load_from_string("name: Json\nrules:\n  s:\n    a -> a, R, s")
                .unwrap();
        let json = serde_json::to_string(&description).unwrap();

        let mut file = File::create(&file_path).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = DescriptionLoader::load(&file_path).unwrap();
        assert_eq!(loaded, description);
    }

    #[test]
    fn test_load_oversized_description() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("huge.tm");

        let mut file = File::create(&file_path).unwrap();
        file.write_all("#".repeat(MAX_DESCRIPTION_SIZE + 1).as_bytes())
            .unwrap();

        let result = DescriptionLoader::load(&file_path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("exceeds"));
    }

    #[test]
    fn test_load_directory() {
        let dir = tempdir().unwrap();

        // Create a valid description file
        let valid_path = dir.path().join("valid.tm");
        let valid_content = "name: Valid\nrules:\n  start:\n    a -> b, R, stop\n  stop:";
        let mut valid_file = File::create(&valid_path).unwrap();
        valid_file.write_all(valid_content.as_bytes()).unwrap();

        // Create an invalid description file
        let invalid_path = dir.path().join("invalid.tm");
        let mut invalid_file = File::create(&invalid_path).unwrap();
        invalid_file.write_all(b"This is not a valid description").unwrap();

        // Create a file that should be ignored
        let ignored_path = dir.path().join("ignored.txt");
        let mut ignored_file = File::create(&ignored_path).unwrap();
        ignored_file.write_all(b"This file should be ignored").unwrap();

        let results = DescriptionLoader::load_directory(dir.path());

        // We should have 2 results: 1 success and 1 error
        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    }

    #[test]
    fn test_load_missing_directory() {
        let results = DescriptionLoader::load_directory(Path::new("/no/such/directory"));
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
