use crate::wav::error::{WavError, WavResult};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Maps a file name as written in a CUE sheet to a path.
pub trait FileResolver {
    fn resolve(&mut self, name: &str) -> WavResult<PathBuf>;
}

/// Finds a file on disk for a name, without any caching.
pub trait WavLocator {
    fn locate(&self, name: &str) -> Option<PathBuf>;
}

/// Caching resolver. In strict mode a file that can not be located is an
/// error, otherwise the name is used as written.
pub struct FileLookup<L> {
    locator: L,
    strict: bool,
    file_map: HashMap<String, PathBuf>,
}

impl<L: WavLocator> FileLookup<L> {
    pub fn new(locator: L, strict: bool) -> Self {
        Self {
            locator,
            strict,
            file_map: HashMap::new(),
        }
    }
}

impl<L: WavLocator> FileResolver for FileLookup<L> {
    fn resolve(&mut self, name: &str) -> WavResult<PathBuf> {
        if let Some(path) = self.file_map.get(name) {
            return Ok(path.clone());
        }

        let path = match self.locator.locate(name) {
            Some(path) => path,
            None if self.strict => return Err(WavError::FileNotFound(name.to_string())),
            None => {
                warn!("Could not find WAV file '{name}', using the name as written");
                PathBuf::from(name)
            }
        };

        self.file_map.insert(name.to_string(), path.clone());

        Ok(path)
    }
}

/// Index of every file below a working directory, built once.
#[derive(Debug, Clone)]
pub struct WavFileCache {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl WavFileCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();

        let files: Vec<PathBuf> = WalkDir::new(&dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();

        debug!("Indexed {} files below {dir:?}", files.len());

        Self { dir, files }
    }

    fn find_by(&self, matches: impl Fn(&Path) -> bool) -> Option<PathBuf> {
        let mut found: Vec<&PathBuf> = self.files.iter().filter(|p| matches(p)).collect();
        found.sort();
        found.first().map(|p| p.to_path_buf())
    }
}

impl WavLocator for WavFileCache {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        // CUE sheets written on Windows use backslashes
        let relative = PathBuf::from(name.replace('\\', "/"));

        let exact = self.dir.join(&relative);
        if self.files.contains(&exact) {
            return Some(exact);
        }

        let file_name = relative.file_name()?.to_string_lossy().to_lowercase();
        let stem = relative.file_stem()?.to_string_lossy().to_lowercase();

        let found = self
            .find_by(|p| {
                p.file_name()
                    .is_some_and(|n| n.to_string_lossy().to_lowercase() == file_name)
            })
            .or_else(|| {
                self.find_by(|p| {
                    let is_wav = p
                        .extension()
                        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case("wav"));
                    let same_stem = p
                        .file_stem()
                        .is_some_and(|s| s.to_string_lossy().to_lowercase() == stem);
                    is_wav && same_stem
                })
            })?;

        info!("Mapped '{name}' to {found:?}");

        Some(found)
    }
}
