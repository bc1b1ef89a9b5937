use std::fs;
use std::path::{Path, PathBuf};
use serde::Deserialize;
use tracing::info;

use crate::error::{DiodemError, Result};

pub const DEFAULT_CACHE_DIR: &str = ".diodem_cache";

/// Source of dataset files addressed by repository-relative, `/`-separated paths.
pub trait FileProvider {
    /// Every file path in the repository, sorted.
    fn listdir(&self) -> Result<Vec<String>>;

    /// Location on disk of `path_in_repo`. `NotFound` if the repository has no such file.
    fn fetch(&self, path_in_repo: &str) -> Result<PathBuf>;

    fn list(&self, filter_prefix: Option<&str>, filter_suffix: Option<&str>) -> Result<Vec<String>> {
        Ok(self.listdir()?.into_iter()
            .filter(|f| filter_prefix.map_or(true, |p| f.starts_with(p)))
            .filter(|f| filter_suffix.map_or(true, |s| f.ends_with(s)))
            .collect())
    }
}

impl<P: FileProvider + ?Sized> FileProvider for &P {
    fn listdir(&self) -> Result<Vec<String>> {
        (**self).listdir()
    }

    fn fetch(&self, path_in_repo: &str) -> Result<PathBuf> {
        (**self).fetch(path_in_repo)
    }
}

/// Repository mirrored in a local directory.
#[derive(Debug, Clone)]
pub struct LocalProvider {
    root: PathBuf
}

impl LocalProvider {
    pub fn new<T: Into<PathBuf>>(root: T) -> LocalProvider {
        LocalProvider { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileProvider for LocalProvider {
    fn listdir(&self) -> Result<Vec<String>> {
        let mut files = Vec::<String>::new();
        if self.root.is_dir() {
            walk(&self.root, "", &mut files)?;
        }
        files.sort();
        Ok(files)
    }

    fn fetch(&self, path_in_repo: &str) -> Result<PathBuf> {
        let path_on_disk = self.root.join(path_in_repo);
        match path_on_disk.is_file() {
            true => Ok(path_on_disk),
            false => Err(DiodemError::NotFound(path_in_repo.to_string()))
        }
    }
}

fn walk(dir: &Path, prefix: &str, files: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        let rel = match prefix.is_empty() {
            true => name,
            false => format!("{}/{}", prefix, name)
        };
        let path = entry.path();
        if path.is_dir() {
            walk(&path, &rel, files)?;
        } else if path.is_file() {
            files.push(rel);
        }
    }
    Ok(())
}

#[derive(Deserialize)]
struct DataverseResponse {
    #[serde(default)]
    data: Vec<DataverseEntry>
}

#[derive(Deserialize)]
struct DataverseEntry {
    #[serde(rename = "directoryLabel")]
    directory_label: Option<String>,
    #[serde(rename = "dataFile")]
    data_file: DataverseDataFile
}

#[derive(Deserialize)]
struct DataverseDataFile {
    filename: String,
    id: u64
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataverseFile {
    pub path: String,
    pub id: u64
}

/// Listing taken from a Dataverse file-listing response, content served by `upstream`.
pub struct ManifestProvider<P: FileProvider> {
    files: Vec<DataverseFile>,
    upstream: P
}

impl<P: FileProvider> ManifestProvider<P> {

    pub fn from_json(json: &str, upstream: P) -> Result<ManifestProvider<P>> {
        let response: DataverseResponse = serde_json::from_str(json)?;
        let mut files = response.data.into_iter().map(|ele| {
            let path = match ele.directory_label {
                Some(dir) => format!("{}/{}", dir, ele.data_file.filename),
                None => ele.data_file.filename
            };
            DataverseFile { path, id: ele.data_file.id }
        }).collect::<Vec<DataverseFile>>();
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(ManifestProvider { files, upstream })
    }

    pub fn from_file(json_path: &Path, upstream: P) -> Result<ManifestProvider<P>> {
        let json = fs::read_to_string(json_path)?;
        ManifestProvider::from_json(&json, upstream)
    }

    pub fn file(&self, path_in_repo: &str) -> Result<&DataverseFile> {
        self.files.iter().find(|f| f.path == path_in_repo).ok_or_else(|| DiodemError::NotFound(path_in_repo.to_string()))
    }
}

impl<P: FileProvider> FileProvider for ManifestProvider<P> {
    fn listdir(&self) -> Result<Vec<String>> {
        Ok(self.files.iter().map(|f| f.path.clone()).collect())
    }

    fn fetch(&self, path_in_repo: &str) -> Result<PathBuf> {
        self.file(path_in_repo)?;
        self.upstream.fetch(path_in_repo)
    }
}

/// Keeps a copy of every fetched file below `cache_root`, fetching from `upstream` only once.
pub struct CachedProvider<P: FileProvider> {
    upstream: P,
    cache_root: PathBuf
}

impl<P: FileProvider> CachedProvider<P> {

    pub fn new<T: Into<PathBuf>>(upstream: P, cache_root: T) -> CachedProvider<P> {
        CachedProvider { upstream, cache_root: cache_root.into() }
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    pub fn path_on_disk(&self, path_in_repo: &str) -> PathBuf {
        self.cache_root.join(path_in_repo)
    }
}

impl<P: FileProvider> FileProvider for CachedProvider<P> {
    fn listdir(&self) -> Result<Vec<String>> {
        self.upstream.listdir()
    }

    fn fetch(&self, path_in_repo: &str) -> Result<PathBuf> {
        let path_on_disk = self.path_on_disk(path_in_repo);
        if !path_on_disk.exists() {
            let source = self.upstream.fetch(path_in_repo)?;
            if let Some(parent) = path_on_disk.parent() {
                fs::create_dir_all(parent)?;
            }
            info!(path = path_in_repo, "Downloading file.. (this might take a moment)");
            fs::copy(&source, &path_on_disk)?;
            info!(
                "Downloading finished. Saved to location {}. All downloaded files can be deleted by removing folder {}.",
                path_on_disk.display(), self.cache_root.display()
            );
        }
        Ok(path_on_disk)
    }
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest.trim_start_matches('/')),
        _ => PathBuf::from(path)
    }
}
