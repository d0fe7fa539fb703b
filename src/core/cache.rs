//! Purpose: Resolve `res:/` and `app:/` resource identifiers through a game shared cache.
//! Exports: `SharedCache`, `is_cache_resource`, `normalize_resource`.
//! Role: Read-only index over a local game install's `SharedCache` directory.
//! Invariants: Resource keys are lower-cased and use `/` separators.
//! Invariants: The cache is never written; lookups only touch the index and `ResFiles/`.
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{Error, ErrorKind, io_kind};

const START_INI: &str = "tq/start.ini";
const BUILD_PREFIX: &str = "build = ";
const RES_DIR: &str = "ResFiles";
const APP_INDEX: &str = "index_tranquility.txt";
const RES_INDEX_RESOURCE: &str = "app:/resfileindex.txt";

const SCHEMES: [&str; 2] = ["res:/", "app:/"];

/// Returns true when `resource` must be resolved through a shared cache.
pub fn is_cache_resource(resource: &str) -> bool {
    let lower = resource.to_ascii_lowercase();
    SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

pub fn normalize_resource(resource: &str) -> String {
    resource.replace('\\', "/").to_ascii_lowercase()
}

#[derive(Debug, Clone)]
struct IndexEntry {
    path: String,
    md5: String,
    #[allow(dead_code)]
    size: u64,
    #[allow(dead_code)]
    compressed: u64,
}

#[derive(Debug)]
pub struct SharedCache {
    res_dir: PathBuf,
    client_version: String,
    index: HashMap<String, IndexEntry>,
}

impl SharedCache {
    /// Opens the `SharedCache` directory of a game install.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let dir = dir.as_ref();
        let start_ini_path = dir.join(START_INI);
        let start_ini = fs::read_to_string(&start_ini_path).map_err(|err| {
            Error::new(io_kind(&err))
                .with_message("failed to read shared cache start.ini")
                .with_path(&start_ini_path)
                .with_hint("Point --shared-cache at the game's SharedCache directory.")
                .with_source(err)
        })?;
        let client_version = start_ini
            .lines()
            .find_map(|line| line.strip_prefix(BUILD_PREFIX))
            .map(|build| build.trim().to_string())
            .ok_or_else(|| {
                Error::new(ErrorKind::Corrupt)
                    .with_message("start.ini has no build line")
                    .with_path(&start_ini_path)
            })?;

        let res_dir = dir.join(RES_DIR);
        if !res_dir.is_dir() {
            return Err(Error::new(ErrorKind::NotFound)
                .with_message("shared cache has no ResFiles directory")
                .with_path(&res_dir)
                .with_hint("Point --shared-cache at the game's SharedCache directory."));
        }

        let mut cache = Self {
            res_dir,
            client_version,
            index: HashMap::new(),
        };

        let app_index_path = dir.join(APP_INDEX);
        let app_index = read_text(&app_index_path)?;
        cache.load_index(&app_index, &app_index_path)?;

        let res_index_path = cache.path_of(RES_INDEX_RESOURCE)?;
        let res_index = read_text(&res_index_path)?;
        cache.load_index(&res_index, &res_index_path)?;

        tracing::debug!(
            version = %cache.client_version,
            resources = cache.index.len(),
            "opened shared cache"
        );
        Ok(cache)
    }

    fn load_index(&mut self, text: &str, origin: &Path) -> Result<(), Error> {
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (resource, entry) = parse_index_line(line).ok_or_else(|| {
                Error::new(ErrorKind::Corrupt)
                    .with_message(format!("malformed index line {}", line_no + 1))
                    .with_path(origin)
            })?;
            self.index.insert(resource, entry);
        }
        Ok(())
    }

    pub fn client_version(&self) -> &str {
        &self.client_version
    }

    pub fn has_resource(&self, resource: &str) -> bool {
        self.index.contains_key(&normalize_resource(resource))
    }

    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Local path of a resource; the file must exist on disk.
    pub fn path_of(&self, resource: &str) -> Result<PathBuf, Error> {
        let key = normalize_resource(resource);
        let entry = self.index.get(&key).ok_or_else(|| not_found(&key))?;
        let path = self.res_dir.join(&entry.path);
        if !path.is_file() {
            return Err(not_found(&key)
                .with_path(&path)
                .with_hint("The launcher may not have downloaded this file yet."));
        }
        Ok(path)
    }

    pub fn hash_of(&self, resource: &str) -> Result<&str, Error> {
        let key = normalize_resource(resource);
        self.index
            .get(&key)
            .map(|entry| entry.md5.as_str())
            .ok_or_else(|| not_found(&key))
    }
}

// `resource,path,md5,size,compressed[,perms]`
fn parse_index_line(line: &str) -> Option<(String, IndexEntry)> {
    let mut fields = line.trim_end().splitn(6, ',');
    let resource = fields.next()?;
    let path = fields.next()?;
    let md5 = fields.next()?;
    let size = fields.next()?.trim().parse().ok()?;
    let compressed = fields.next()?.trim().parse().ok()?;
    Some((
        normalize_resource(resource),
        IndexEntry {
            path: path.to_string(),
            md5: md5.to_string(),
            size,
            compressed,
        },
    ))
}

fn read_text(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|err| {
        Error::new(io_kind(&err))
            .with_message("failed to read shared cache index")
            .with_path(path)
            .with_source(err)
    })
}

fn not_found(resource: &str) -> Error {
    Error::new(ErrorKind::NotFound).with_message(format!("resource not found: `{resource}`"))
}
