//! Purpose: Run one load → encode → write conversion.
//! Exports: `ConvertRequest`, `ConvertOutcome`, `convert`, `resolve_input`.
//! Role: The single control path behind the CLI; usable from library callers.
//! Invariants: The loader name is resolved before any input or output is touched.
//! Invariants: Output is fully encoded in memory before the destination is created,
//! so load and encode failures never leave a partial file.
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::cache::{SharedCache, is_cache_resource};
use crate::core::encode::encode_to_vec;
use crate::core::error::{Error, ErrorKind};
use crate::loader::LoaderRegistry;

#[derive(Clone, Debug)]
pub struct ConvertRequest<'a> {
    pub loader: &'a str,
    pub input: &'a str,
    pub output: &'a Path,
    pub shared_cache: Option<&'a Path>,
    pub pretty: bool,
}

impl<'a> ConvertRequest<'a> {
    pub fn new(loader: &'a str, input: &'a str, output: &'a Path) -> Self {
        Self {
            loader,
            input,
            output,
            shared_cache: None,
            pretty: false,
        }
    }

    pub fn with_shared_cache(mut self, dir: &'a Path) -> Self {
        self.shared_cache = Some(dir);
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertOutcome {
    pub input_path: PathBuf,
    pub root_kind: &'static str,
    pub bytes_written: usize,
}

/// Maps a resource identifier to the file a loader should read.
///
/// `res:/` and `app:/` identifiers need a shared cache; anything else is a path.
pub fn resolve_input(input: &str, shared_cache: Option<&Path>) -> Result<PathBuf, Error> {
    if !is_cache_resource(input) {
        return Ok(PathBuf::from(input));
    }
    let Some(dir) = shared_cache else {
        return Err(Error::new(ErrorKind::Usage)
            .with_message(format!("`{input}` is a shared cache resource"))
            .with_hint("Pass --shared-cache <DIR> or set FSDJSON_SHARED_CACHE."));
    };
    let cache = SharedCache::open(dir)?;
    let path = cache.path_of(input)?;
    tracing::debug!(resource = input, path = %path.display(), "resolved cache resource");
    Ok(path)
}

pub fn convert(registry: &LoaderRegistry, request: &ConvertRequest<'_>) -> Result<ConvertOutcome, Error> {
    let resolved = registry.resolve(request.loader)?;
    let loader = resolved.as_loader();
    let input_path = resolve_input(request.input, request.shared_cache)?;

    tracing::info!(loader = loader.name(), input = %input_path.display(), "loading");
    let root = loader.load(&input_path)?;
    let root_kind = root.kind_name();

    let bytes = encode_to_vec(&root, request.pretty)?;
    fs::write(request.output, &bytes).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to write output")
            .with_path(request.output)
            .with_source(err)
    })?;
    tracing::info!(
        output = %request.output.display(),
        bytes = bytes.len(),
        root = root_kind,
        "wrote json"
    );

    Ok(ConvertOutcome {
        input_path,
        root_kind,
        bytes_written: bytes.len(),
    })
}
