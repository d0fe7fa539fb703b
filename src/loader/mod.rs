//! Purpose: Select the loader that turns an input resource into a value graph.
//! Exports: `Loader`, `LoaderRegistry`, `ResolvedLoader`, built-in loaders.
//! Role: Static replacement for import-by-name; names resolve at startup.
//! Invariants: Unknown names fail with `NotFound` before any input is touched.
//! Invariants: `exec:<program>` is the only dynamically constructed loader.
use std::path::Path;

use crate::core::error::{Error, ErrorKind};
use crate::core::value::FsdValue;

mod exec;
mod plain;
mod tree;

pub use exec::ExecLoader;
pub use plain::JsonLoader;
pub use tree::TreeLoader;

pub const EXEC_PREFIX: &str = "exec:";

/// Produces the root value for one input resource.
pub trait Loader {
    fn name(&self) -> &str;

    /// One-line description for `--list-loaders`.
    fn summary(&self) -> &str;

    fn load(&self, input: &Path) -> Result<FsdValue, Error>;
}

/// Loader chosen by name, either registered or built on demand.
pub enum ResolvedLoader<'a> {
    Registered(&'a dyn Loader),
    Exec(ExecLoader),
}

impl ResolvedLoader<'_> {
    pub fn as_loader(&self) -> &dyn Loader {
        match self {
            ResolvedLoader::Registered(loader) => *loader,
            ResolvedLoader::Exec(loader) => loader,
        }
    }
}

#[derive(Default)]
pub struct LoaderRegistry {
    loaders: Vec<Box<dyn Loader>>,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(TreeLoader);
        registry.register(JsonLoader);
        registry
    }

    /// Adds a loader; a later registration shadows an earlier one of the same name.
    pub fn register(&mut self, loader: impl Loader + 'static) {
        self.loaders.retain(|existing| existing.name() != loader.name());
        self.loaders.push(Box::new(loader));
    }

    pub fn loaders(&self) -> impl Iterator<Item = &dyn Loader> {
        self.loaders.iter().map(|loader| loader.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.loaders().map(|loader| loader.name()).collect()
    }

    pub fn resolve(&self, name: &str) -> Result<ResolvedLoader<'_>, Error> {
        if let Some(program) = name.strip_prefix(EXEC_PREFIX) {
            if program.trim().is_empty() {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message("exec loader needs a program")
                    .with_hint("Use `exec:<program>`, e.g. `exec:./fsd-decode`."));
            }
            return Ok(ResolvedLoader::Exec(ExecLoader::new(program)));
        }

        self.loaders()
            .find(|loader| loader.name() == name)
            .map(ResolvedLoader::Registered)
            .ok_or_else(|| {
                Error::new(ErrorKind::NotFound)
                    .with_message(format!("unknown loader `{name}`"))
                    .with_hint(format!(
                        "Known loaders: {}, or `{EXEC_PREFIX}<program>`.",
                        self.names().join(", ")
                    ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{Loader, LoaderRegistry, ResolvedLoader};
    use crate::core::error::{Error, ErrorKind};
    use crate::core::value::FsdValue;
    use std::path::Path;

    struct Fixed(&'static str, i64);

    impl Loader for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn summary(&self) -> &str {
            "fixed value"
        }

        fn load(&self, _input: &Path) -> Result<FsdValue, Error> {
            Ok(FsdValue::Int(self.1))
        }
    }

    #[test]
    fn builtins_are_registered() {
        let registry = LoaderRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["tree", "json"]);
    }

    #[test]
    fn unknown_name_is_not_found_with_hint() {
        let registry = LoaderRegistry::with_builtins();
        let err = registry.resolve("typesLoader").err().expect("unknown");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), Some("unknown loader `typesLoader`"));
        assert!(err.hint().expect("hint").contains("tree, json"));
    }

    #[test]
    fn exec_prefix_builds_exec_loader() {
        let registry = LoaderRegistry::new();
        let resolved = registry.resolve("exec:/opt/fsd/decode").expect("exec");
        assert!(matches!(resolved, ResolvedLoader::Exec(_)));
        assert_eq!(resolved.as_loader().name(), "exec:/opt/fsd/decode");

        let err = registry.resolve("exec:").err().expect("empty program");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn later_registration_shadows_earlier() {
        let mut registry = LoaderRegistry::new();
        registry.register(Fixed("fixed", 1));
        registry.register(Fixed("fixed", 2));
        assert_eq!(registry.names(), vec!["fixed"]);
        let resolved = registry.resolve("fixed").expect("resolve");
        let value = resolved.as_loader().load(Path::new("ignored")).expect("load");
        assert_eq!(value, FsdValue::Int(2));
    }
}
