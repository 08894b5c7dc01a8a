//! Resolve, then synthesize. Every call gets its own resolver and synthesizer,
//! so nothing is shared between calls (or between files of a batch).
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde_json::Value;
use tracing::debug;

use crate::policy::GenerationPolicy;
use crate::resolve::{ResolveError, Resolver, ResolverOptions};
use crate::synth::{SynthError, Synthesizer};

/// Where inline declaration text is taken to live, relative to the project
/// root. Relative imports in that text resolve from here.
pub const INLINE_UNIT: &str = "__inline__.ts";

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("could not generate mock data for {subject}: {source}")]
    Unresolved {
        subject: String,
        #[source]
        source: ResolveError,
    },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed type description: {0}")]
    Malformed(#[from] SynthError),
}

impl GenerateError {
    pub fn reason(&self) -> String {
        self.to_string()
    }

    /// Only a malformed description is worth aborting a batch over.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, GenerateError::Malformed(_))
    }
}

/// A project root plus the resolver settings used for every request against it.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    options: ResolverOptions,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_options(root, ResolverOptions::default())
    }

    pub fn with_options(root: impl Into<PathBuf>, options: ResolverOptions) -> Self {
        Self { root: root.into(), options }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // Types with a custom generator stay named so the generator gets to run.
    fn resolver(&self, policy: &GenerationPolicy) -> Resolver {
        Resolver::with_options(&self.root, self.options.clone()).keep_named(policy.custom_generators.keys())
    }

    pub fn synthesize_for_type(&self, name: &str, declarations: &str, policy: &GenerationPolicy) -> Result<Value, GenerateError> {
        self.synthesize_named(name, declarations, &self.root.join(INLINE_UNIT), policy)
    }

    /// Like [`Project::synthesize_for_type`], with `declarations` read from `location`.
    pub fn synthesize_named(
        &self,
        name: &str,
        declarations: &str,
        location: &Path,
        policy: &GenerationPolicy,
    ) -> Result<Value, GenerateError> {
        let mut resolver = self.resolver(policy);
        let ty = resolver
            .resolve(name, declarations, location)
            .map_err(|source| GenerateError::Unresolved { subject: name.to_owned(), source })?;
        debug!(name, ?ty, "resolved");
        let value = Synthesizer::new(policy).with_lookup(&mut resolver).synthesize(&ty)?;
        Ok(value)
    }

    pub fn synthesize_for_file(&self, path: &Path, policy: &GenerationPolicy) -> Result<Value, GenerateError> {
        let source = std::fs::read_to_string(path).map_err(|source| GenerateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let location = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let mut resolver = self.resolver(policy);
        let ty = resolver
            .resolve_file_data_type(&source, &location)
            .map_err(|source| GenerateError::Unresolved { subject: path.display().to_string(), source })?;
        debug!(path = %path.display(), ?ty, "resolved data type");
        let value = Synthesizer::new(policy).with_lookup(&mut resolver).synthesize(&ty)?;
        Ok(value)
    }

    /// One result per path, in input order.
    pub fn synthesize_batch(
        &self,
        paths: &[PathBuf],
        policy: &GenerationPolicy,
    ) -> Vec<(PathBuf, Result<Value, GenerateError>)> {
        paths
            .par_iter()
            .map(|path| (path.clone(), self.synthesize_for_file(path, policy)))
            .collect()
    }
}

pub fn synthesize_for_type(
    name: &str,
    declarations: &str,
    project_root: &Path,
    policy: &GenerationPolicy,
) -> Result<Value, GenerateError> {
    Project::new(project_root).synthesize_for_type(name, declarations, policy)
}

pub fn synthesize_for_file(path: &Path, project_root: &Path, policy: &GenerationPolicy) -> Result<Value, GenerateError> {
    Project::new(project_root).synthesize_for_file(path, policy)
}

pub fn synthesize_batch(
    paths: &[PathBuf],
    project_root: &Path,
    policy: &GenerationPolicy,
) -> Vec<(PathBuf, Result<Value, GenerateError>)> {
    Project::new(project_root).synthesize_batch(paths, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{PolicyOverrides, create_policy};

    const DECLS: &str = "
        interface Profile { id: string; email: EmailAddress; tags: string[] }
        type Mode = 'a' | 'b';
    ";

    #[test]
    fn inline_declarations() {
        let tmp = tempfile::tempdir().unwrap();
        let p = create_policy(PolicyOverrides { array_length: Some(2), ..Default::default() });
        let v = synthesize_for_type("Profile", DECLS, tmp.path(), &p).unwrap();
        assert!(v["email"].as_str().unwrap().contains('@'));
        assert_eq!(v["tags"].as_array().unwrap().len(), 2);

        let mode = synthesize_for_type("Mode", DECLS, tmp.path(), &p).unwrap();
        assert!(mode == "a" || mode == "b");

        let list = synthesize_for_type("Profile[]", DECLS, tmp.path(), &p).unwrap();
        assert_eq!(list.as_array().unwrap().len(), 2);
    }

    #[test]
    fn unknown_types_are_recoverable() {
        let tmp = tempfile::tempdir().unwrap();
        let err = synthesize_for_type("Nope", DECLS, tmp.path(), &GenerationPolicy::default()).unwrap_err();
        assert!(matches!(err, GenerateError::Unresolved { .. }));
        assert!(err.is_recoverable());
        assert!(err.reason().contains("Nope"));
    }

    #[test]
    fn malformed_is_not_recoverable() {
        let err = GenerateError::from(SynthError::EmptyUnion);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = synthesize_for_file(&tmp.path().join("gone.ts"), tmp.path(), &GenerationPolicy::default()).unwrap_err();
        assert!(matches!(err, GenerateError::Read { .. }));
        assert!(err.is_recoverable());
    }
}
