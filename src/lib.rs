//! Mock JSON data from TypeScript type declarations.
//!
//! Type text is resolved (across imports and the project tree) into a [`Ty`]
//! description, which a [`Synthesizer`] turns into a value under a
//! [`GenerationPolicy`].
pub mod cli;
pub mod generate;
pub mod ir;
pub mod policy;
pub mod resolve;
pub mod synth;

pub use generate::{GenerateError, Project, synthesize_batch, synthesize_for_file, synthesize_for_type};
pub use ir::{Field, Prim, Ty};
pub use policy::{GenerationPolicy, PolicyOverrides, Preset, ValueGenerator, create_policy};
pub use resolve::{ResolveError, Resolver, ResolverOptions};
pub use synth::{SynthError, Synthesizer, TypeLookup, synthesize};
