//! Generation policy: the knobs that shape synthesized values.
//!
//! A policy is built once per request by merging overrides onto the defaults.
//! Scalars replace; the two generator maps merge key by key so an override can
//! add or swap a single generator without losing the built-ins.
pub mod defaults;
pub mod file;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rand::RngCore;
use rand::seq::SliceRandom;
use serde_json::{Value, json};

pub use file::{PolicyFile, PolicyFileError};

// ------------------------------ Generators ------------------------------- //

/// What a generator gets to work with: the synthesizer's random source and
/// the instant timestamps are anchored to.
pub struct GenContext<'a> {
    rng: &'a mut dyn RngCore,
    now: DateTime<Utc>,
}

impl<'a> GenContext<'a> {
    pub fn new(rng: &'a mut dyn RngCore, now: DateTime<Utc>) -> Self {
        Self { rng, now }
    }

    pub fn rng(&mut self) -> &mut (dyn RngCore + 'a) {
        &mut *self.rng
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

pub trait ValueGenerator: Send + Sync {
    fn generate(&self, cx: &mut GenContext<'_>) -> Value;
}

impl<F> ValueGenerator for F
where
    F: Fn(&mut GenContext<'_>) -> Value + Send + Sync,
{
    fn generate(&self, cx: &mut GenContext<'_>) -> Value {
        self(cx)
    }
}

/// Lowercase key → generator. Order matters for partial-match lookups.
pub type GeneratorMap = IndexMap<String, Arc<dyn ValueGenerator>>;

pub fn generator<F>(f: F) -> Arc<dyn ValueGenerator>
where
    F: Fn(&mut GenContext<'_>) -> Value + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Uniform pick from a fixed list (null when the list is empty).
pub fn one_of(values: Vec<Value>) -> Arc<dyn ValueGenerator> {
    generator(move |cx| values.choose(cx.rng()).cloned().unwrap_or(Value::Null))
}

// -------------------------------- Policy --------------------------------- //

#[derive(Clone)]
pub struct GenerationPolicy {
    pub seed: u64,
    pub array_length: usize,
    pub skip_optional: bool,
    pub skip_optional_probability: f64,
    pub allow_null: bool,
    pub null_probability: f64,
    /// Reseed from `seed` at the start of every top-level synthesis.
    pub consistent: bool,
    /// Keyed by lowercase field-name fragment.
    pub field_generators: GeneratorMap,
    /// Keyed by lowercase type name.
    pub custom_generators: GeneratorMap,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            seed: 42,
            array_length: 3,
            skip_optional: true,
            skip_optional_probability: 0.3,
            allow_null: true,
            null_probability: 0.1,
            consistent: true,
            field_generators: defaults::field_generators(),
            custom_generators: GeneratorMap::new(),
        }
    }
}

impl fmt::Debug for GenerationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationPolicy")
            .field("seed", &self.seed)
            .field("array_length", &self.array_length)
            .field("skip_optional", &self.skip_optional)
            .field("skip_optional_probability", &self.skip_optional_probability)
            .field("allow_null", &self.allow_null)
            .field("null_probability", &self.null_probability)
            .field("consistent", &self.consistent)
            .field("field_generators", &self.field_generators.keys().collect::<Vec<_>>())
            .field("custom_generators", &self.custom_generators.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Caller-supplied changes; `None` keeps the base value.
#[derive(Clone, Default)]
pub struct PolicyOverrides {
    pub seed: Option<u64>,
    pub array_length: Option<usize>,
    pub skip_optional: Option<bool>,
    pub skip_optional_probability: Option<f64>,
    pub allow_null: Option<bool>,
    pub null_probability: Option<f64>,
    pub consistent: Option<bool>,
    pub field_generators: GeneratorMap,
    pub custom_generators: GeneratorMap,
}

impl fmt::Debug for PolicyOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyOverrides")
            .field("seed", &self.seed)
            .field("array_length", &self.array_length)
            .field("skip_optional", &self.skip_optional)
            .field("skip_optional_probability", &self.skip_optional_probability)
            .field("allow_null", &self.allow_null)
            .field("null_probability", &self.null_probability)
            .field("consistent", &self.consistent)
            .field("field_generators", &self.field_generators.keys().collect::<Vec<_>>())
            .field("custom_generators", &self.custom_generators.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub fn create_policy(overrides: PolicyOverrides) -> GenerationPolicy {
    GenerationPolicy::default().merged(overrides)
}

impl GenerationPolicy {
    pub fn merged(&self, overrides: PolicyOverrides) -> Self {
        let mut out = self.clone();
        if let Some(v) = overrides.seed { out.seed = v; }
        if let Some(v) = overrides.array_length { out.array_length = v; }
        if let Some(v) = overrides.skip_optional { out.skip_optional = v; }
        if let Some(v) = overrides.skip_optional_probability { out.skip_optional_probability = v; }
        if let Some(v) = overrides.allow_null { out.allow_null = v; }
        if let Some(v) = overrides.null_probability { out.null_probability = v; }
        if let Some(v) = overrides.consistent { out.consistent = v; }
        merge_generators(&mut out.field_generators, overrides.field_generators);
        merge_generators(&mut out.custom_generators, overrides.custom_generators);
        out.warn_out_of_range();
        out
    }

    pub fn with_field_generators(&self, generators: GeneratorMap) -> Self {
        let mut out = self.clone();
        merge_generators(&mut out.field_generators, generators);
        out
    }

    pub fn with_type_generators(&self, generators: GeneratorMap) -> Self {
        let mut out = self.clone();
        merge_generators(&mut out.custom_generators, generators);
        out
    }

    /// Scalar settings plus generator keys, for display.
    pub fn summary(&self) -> Value {
        json!({
            "seed": self.seed,
            "arrayLength": self.array_length,
            "skipOptional": self.skip_optional,
            "skipOptionalProbability": self.skip_optional_probability,
            "allowNull": self.allow_null,
            "nullProbability": self.null_probability,
            "consistent": self.consistent,
            "fieldGenerators": self.field_generators.keys().collect::<Vec<_>>(),
            "customGenerators": self.custom_generators.keys().collect::<Vec<_>>(),
        })
    }

    // Probabilities are used as given; out-of-range values only get a warning.
    fn warn_out_of_range(&self) {
        for (name, p) in [
            ("skip_optional_probability", self.skip_optional_probability),
            ("null_probability", self.null_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                tracing::warn!(setting = name, value = p, "probability outside [0, 1]");
            }
        }
    }
}

fn merge_generators(base: &mut GeneratorMap, extra: GeneratorMap) {
    for (key, generator) in extra {
        base.insert(key.to_lowercase(), generator);
    }
}

// ------------------------------- Presets --------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// single-element arrays, no optional fields, no nulls
    Minimal,
    /// larger arrays, rare nulls
    Development,
    /// fixed seed, no nulls
    Testing,
    /// large arrays, rare nulls, fresh randomness every run
    Production,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Minimal, Preset::Development, Preset::Testing, Preset::Production];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Minimal => "minimal",
            Preset::Development => "development",
            Preset::Testing => "testing",
            Preset::Production => "production",
        }
    }

    pub fn overrides(self) -> PolicyOverrides {
        match self {
            Preset::Minimal => PolicyOverrides {
                array_length: Some(1),
                skip_optional: Some(true),
                skip_optional_probability: Some(1.0),
                allow_null: Some(false),
                ..PolicyOverrides::default()
            },
            Preset::Development => PolicyOverrides {
                array_length: Some(5),
                null_probability: Some(0.05),
                ..PolicyOverrides::default()
            },
            Preset::Testing => PolicyOverrides {
                seed: Some(12345),
                consistent: Some(true),
                allow_null: Some(false),
                ..PolicyOverrides::default()
            },
            Preset::Production => PolicyOverrides {
                array_length: Some(10),
                null_probability: Some(0.02),
                consistent: Some(false),
                ..PolicyOverrides::default()
            },
        }
    }

    pub fn policy(self) -> GenerationPolicy {
        create_policy(self.overrides())
    }
}

// ------------------------------- Tests ------------------------------------ //
