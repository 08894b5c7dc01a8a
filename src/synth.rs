//! Type description + policy → JSON value.
//!
//! Each synthesizer owns its random source. With `consistent` set it is reseeded
//! from the policy seed at the start of every top-level call and timestamps are
//! anchored at a fixed instant, so equal inputs give equal output.
pub mod scalar;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};
use tracing::debug;

use crate::ir::{Field, Prim, Ty};
use crate::policy::{GenContext, GenerationPolicy, GeneratorMap, ValueGenerator};
use crate::resolve::{self, ResolveError, Resolver};

/// 2024-01-01T00:00:00Z
const REFERENCE_EPOCH_SECS: i64 = 1_704_067_200;

/// Expands `Named` types on demand during synthesis.
pub trait TypeLookup {
    fn lookup(&mut self, name: &str) -> Result<Ty, ResolveError>;
}

impl TypeLookup for Resolver {
    fn lookup(&mut self, name: &str) -> Result<Ty, ResolveError> {
        self.resolve_by_name(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    #[error("union type with no options")]
    EmptyUnion,
}

pub fn reference_instant() -> DateTime<Utc> {
    DateTime::from_timestamp(REFERENCE_EPOCH_SECS, 0).unwrap_or_default()
}

/// One-off synthesis without named-type expansion.
pub fn synthesize(ty: &Ty, policy: &GenerationPolicy) -> Result<Value, SynthError> {
    Synthesizer::new(policy).synthesize(ty)
}

pub struct Synthesizer<'a> {
    policy: &'a GenerationPolicy,
    types: Option<&'a mut dyn TypeLookup>,
    rng: StdRng,
    now: DateTime<Utc>,
    /// Named types currently being expanded, innermost last.
    expanding: Vec<String>,
}

impl<'a> Synthesizer<'a> {
    pub fn new(policy: &'a GenerationPolicy) -> Self {
        let (rng, now) = if policy.consistent {
            (StdRng::seed_from_u64(policy.seed), reference_instant())
        } else {
            (StdRng::from_entropy(), Utc::now())
        };
        Self { policy, types: None, rng, now, expanding: Vec::new() }
    }

    pub fn with_lookup(mut self, types: &'a mut dyn TypeLookup) -> Self {
        self.types = Some(types);
        self
    }

    pub fn synthesize(&mut self, ty: &Ty) -> Result<Value, SynthError> {
        if self.policy.consistent {
            self.rng = StdRng::seed_from_u64(self.policy.seed);
        }
        self.expanding.clear();
        self.value(ty)
    }

    fn value(&mut self, ty: &Ty) -> Result<Value, SynthError> {
        match ty {
            Ty::Object { fields } => self.object(fields),
            Ty::Array { element } => (0..self.policy.array_length)
                .map(|_| self.value(element))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Ty::Union(options) => {
                let choice = options.choose(&mut self.rng).ok_or(SynthError::EmptyUnion)?;
                self.value(choice)
            }
            Ty::Primitive(prim) => Ok(self.primitive(*prim)),
            Ty::Literal(value) => Ok(value.clone()),
            Ty::Named(name) => self.named(name),
        }
    }

    fn object(&mut self, fields: &[Field]) -> Result<Value, SynthError> {
        let policy = self.policy;
        let mut out = Map::new();
        for field in fields {
            if field.optional && policy.skip_optional && self.draw() < policy.skip_optional_probability {
                continue;
            }
            let candidate = self.field_value(field)?;
            let value = if field.nullable && policy.allow_null && self.draw() < policy.null_probability {
                Value::Null
            } else {
                candidate
            };
            out.insert(field.name.clone(), value);
        }
        Ok(Value::Object(out))
    }

    // Leaf fields let the field name pick the generator; structural ones recurse.
    // A declared primitive only takes a field-name value of the same JSON kind.
    fn field_value(&mut self, field: &Field) -> Result<Value, SynthError> {
        match &field.ty {
            Ty::Named(type_name) => {
                if let Some(v) = self.custom(type_name) {
                    return Ok(v);
                }
                if let Some(v) = self.by_field_name(&field.name) {
                    return Ok(v);
                }
            }
            Ty::Primitive(prim) => {
                if let Some(v) = self.by_field_name(&field.name).filter(|v| fits(*prim, v)) {
                    return Ok(v);
                }
            }
            _ => {}
        }
        self.value(&field.ty)
    }

    fn named(&mut self, name: &str) -> Result<Value, SynthError> {
        if matches!(name, "null" | "undefined") {
            return Ok(Value::Null);
        }
        if let Some(v) = self.custom(name) {
            return Ok(v);
        }
        if let Some(fields) = self.expand(name) {
            self.expanding.push(name.to_owned());
            let result = self.object(&fields);
            self.expanding.pop();
            return result;
        }
        if let Some(v) = self.by_field_name(name) {
            return Ok(v);
        }
        Ok(Value::from(scalar::words(&mut self.rng, 2)))
    }

    fn expand(&mut self, name: &str) -> Option<Vec<Field>> {
        if !resolve::is_identifier(name) {
            return None;
        }
        if self.expanding.iter().any(|n| n == name) {
            debug!(name, "already expanding; left opaque");
            return None;
        }
        let types = self.types.as_mut()?;
        match types.lookup(name) {
            Ok(Ty::Object { fields }) => Some(fields),
            Ok(_) => None,
            Err(error) => {
                debug!(name, %error, "named type left opaque");
                None
            }
        }
    }

    fn custom(&mut self, type_name: &str) -> Option<Value> {
        let policy = self.policy;
        let generator = policy.custom_generators.get(type_name.to_lowercase().as_str())?;
        Some(self.run(generator))
    }

    fn by_field_name(&mut self, name: &str) -> Option<Value> {
        let policy = self.policy;
        let generator = match_generator(&policy.field_generators, &name.to_lowercase())?;
        Some(self.run(generator))
    }

    fn run(&mut self, generator: &Arc<dyn ValueGenerator>) -> Value {
        generator.generate(&mut GenContext::new(&mut self.rng, self.now))
    }

    fn primitive(&mut self, prim: Prim) -> Value {
        match prim {
            Prim::String => Value::from(scalar::words(&mut self.rng, 2)),
            Prim::Number => Value::from(scalar::integer(&mut self.rng)),
            Prim::Boolean => Value::Bool(self.rng.gen_bool(0.5)),
            Prim::Date => Value::from(scalar::timestamp(&mut self.rng, self.now)),
        }
    }

    fn draw(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// Exact key, else the first key (in map order) that contains or is contained
/// by `name`. Short keys over-match: `id` fits `guidance`.
pub fn match_generator<'m>(generators: &'m GeneratorMap, name: &str) -> Option<&'m Arc<dyn ValueGenerator>> {
    generators.get(name).or_else(|| {
        generators
            .iter()
            .find(|(key, _)| name.contains(key.as_str()) || key.contains(name))
            .map(|(_, generator)| generator)
    })
}

fn fits(prim: Prim, value: &Value) -> bool {
    match prim {
        Prim::String | Prim::Date => value.is_string(),
        Prim::Number => value.is_number(),
        Prim::Boolean => value.is_boolean(),
    }
}

// ------------------------------- Tests ------------------------------------ //
