//! CLI: TypeScript source files / declarations → mock JSON
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::{Map, Value};

use crate::generate::{GenerateError, Project};
use crate::policy::{GenerationPolicy, PolicyFile, PolicyOverrides, Preset};
use crate::resolve::ResolverOptions;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate mock JSON data from TypeScript type declarations
#[derive(Parser, Debug)]
#[command(name = "typemock", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// mock the data type of each source file (hook type argument, exported alias, or interface)
    File(FileOut),
    /// mock a named type (or type expression) declared in a file
    Type(TypeOut),
    /// print the built-in policy presets
    Presets,
}

#[derive(Args, Debug, Clone)]
struct ProjectSettings {
    /// project root used for `@/` imports and the project-wide type search
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// directory `@/` points at, relative to the project root
    #[arg(long)]
    alias_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct PolicySettings {
    /// start from a built-in preset
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// JSON policy file, applied over the preset
    #[arg(long)]
    policy: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    array_length: Option<usize>,

    #[arg(long)]
    null_probability: Option<f64>,

    #[arg(long)]
    skip_optional_probability: Option<f64>,

    /// fresh randomness on every run instead of the seeded sequence
    #[arg(long, default_value_t = false)]
    random: bool,
}

#[derive(clap::Parser, Debug)]
struct FileOut {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    #[command(flatten)]
    project: ProjectSettings,

    #[command(flatten)]
    policy: PolicySettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct TypeOut {
    /// type name or expression, e.g. `Asset` or `Asset[]`
    name: String,

    /// file holding the declarations
    #[arg(long, short)]
    input: PathBuf,

    #[command(flatten)]
    project: ProjectSettings,

    #[command(flatten)]
    policy: PolicySettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl ProjectSettings {
    fn project(&self) -> Project {
        let options = ResolverOptions {
            alias_dir: self.alias_dir.clone().unwrap_or_default(),
            ..ResolverOptions::default()
        };
        Project::with_options(&self.root, options)
    }
}

impl PolicySettings {
    /// preset < policy file < flags
    fn load(&self) -> Result<GenerationPolicy> {
        let file = match &self.policy {
            Some(path) => Some(PolicyFile::load(path)?),
            None => None,
        };
        let preset = self.preset.or_else(|| file.as_ref().and_then(|f| f.preset));
        let mut policy = preset.map(Preset::policy).unwrap_or_default();
        if let Some(file) = &file {
            policy = policy.merged(file.overrides());
        }
        Ok(policy.merged(self.overrides()))
    }

    fn overrides(&self) -> PolicyOverrides {
        PolicyOverrides {
            seed: self.seed,
            array_length: self.array_length,
            null_probability: self.null_probability,
            skip_optional_probability: self.skip_optional_probability,
            consistent: self.random.then_some(false),
            ..PolicyOverrides::default()
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::File(target) => {
                let paths = resolve_file_path_patterns(&target.input)?;
                let project = target.project.project();
                let policy = target.policy.load()?;
                tracing::debug!(?policy, files = paths.len(), "generating");

                let mut mocks = Map::new();
                for (path, result) in project.synthesize_batch(&paths, &policy) {
                    let key = path.display().to_string();
                    let value = match result {
                        Ok(value) => {
                            eprintln!("{} {key}", "✔".green());
                            value
                        }
                        Err(error) => recover(&key, error)?,
                    };
                    mocks.insert(key, value);
                }
                let output = match (paths.len(), mocks.values().next()) {
                    (1, Some(single)) => single.clone(),
                    _ => Value::Object(mocks),
                };
                write_output(target.out.as_deref(), &output)
            }
            Command::Type(target) => {
                let project = target.project.project();
                let policy = target.policy.load()?;
                let source = std::fs::read_to_string(&target.input)
                    .with_context(|| format!("failed to read {}", target.input.display()))?;
                let location = target.input.canonicalize().unwrap_or_else(|_| target.input.clone());
                let value = project
                    .synthesize_named(&target.name, &source, &location, &policy)
                    .with_context(|| format!("in {}", target.input.display()))?;
                write_output(target.out.as_deref(), &value)
            }
            Command::Presets => {
                let presets: Map<String, Value> = Preset::ALL
                    .iter()
                    .map(|preset| (preset.name().to_string(), preset.policy().summary()))
                    .collect();
                write_output(None, &Value::Object(presets))
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn recover(key: &str, error: GenerateError) -> Result<Value> {
    if !error.is_recoverable() {
        return Err(anyhow::Error::new(error).context(key.to_string()));
    }
    tracing::warn!(file = key, reason = %error.reason(), "no mock generated");
    eprintln!("{} {key}: {}", "✘".red(), error.reason());
    Ok(Value::Null)
}

fn write_output(out: Option<&Path>, value: &Value) -> Result<()> {
    let src = serde_json::to_string_pretty(value)?;
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, &src).with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            println!("{src}");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_which_overrides_preset() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("policy.json");
        std::fs::write(&file, r#"{ "preset": "development", "arrayLength": 2, "seed": 9 }"#).unwrap();

        let cli = CommandLineInterface::try_parse_from([
            "typemock", "type", "Asset", "-i", "types.ts",
            "--policy", file.to_str().unwrap(), "--seed", "11", "--random",
        ])
        .unwrap();
        let Command::Type(target) = &cli.cmd else { panic!("expected type command") };
        let policy = target.policy.load().unwrap();
        assert_eq!(policy.array_length, 2); // file
        assert_eq!(policy.null_probability, 0.05); // preset
        assert_eq!(policy.seed, 11); // flag
        assert!(!policy.consistent);
    }

    #[test]
    fn preset_flag_selects_preset() {
        let cli = CommandLineInterface::try_parse_from(["typemock", "file", "-i", "a.ts", "--preset", "minimal"]).unwrap();
        let Command::File(target) = &cli.cmd else { panic!("expected file command") };
        let policy = target.policy.load().unwrap();
        assert_eq!(policy.array_length, 1);
        assert!(policy.consistent);
    }

    #[test]
    fn literal_and_glob_inputs() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["a.ts", "b.ts", "c.json"] {
            std::fs::write(tmp.path().join(name), "").unwrap();
        }
        let pattern = format!("{}/*.ts", tmp.path().display());
        let found = resolve_file_path_patterns([pattern.as_str(), "literal.ts"]).unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(found[2], PathBuf::from("literal.ts"));

        let none = format!("{}/*.tsx", tmp.path().display());
        assert!(resolve_file_path_patterns([none.as_str()]).is_err());
    }
}
