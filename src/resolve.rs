//! Type resolver.
//!
//! Finds the declaration behind a name (in the unit, through its imports, or
//! anywhere in the project) and converts its text into a `Ty`. One resolver is
//! one analysis session: it owns the resolution cache and the unit cache.
//!
//! Resolution never loops: a name that is revisited while it is still being
//! resolved comes back as `Ty::Named`, and import hops are guarded per
//! `(file, name)`.
pub mod decl;
pub mod expr;
pub mod module;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::ir::{Field, Ty};
use expr::TypeExpr;

/// Hooks whose first type argument names the data a file deals with,
/// in order of preference.
const DATA_HOOKS: &[&str] = &["useMutation", "useQuery", "useSuspenseQuery", "useInfiniteQuery"];

/// Exported alias suffixes preferred when a file has no data hook.
const DATA_SUFFIXES: &[&str] = &["Response", "Data", "Result"];

// ------------------------------- Errors ---------------------------------- //

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("type `{name}` is not declared in the unit, its imports, or the project")]
    NotFound { name: String },

    #[error("import `{specifier}` in {} does not resolve to a file", from.display())]
    ImportMissing { specifier: String, from: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no hook type argument, exported type alias, or interface in {}", path.display())]
    NoDataType { path: PathBuf },
}

// ------------------------------ Options ---------------------------------- //

#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Specifier prefix marking project-root imports (`@/`).
    pub alias_prefix: String,
    /// Directory the alias prefix points at, relative to the project root.
    pub alias_dir: PathBuf,
    /// Tried in order when a specifier has no extension.
    pub extensions: Vec<String>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            alias_prefix: "@/".to_string(),
            alias_dir: PathBuf::new(),
            extensions: vec![".ts".into(), ".tsx".into(), ".d.ts".into()],
        }
    }
}

// ------------------------------ Resolver --------------------------------- //

#[derive(Debug)]
pub struct Resolver {
    root: PathBuf,
    options: ResolverOptions,
    cache: HashMap<String, Ty>,
    /// Names the project-wide search already failed to find.
    misses: HashSet<String>,
    in_progress: HashSet<String>,
    visiting: HashSet<(PathBuf, String)>,
    /// Comment-stripped unit text by path; each file is read once per session.
    units: HashMap<PathBuf, Arc<str>>,
    /// Lowercased names that stay `Ty::Named` in field positions.
    keep_named: HashSet<String>,
}

impl Resolver {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::with_options(project_root, ResolverOptions::default())
    }

    pub fn with_options(project_root: impl Into<PathBuf>, options: ResolverOptions) -> Self {
        Self {
            root: project_root.into(),
            options,
            cache: HashMap::new(),
            misses: HashSet::new(),
            in_progress: HashSet::new(),
            visiting: HashSet::new(),
            units: HashMap::new(),
            keep_named: HashSet::new(),
        }
    }

    /// Leave references to these names as `Ty::Named` (case-insensitive), so a
    /// custom generator registered for the type still sees it.
    pub fn keep_named<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keep_named.extend(names.into_iter().map(|n| n.as_ref().to_lowercase()));
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.root
    }

    /// Resolve a declaration name, or any other type expression, in the
    /// context of `source` located at `location`.
    pub fn resolve(&mut self, name_or_expr: &str, source: &str, location: &Path) -> Result<Ty, ResolveError> {
        let unit = expr::strip_comments(source);
        self.resolve_target(name_or_expr.trim(), &unit, location)
    }

    /// Look a name up without a unit: conventional type files first, then
    /// every source file in the project.
    pub fn resolve_by_name(&mut self, name: &str) -> Result<Ty, ResolveError> {
        if let Some(ty) = self.cache.get(name) {
            return Ok(ty.clone());
        }
        if self.in_progress.contains(name) {
            return Ok(Ty::named(name));
        }
        if self.misses.contains(name) {
            return Err(ResolveError::NotFound { name: name.to_owned() });
        }

        let conventional = module::conventional_locations(&self.root, name, &self.options);
        if let Some(found) = self.search(name, conventional) {
            return found;
        }
        debug!(name, "not in conventional locations; scanning project");
        let everything = module::project_sources(&self.root);
        if let Some(found) = self.search(name, everything) {
            return found;
        }

        self.misses.insert(name.to_owned());
        Err(ResolveError::NotFound { name: name.to_owned() })
    }

    /// Root data type of a hook or API module.
    ///
    /// `useMutation<T>` wins, then query hooks, then an exported alias (one
    /// named `*Response`/`*Data`/`*Result` first), then the first exported
    /// interface.
    pub fn resolve_file_data_type(&mut self, source: &str, location: &Path) -> Result<Ty, ResolveError> {
        let unit = expr::strip_comments(source);

        for hook in DATA_HOOKS {
            let Some(arg) = decl::hook_type_argument(&unit, hook) else { continue };
            debug!(hook, arg, file = %location.display(), "using hook type argument");
            return match self.resolve_target(arg, &unit, location) {
                // ambient / global declarations
                Err(ResolveError::NotFound { .. }) if is_identifier(arg) => self.resolve_by_name(arg),
                other => other,
            };
        }

        let aliases = decl::exported_aliases(&unit);
        let interfaces = decl::exported_interfaces(&unit);
        let chosen = aliases
            .iter()
            .find(|name| DATA_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
            .or_else(|| aliases.first())
            .or_else(|| interfaces.first())
            .map(|name| name.to_string());

        match chosen {
            Some(name) => {
                debug!(name, file = %location.display(), "using exported declaration");
                self.resolve_name(&name, &unit, location)
            }
            None => Err(ResolveError::NoDataType { path: location.to_path_buf() }),
        }
    }

    /// Type expression in the context of a (comment-stripped) unit. Unknown
    /// references degrade to `Named`; this never fails.
    pub fn resolve_expr(&mut self, text: &str, unit: &str, location: &Path) -> Ty {
        let parsed = expr::parse(text);
        self.lower(&parsed, unit, location)
    }

    /// Comment-stripped text of a unit, read at most once per session.
    pub fn read_unit(&mut self, path: &Path) -> Result<Arc<str>, ResolveError> {
        if let Some(text) = self.units.get(path) {
            return Ok(Arc::clone(text));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text: Arc<str> = Arc::from(expr::strip_comments(&raw));
        self.units.insert(path.to_path_buf(), Arc::clone(&text));
        Ok(text)
    }
}

// --------------------------- Internal helpers ---------------------------- //

impl Resolver {
    fn resolve_target(&mut self, target: &str, unit: &str, location: &Path) -> Result<Ty, ResolveError> {
        if self.keep_named.contains(&target.to_lowercase()) {
            return Ok(Ty::named(target));
        }
        if is_identifier(target) {
            self.resolve_name(target, unit, location)
        } else {
            Ok(self.resolve_expr(target, unit, location))
        }
    }

    fn resolve_name(&mut self, name: &str, unit: &str, location: &Path) -> Result<Ty, ResolveError> {
        if let Some(ty) = self.cache.get(name) {
            debug!(name, "cache hit");
            return Ok(ty.clone());
        }
        if self.in_progress.contains(name) {
            debug!(name, "cycle; leaving as named");
            return Ok(Ty::named(name));
        }

        self.in_progress.insert(name.to_owned());
        let result = self.find_in_unit(name, unit, location);
        self.in_progress.remove(name);

        if let Ok(ty) = &result {
            self.cache.insert(name.to_owned(), ty.clone());
        }
        result
    }

    fn find_in_unit(&mut self, name: &str, unit: &str, location: &Path) -> Result<Ty, ResolveError> {
        if let Some(decl) = decl::find_interface(unit, name) {
            return Ok(self.interface_ty(&decl, unit, location));
        }
        if let Some(rhs) = decl::find_alias(unit, name) {
            return Ok(self.resolve_expr(rhs, unit, location));
        }
        if let Some(body) = decl::find_enum(unit, name) {
            let options: Vec<Ty> = decl::enum_values(body).into_iter().map(Ty::Literal).collect();
            if options.is_empty() {
                return Ok(Ty::named(name));
            }
            return Ok(Ty::union_of(options));
        }

        for import in decl::imports(unit) {
            if let Some(binding) = import.bindings.iter().find(|b| b.local == name) {
                return self.follow(binding.imported, import.specifier, location);
            }
        }

        for export in decl::re_exports(unit) {
            let imported = match &export.bindings {
                Some(bindings) => match bindings.iter().find(|b| b.local == name) {
                    Some(binding) => binding.imported,
                    None => continue,
                },
                None => name,
            };
            match self.follow(imported, export.specifier, location) {
                Ok(ty) => return Ok(ty),
                // `export *` is a guess; keep looking
                Err(error) if export.bindings.is_none() => {
                    debug!(name, specifier = export.specifier, %error, "not behind star export");
                }
                Err(error) => return Err(error),
            }
        }

        Err(ResolveError::NotFound { name: name.to_owned() })
    }

    /// Find `name` in the unit an import specifier points at.
    fn follow(&mut self, name: &str, specifier: &str, from: &Path) -> Result<Ty, ResolveError> {
        let unit_dir = from.parent().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
        let path = module::resolve_specifier(specifier, &unit_dir, &self.root, &self.options)
            .ok_or_else(|| ResolveError::ImportMissing {
                specifier: specifier.to_owned(),
                from: from.to_path_buf(),
            })?;

        let key = (path.clone(), name.to_owned());
        if !self.visiting.insert(key.clone()) {
            debug!(name, file = %path.display(), "import cycle");
            return Err(ResolveError::NotFound { name: name.to_owned() });
        }
        debug!(name, specifier, file = %path.display(), "following import");
        let result = self
            .read_unit(&path)
            .and_then(|text| self.find_in_unit(name, &text, &path));
        self.visiting.remove(&key);
        result
    }

    fn search(&mut self, name: &str, paths: Vec<PathBuf>) -> Option<Result<Ty, ResolveError>> {
        let declaration = decl::declaration_pattern(name)?;
        for path in paths {
            let text = match self.read_unit(&path) {
                Ok(text) => text,
                Err(error) => {
                    debug!(%error, "skipping unreadable unit");
                    continue;
                }
            };
            if !text.contains(name) || !declaration.is_match(&text) {
                continue;
            }
            debug!(name, file = %path.display(), "declaration found");
            return Some(self.resolve_name(name, &text, &path));
        }
        None
    }

    fn interface_ty(&mut self, decl: &decl::InterfaceDecl<'_>, unit: &str, location: &Path) -> Ty {
        let mut fields: Vec<Field> = Vec::new();
        for parent in &decl.extends {
            // parents are always inlined, kept names included
            let inherited = match expr::parse(parent) {
                TypeExpr::Ref(name) => self.resolve_name(name, unit, location).ok(),
                parsed => Some(self.lower(&parsed, unit, location)),
            };
            if let Some(Ty::Object { fields: inherited }) = inherited {
                fields.extend(inherited);
            }
        }
        for field in self.fields_of(decl.body, unit, location) {
            fields.retain(|f| f.name != field.name);
            fields.push(field);
        }
        Ty::Object { fields }
    }

    fn fields_of(&mut self, body: &str, unit: &str, location: &Path) -> Vec<Field> {
        expr::split_members(body)
            .into_iter()
            .filter_map(decl::parse_member)
            .map(|member| {
                let members = expr::split_top_level(member.raw_type, '|');
                let nullable = members.iter().any(|m| *m == "null");
                let options: Vec<Ty> = members
                    .iter()
                    .filter(|m| **m != "null" && **m != "undefined")
                    .map(|m| self.resolve_expr(m, unit, location))
                    .collect();
                let ty = if options.is_empty() { Ty::named("null") } else { Ty::union_of(options) };
                Field { name: member.name.to_owned(), ty, optional: member.optional, nullable }
            })
            .collect()
    }

    fn lower(&mut self, parsed: &TypeExpr<'_>, unit: &str, location: &Path) -> Ty {
        match parsed {
            TypeExpr::Union(members) => {
                let options: Vec<Ty> = members
                    .iter()
                    .filter(|m| !matches!(m, TypeExpr::Null | TypeExpr::Undefined))
                    .map(|m| self.lower(m, unit, location))
                    .collect();
                if options.is_empty() { Ty::named("null") } else { Ty::union_of(options) }
            }
            TypeExpr::Array(element) => Ty::array_of(self.lower(element, unit, location)),
            TypeExpr::Keyword(prim) => Ty::Primitive(*prim),
            TypeExpr::Null => Ty::named("null"),
            TypeExpr::Undefined => Ty::named("undefined"),
            TypeExpr::Literal(value) => Ty::Literal(value.clone()),
            TypeExpr::Object(body) => Ty::Object { fields: self.fields_of(body, unit, location) },
            TypeExpr::Ref(name) if self.keep_named.contains(&name.to_lowercase()) => Ty::named(*name),
            TypeExpr::Ref(name) => match self.resolve_name(name, unit, location) {
                Ok(ty) => ty,
                Err(error) => {
                    debug!(name, %error, "unresolved reference");
                    Ty::named(*name)
                }
            },
            TypeExpr::Opaque(text) => Ty::named(*text),
        }
    }
}

pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Prim;
    use serde_json::Value;
    use std::fs;

    fn here() -> PathBuf {
        PathBuf::from("/virtual/src/unit.ts")
    }

    fn write(root: &Path, rel: &str, text: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    fn field<'a>(ty: &'a Ty, name: &str) -> &'a Field {
        ty.fields().unwrap().iter().find(|f| f.name == name).unwrap()
    }

    #[test]
    fn interface_fields_carry_flags() {
        let src = "export interface User {\n  id: string;\n  age?: number;\n  nick: string | null;\n  bio?: null | string;\n  born: Date\n}";
        let mut r = Resolver::new("/virtual");
        let ty = r.resolve("User", src, &here()).unwrap();
        let names: Vec<&str> = ty.fields().unwrap().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "age", "nick", "bio", "born"]);

        let age = field(&ty, "age");
        assert!(age.optional && !age.nullable);
        assert_eq!(age.ty, Ty::Primitive(Prim::Number));
        let nick = field(&ty, "nick");
        assert!(!nick.optional && nick.nullable);
        assert_eq!(nick.ty, Ty::Primitive(Prim::String));
        let bio = field(&ty, "bio");
        assert!(bio.optional && bio.nullable);
        assert_eq!(bio.ty, Ty::Primitive(Prim::String));
        assert_eq!(field(&ty, "born").ty, Ty::Primitive(Prim::Date));
    }

    #[test]
    fn self_reference_terminates_as_named() {
        let src = "interface Node { value: number; next: Node | null }";
        let mut r = Resolver::new("/virtual");
        let ty = r.resolve("Node", src, &here()).unwrap();
        let next = field(&ty, "next");
        assert!(next.nullable);
        assert_eq!(next.ty, Ty::named("Node"));
    }

    #[test]
    fn mutual_reference_terminates() {
        let src = "interface A { b: B }\ninterface B { a: A[] }";
        let mut r = Resolver::new("/virtual");
        let a = r.resolve("A", src, &here()).unwrap();
        let b = &field(&a, "b").ty;
        assert_eq!(field(b, "a").ty, Ty::array_of(Ty::named("A")));
    }

    #[test]
    fn extends_merges_parent_fields_first() {
        let src = "interface Base { id: string; kind: string }\nexport interface Car extends Base { kind: 'car'; wheels: number }";
        let mut r = Resolver::new("/virtual");
        let ty = r.resolve("Car", src, &here()).unwrap();
        let names: Vec<&str> = ty.fields().unwrap().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "kind", "wheels"]);
        assert_eq!(field(&ty, "kind").ty, Ty::Literal(Value::from("car")));
    }

    #[test]
    fn aliases_enums_and_inline_objects() {
        let src = "export type Status = 'on' | 'off';\nenum Level { Low = 1, High }\nexport type Row = { status: Status; level: Level; tags?: string[] };";
        let mut r = Resolver::new("/virtual");
        let row = r.resolve("Row", src, &here()).unwrap();
        assert_eq!(
            field(&row, "status").ty,
            Ty::Union(vec![Ty::Literal(Value::from("on")), Ty::Literal(Value::from("off"))])
        );
        assert_eq!(
            field(&row, "level").ty,
            Ty::Union(vec![Ty::Literal(Value::from(1)), Ty::Literal(Value::from(2))])
        );
        let tags = field(&row, "tags");
        assert!(tags.optional);
        assert_eq!(tags.ty, Ty::array_of(Ty::Primitive(Prim::String)));
    }

    #[test]
    fn expressions_resolve_in_unit_context() {
        let src = "interface Bar { id: string }";
        let mut r = Resolver::new("/virtual");
        let ty = r.resolve("Bar[] | null", src, &here()).unwrap();
        assert_eq!(ty, Ty::array_of(Ty::Object { fields: vec![Field::required("id", Ty::Primitive(Prim::String))] }));
        let opaque = r.resolve("Record<string, Bar>", src, &here()).unwrap();
        assert_eq!(opaque, Ty::named("Record<string, Bar>"));
    }

    #[test]
    fn unknown_names_fail_and_unknown_refs_degrade() {
        let mut r = Resolver::new("/virtual");
        let err = r.resolve("Ghost", "export type X = string", &here()).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { ref name } if name == "Ghost"));
        let ty = r.resolve("Holder", "interface Holder { g: Ghost }", &here()).unwrap();
        assert_eq!(field(&ty, "g").ty, Ty::named("Ghost"));
    }

    #[test]
    fn import_chain_across_files() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(root, "src/models/bar.ts", "export interface Bar { id: string }\n");
        let x = write(root, "src/api/x.ts", "import { Bar } from '../models/bar';\nexport type Foo = Bar[];\n");
        let mut r = Resolver::new(root);
        let src = fs::read_to_string(&x).unwrap();
        let ty = r.resolve("Foo", &src, &x).unwrap();
        assert_eq!(ty, Ty::array_of(Ty::Object { fields: vec![Field::required("id", Ty::Primitive(Prim::String))] }));
    }

    #[test]
    fn renamed_alias_and_barrel_imports() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(root, "src/types/money.ts", "export interface Money { amount: number; currency: string }\n");
        write(root, "src/types/index.ts", "export * from './other';\nexport { Money as Cash } from './money';\n");
        write(root, "src/types/other.ts", "export type Other = string;\n");
        let page = write(
            root,
            "src/pages/page.ts",
            "import { Cash as Price, Other } from '@/src/types';\nexport interface Item { price: Price; other: Other }\n",
        );
        let mut r = Resolver::new(root);
        let src = fs::read_to_string(&page).unwrap();
        let item = r.resolve("Item", &src, &page).unwrap();
        assert_eq!(field(&item, "price").ty.fields().unwrap().len(), 2);
        assert_eq!(field(&item, "other").ty, Ty::Primitive(Prim::String));
    }

    #[test]
    fn missing_import_target_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let page = write(tmp.path(), "src/page.ts", "import { Gone } from './gone';\n");
        let mut r = Resolver::new(tmp.path());
        let src = fs::read_to_string(&page).unwrap();
        let err = r.resolve("Gone", &src, &page).unwrap_err();
        assert!(matches!(err, ResolveError::ImportMissing { ref specifier, .. } if specifier == "./gone"));
    }

    #[test]
    fn cached_results_skip_the_filesystem() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let bar = write(root, "src/bar.ts", "export interface Bar { id: string }\n");
        let x = write(root, "src/x.ts", "import { Bar } from './bar';\n");
        let src = fs::read_to_string(&x).unwrap();
        let mut r = Resolver::new(root);
        let first = r.resolve("Bar", &src, &x).unwrap();
        fs::remove_file(bar).unwrap();
        assert_eq!(r.resolve("Bar", &src, &x).unwrap(), first);
    }

    #[test]
    fn resolve_by_name_searches_project() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(root, "src/types/index.ts", "export interface Asset { id: string }\n");
        write(root, "src/deep/nested/thing.ts", "export interface Thing { n: number }\n");
        write(root, "node_modules/lib/index.ts", "export interface Hidden { n: number }\n");
        let mut r = Resolver::new(root);
        assert!(r.resolve_by_name("Asset").unwrap().fields().is_some());
        assert!(r.resolve_by_name("Thing").unwrap().fields().is_some());
        assert!(matches!(r.resolve_by_name("Hidden"), Err(ResolveError::NotFound { .. })));
        assert!(r.misses.contains("Hidden"));
    }

    #[test]
    fn kept_names_are_not_inlined() {
        let src = "interface Money { amount: number; currency: string }\ninterface Item { cost: Money; costs: Money[] }";
        let mut r = Resolver::new("/virtual").keep_named(["money"]);
        let item = r.resolve("Item", src, &here()).unwrap();
        assert_eq!(field(&item, "cost").ty, Ty::named("Money"));
        assert_eq!(field(&item, "costs").ty, Ty::array_of(Ty::named("Money")));
        assert_eq!(r.resolve("Money", src, &here()).unwrap(), Ty::named("Money"));

        let priced = "interface Money { amount: number }\ninterface Priced extends Money { sku: string }";
        let ty = r.resolve("Priced", priced, &here()).unwrap();
        assert_eq!(ty.fields().unwrap().len(), 2);
    }

    #[test]
    fn file_data_type_prefers_mutation_hook() {
        let src = "import { useMutation, useQuery } from '@tanstack/react-query';\n\
                   interface Asset { id: string }\n\
                   export type AssetListResponse = Asset[];\n\
                   export const useList = () => useQuery<AssetListResponse>({});\n\
                   export const useCreate = () => useMutation<Asset, Error, string>({});\n";
        let mut r = Resolver::new("/virtual");
        let ty = r.resolve_file_data_type(src, &here()).unwrap();
        assert_eq!(ty.fields().unwrap()[0].name, "id");
    }

    #[test]
    fn commented_out_hooks_in_jsx_files_are_ignored() {
        let src = "interface Asset { id: string }\n\
                   interface Old { legacy: boolean }\n\
                   export function Page() {\n\
                   \x20 const q = useQuery<Asset>({});\n\
                   \x20 return <p>Don't forget to save</p>;\n\
                   }\n\
                   // const m = useMutation<Old>({});\n";
        let mut r = Resolver::new("/virtual");
        let ty = r.resolve_file_data_type(src, Path::new("/virtual/src/page.tsx")).unwrap();
        assert_eq!(ty.fields().unwrap()[0].name, "id");
    }

    #[test]
    fn file_data_type_fallbacks() {
        let mut r = Resolver::new("/virtual");
        let query = "interface A { id: string }\nexport const q = () => useQuery<A[]>({});";
        assert!(matches!(r.resolve_file_data_type(query, &here()).unwrap(), Ty::Array { .. }));

        let mut r = Resolver::new("/virtual");
        let aliases = "export type Params = { q: string };\nexport type UsersResponse = { total: number };";
        let ty = r.resolve_file_data_type(aliases, &here()).unwrap();
        assert_eq!(ty.fields().unwrap()[0].name, "total");

        let mut r = Resolver::new("/virtual");
        let iface = "export interface Only { flag: boolean }";
        assert_eq!(r.resolve_file_data_type(iface, &here()).unwrap().fields().unwrap()[0].name, "flag");

        let mut r = Resolver::new("/virtual");
        let err = r.resolve_file_data_type("export const x = 1;", &here()).unwrap_err();
        assert!(matches!(err, ResolveError::NoDataType { .. }));
    }
}
