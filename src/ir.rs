// Type descriptions shared by the resolver and the synthesizer. No source text here.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Ty {
    Object {
        fields: Vec<Field>,  // declaration order
    },
    Array {
        element: Box<Ty>,
    },
    Union(Vec<Ty>),          // non-empty, one option picked per synthesis
    Primitive(Prim),
    Literal(Value),          // 'active', 42, true, enum members
    Named(String),           // opaque: unresolved, unsupported, or a cycle back-edge
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prim {
    String,
    Number,
    Boolean,
    Date,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Ty,
    pub optional: bool,      // `name?:`
    pub nullable: bool,      // `T | null`
}

impl Ty {
    pub fn named(name: impl Into<String>) -> Self { Ty::Named(name.into()) }

    pub fn array_of(element: Ty) -> Self { Ty::Array { element: Box::new(element) } }

    /// Single-option unions collapse to the option itself.
    pub fn union_of(mut options: Vec<Ty>) -> Self {
        if options.len() == 1 { options.remove(0) } else { Ty::Union(options) }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Ty::Primitive(_) | Ty::Named(_))
    }

    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Ty::Object { fields } => Some(fields),
            _ => None,
        }
    }
}

impl Field {
    pub fn required(name: impl Into<String>, ty: Ty) -> Self {
        Self { name: name.into(), ty, optional: false, nullable: false }
    }
}
