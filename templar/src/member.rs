//! Members of a generated type body and the order they are laid out in.
//!
//! Every member carries a category tag of the form `<digits>_<label>`. The
//! numeric prefix decides the section a member lands in, the label becomes
//! the section header, and within a section fields precede methods, which
//! precede nested types. Ties are broken by name and then by insertion
//! order, so overloaded methods keep the order they were declared in.

use std::cmp::Ordering;

use bitflags::bitflags;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RenderError;
use crate::target::TypeDecl;
use crate::types::{Annotation, TypeRef};

static CATEGORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)_(.*)$").expect("category pattern is valid"));

bitflags! {
    /// Declaration modifiers.
    ///
    /// Which combinations are legal depends on the declaration context and
    /// is decided by the emitter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const ABSTRACT = 1 << 3;
        const STATIC = 1 << 4;
        const FINAL = 1 << 5;
        const TRANSIENT = 1 << 6;
        const VOLATILE = 1 << 7;
        const SYNCHRONIZED = 1 << 8;
        const NATIVE = 1 << 9;
        const STRICTFP = 1 << 10;
    }
}

/// A parsed category tag.
///
/// Categories sort by the numeric value of their prefix, however long, then
/// by label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    /// Decimal section prefix without leading zeros (`"0"` for zero).
    pub order: String,
    /// Section header text; may be empty.
    pub label: String,
}

impl Category {
    /// Parse a raw category tag.
    ///
    /// An empty tag means "uncategorised" and yields `None`. Anything else
    /// must match `<digits>_<label>`.
    pub fn parse(raw: &str, member: &str) -> Result<Option<Category>, RenderError> {
        if raw.is_empty() {
            return Ok(None);
        }

        let captures = CATEGORY
            .captures(raw)
            .ok_or_else(|| RenderError::malformed_category(raw, member))?;
        let digits = captures[1].trim_start_matches('0');
        let order = if digits.is_empty() { "0" } else { digits };

        Ok(Some(Category {
            order: order.to_string(),
            label: captures[2].to_string(),
        }))
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order
            .len()
            .cmp(&other.order.len())
            .then_with(|| self.order.cmp(&other.order))
            .then_with(|| self.label.cmp(&other.label))
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Coarse ordering class of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weight {
    Field,
    Method,
    NestedType,
}

/// A field declaration.
#[derive(Debug, Clone)]
pub struct Field {
    pub ty: TypeRef,
    pub name: String,
    /// Initializer expression, if any.
    pub value: Option<String>,
    pub modifiers: Modifiers,
    pub category: String,
    pub documentation: String,
    pub since: String,
    pub see: Vec<String>,
    pub annotations: Vec<Annotation>,
}

impl Field {
    /// Create a field without modifiers or documentation.
    pub fn new(ty: impl Into<TypeRef>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            value: None,
            modifiers: Modifiers::empty(),
            category: String::new(),
            documentation: String::new(),
            since: String::new(),
            see: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn documented(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    pub fn since(mut self, since: impl Into<String>) -> Self {
        self.since = since.into();
        self
    }

    pub fn see(mut self, reference: impl Into<String>) -> Self {
        self.see.push(reference.into());
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A method parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub ty: TypeRef,
    pub name: String,
    pub documentation: String,
    pub annotations: Vec<Annotation>,
}

impl Parameter {
    pub fn new(
        ty: impl Into<TypeRef>,
        name: impl Into<String>,
        documentation: impl Into<String>,
    ) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            documentation: documentation.into(),
            annotations: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A type parameter of a type or method, e.g. `<T extends Number>`.
#[derive(Debug, Clone)]
pub struct TypeParameter {
    pub name: String,
    pub bound: Option<TypeRef>,
    pub documentation: String,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>, documentation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bound: None,
            documentation: documentation.into(),
        }
    }

    pub fn bounded(mut self, bound: TypeRef) -> Self {
        self.bound = Some(bound);
        self
    }

    /// The type variable this parameter declares.
    pub fn as_type(&self) -> TypeRef {
        TypeRef::generic(self.name.clone())
    }
}

/// A method or constructor declaration.
#[derive(Debug, Clone)]
pub struct Method {
    /// Return type; `None` declares a constructor.
    pub return_type: Option<TypeRef>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub type_parameters: Vec<TypeParameter>,
    pub modifiers: Modifiers,
    /// Method body without surrounding braces; `None` declares no body.
    pub body: Option<String>,
    pub category: String,
    pub documentation: String,
    pub return_doc: String,
    /// Documented failure conditions as `(exception type, description)`.
    pub throws: Vec<(TypeRef, String)>,
    pub see: Vec<String>,
    pub since: String,
    pub annotations: Vec<Annotation>,
}

impl Method {
    /// Create a method returning `return_type`.
    pub fn new(return_type: impl Into<TypeRef>, name: impl Into<String>) -> Self {
        Self::with_return(Some(return_type.into()), name.into())
    }

    /// Create a constructor; `name` must be the enclosing type's name.
    pub fn constructor(name: impl Into<String>) -> Self {
        Self::with_return(None, name.into())
    }

    fn with_return(return_type: Option<TypeRef>, name: String) -> Self {
        Self {
            return_type,
            name,
            parameters: Vec::new(),
            type_parameters: Vec::new(),
            modifiers: Modifiers::empty(),
            body: None,
            category: String::new(),
            documentation: String::new(),
            return_doc: String::new(),
            throws: Vec::new(),
            see: Vec::new(),
            since: String::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn type_param(mut self, parameter: TypeParameter) -> Self {
        self.type_parameters.push(parameter);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn documented(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    pub fn returns(mut self, return_doc: impl Into<String>) -> Self {
        self.return_doc = return_doc.into();
        self
    }

    pub fn throws(mut self, exception: TypeRef, condition: impl Into<String>) -> Self {
        self.throws.push((exception, condition.into()));
        self
    }

    pub fn see(mut self, reference: impl Into<String>) -> Self {
        self.see.push(reference.into());
        self
    }

    pub fn since(mut self, since: impl Into<String>) -> Self {
        self.since = since.into();
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Whether this declares a constructor.
    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }
}

/// One entry of a type body.
#[derive(Debug, Clone)]
pub enum Member {
    Field(Field),
    Method(Method),
    Type(Box<TypeDecl>),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Field(field) => &field.name,
            Member::Method(method) => &method.name,
            Member::Type(decl) => &decl.name,
        }
    }

    /// The raw category tag.
    pub fn category(&self) -> &str {
        match self {
            Member::Field(field) => &field.category,
            Member::Method(method) => &method.category,
            Member::Type(decl) => &decl.category,
        }
    }

    pub fn weight(&self) -> Weight {
        match self {
            Member::Field(_) => Weight::Field,
            Member::Method(_) => Weight::Method,
            Member::Type(_) => Weight::NestedType,
        }
    }
}

impl From<Field> for Member {
    fn from(value: Field) -> Self {
        Member::Field(value)
    }
}

impl From<Method> for Member {
    fn from(value: Method) -> Self {
        Member::Method(value)
    }
}

impl From<TypeDecl> for Member {
    fn from(value: TypeDecl) -> Self {
        Member::Type(Box::new(value))
    }
}

/// A member together with its parsed category, in layout order.
#[derive(Debug, Clone)]
pub struct OrderedMember<'a> {
    pub member: &'a Member,
    pub category: Option<Category>,
    index: usize,
}

impl OrderedMember<'_> {
    /// The section label, empty when uncategorised.
    pub fn label(&self) -> &str {
        self.category.as_ref().map_or("", |c| c.label.as_str())
    }
}

/// Total order of a type body: category, weight, name, insertion index.
pub fn compare_members(a: &OrderedMember<'_>, b: &OrderedMember<'_>) -> Ordering {
    a.category
        .cmp(&b.category)
        .then_with(|| a.member.weight().cmp(&b.member.weight()))
        .then_with(|| a.member.name().cmp(b.member.name()))
        .then_with(|| a.index.cmp(&b.index))
}

/// Sort a type body into layout order.
///
/// Fails on the first malformed category. Fields and nested types that
/// share category and name with an earlier member are dropped; methods are
/// never dropped, so overloads survive in declaration order.
pub fn order_members(members: &[Member]) -> Result<Vec<OrderedMember<'_>>, RenderError> {
    let mut ordered = members
        .iter()
        .enumerate()
        .map(|(index, member)| {
            Ok(OrderedMember {
                member,
                category: Category::parse(member.category(), member.name())?,
                index,
            })
        })
        .collect::<Result<Vec<_>, RenderError>>()?;

    ordered.sort_by(compare_members);

    ordered.dedup_by(|later, earlier| {
        let duplicate = later.member.weight() != Weight::Method
            && later.member.weight() == earlier.member.weight()
            && later.category == earlier.category
            && later.member.name() == earlier.member.name();
        if duplicate {
            tracing::warn!(
                member = later.member.name(),
                category = later.member.category(),
                "dropping duplicate member declaration"
            );
        }
        duplicate
    });

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveType;

    fn field(name: &str, category: &str) -> Member {
        Field::new(PrimitiveType::Int, name).in_category(category).into()
    }

    fn method(name: &str, category: &str) -> Member {
        Method::new(TypeRef::Void, name).in_category(category).into()
    }

    fn names(ordered: &[OrderedMember<'_>]) -> Vec<String> {
        ordered.iter().map(|m| m.member.name().to_string()).collect()
    }

    #[test]
    fn test_parse_category() {
        let category = Category::parse("1_State", "x").unwrap().unwrap();
        assert_eq!(category.order, "1");
        assert_eq!(category.label, "State");

        let unlabeled = Category::parse("3_", "x").unwrap().unwrap();
        assert_eq!(unlabeled.label, "");

        assert!(Category::parse("", "x").unwrap().is_none());
    }

    #[test]
    fn test_long_numeric_prefix_is_accepted() {
        let huge = Category::parse("99999999999999999999_Huge", "x").unwrap().unwrap();
        let small = Category::parse("007_Small", "x").unwrap().unwrap();
        assert_eq!(small.order, "7");
        assert_eq!(Category::parse("000_Zero", "x").unwrap().unwrap().order, "0");
        assert!(small < huge);

        let members = vec![field("late", "99999999999999999999_Huge"), field("early", "10_X")];
        let ordered = order_members(&members).unwrap();
        assert_eq!(names(&ordered), vec!["early", "late"]);
    }

    #[test]
    fn test_malformed_category_is_an_error() {
        for raw in ["State", "_State", "x_State", "1State"] {
            let result = Category::parse(raw, "member");
            assert!(
                matches!(result, Err(RenderError::MalformedCategory { .. })),
                "expected failure for {raw:?}"
            );
        }
    }

    #[test]
    fn test_order_by_category_then_weight_then_name() {
        let members = vec![
            method("reset", "1_State"),
            field("value", "1_State"),
            field("INITIAL", "0_Constants"),
            field("alpha", "1_State"),
        ];

        let ordered = order_members(&members).unwrap();
        assert_eq!(names(&ordered), vec!["INITIAL", "alpha", "value", "reset"]);
    }

    #[test]
    fn test_uncategorised_members_come_first() {
        let members = vec![method("b", "0_First"), method("a", "")];
        let ordered = order_members(&members).unwrap();
        assert_eq!(names(&ordered), vec!["a", "b"]);
    }

    #[test]
    fn test_numeric_prefix_orders_numerically() {
        let members = vec![method("late", "10_Late"), method("early", "2_Early")];
        let ordered = order_members(&members).unwrap();
        assert_eq!(names(&ordered), vec!["early", "late"]);
    }

    #[test]
    fn test_overloads_are_kept_in_declaration_order() {
        let members = vec![
            Method::new(TypeRef::Void, "add")
                .param(Parameter::new(PrimitiveType::Int, "second", ""))
                .into(),
            Method::new(TypeRef::Void, "add")
                .param(Parameter::new(PrimitiveType::Long, "first", ""))
                .into(),
        ];

        let ordered = order_members(&members).unwrap();
        assert_eq!(ordered.len(), 2);
        match ordered[0].member {
            Member::Method(m) => assert_eq!(m.parameters[0].name, "second"),
            _ => panic!("expected method"),
        }
    }

    #[test]
    fn test_duplicate_fields_collapse_to_first() {
        let members = vec![
            Field::new(PrimitiveType::Int, "value").into(),
            Field::new(PrimitiveType::Long, "value").into(),
        ];

        let ordered = order_members(&members).unwrap();
        assert_eq!(ordered.len(), 1);
        match ordered[0].member {
            Member::Field(f) => assert_eq!(f.ty, TypeRef::Primitive(PrimitiveType::Int)),
            _ => panic!("expected field"),
        }
    }

    #[test]
    fn test_malformed_category_fails_ordering() {
        let members = vec![field("ok", "0_Fine"), field("bad", "Broken")];
        assert!(order_members(&members).is_err());
    }
}
