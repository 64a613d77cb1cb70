//! Type descriptors used by generated declarations.
//!
//! A [`TypeRef`] is what a field, parameter or return slot refers to. It
//! only carries what rendering needs: a display form and a package for
//! import inference. Primitive types additionally know their boxed form,
//! default literal and bit size, which drives [`cast`] and [`convert`].

use std::fmt;

/// Package whose types never need an import.
pub const JAVA_LANG: &str = "java.lang";

/// Reference to a type as it appears in generated source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A class or interface identified by package and simple name.
    Named {
        simple_name: String,
        package_name: String,
    },
    /// A primitive value type.
    Primitive(PrimitiveType),
    /// A type variable such as `T`.
    Generic(String),
    /// A named base type applied to type arguments, e.g. `List<T>`.
    Parametrized {
        base: Box<TypeRef>,
        args: Vec<TypeRef>,
    },
    /// A wildcard argument: `?`, `? extends T` or `? super T`.
    Wildcard {
        bound: Option<Box<TypeRef>>,
        upper: bool,
    },
    /// The `void` pseudo-type.
    Void,
}

/// The primitive value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Float,
    Long,
    Double,
}

impl PrimitiveType {
    /// All primitive types in declaration order.
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Float,
        PrimitiveType::Long,
        PrimitiveType::Double,
    ];

    /// Keyword used in source, e.g. `int`.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Float => "float",
            PrimitiveType::Long => "long",
            PrimitiveType::Double => "double",
        }
    }

    /// Simple name of the boxed counterpart, e.g. `Integer`.
    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Byte => "Byte",
            PrimitiveType::Short => "Short",
            PrimitiveType::Char => "Character",
            PrimitiveType::Int => "Integer",
            PrimitiveType::Float => "Float",
            PrimitiveType::Long => "Long",
            PrimitiveType::Double => "Double",
        }
    }

    /// The boxed counterpart as a type reference.
    pub fn boxed(self) -> TypeRef {
        TypeRef::named(self.boxed_name(), JAVA_LANG)
    }

    /// Literal of the implicit default value of a field of this type.
    pub fn null_value(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "false",
            PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Int => "0",
            PrimitiveType::Char => "'\\u0000'",
            PrimitiveType::Float => "0F",
            PrimitiveType::Long => "0L",
            PrimitiveType::Double => "0D",
        }
    }

    /// Width used for widening/narrowing comparisons only.
    pub fn bit_size(self) -> u32 {
        match self {
            PrimitiveType::Boolean => 1,
            PrimitiveType::Byte => 8,
            PrimitiveType::Short => 16,
            PrimitiveType::Char | PrimitiveType::Int | PrimitiveType::Float => 32,
            PrimitiveType::Long | PrimitiveType::Double => 64,
        }
    }

    /// Short name used when composing generated type names, e.g. `Int`.
    pub fn abbrev_name(self) -> &'static str {
        match self {
            PrimitiveType::Char => "Char",
            PrimitiveType::Int => "Int",
            other => other.boxed_name(),
        }
    }

    /// Whether this is one of the floating point types.
    pub fn is_floating(self) -> bool {
        matches!(self, PrimitiveType::Float | PrimitiveType::Double)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<PrimitiveType> for TypeRef {
    fn from(value: PrimitiveType) -> Self {
        TypeRef::Primitive(value)
    }
}

impl TypeRef {
    /// Create a reference to a named class or interface.
    pub fn named(simple_name: impl Into<String>, package_name: impl Into<String>) -> Self {
        TypeRef::Named {
            simple_name: simple_name.into(),
            package_name: package_name.into(),
        }
    }

    /// Create a type variable reference.
    pub fn generic(name: impl Into<String>) -> Self {
        TypeRef::Generic(name.into())
    }

    /// Apply `base` to the given type arguments.
    pub fn parametrized(base: TypeRef, args: impl IntoIterator<Item = TypeRef>) -> Self {
        TypeRef::Parametrized {
            base: Box::new(base),
            args: args.into_iter().collect(),
        }
    }

    /// `? extends bound`
    pub fn wildcard_extends(bound: TypeRef) -> Self {
        TypeRef::Wildcard {
            bound: Some(Box::new(bound)),
            upper: true,
        }
    }

    /// `? super bound`
    pub fn wildcard_super(bound: TypeRef) -> Self {
        TypeRef::Wildcard {
            bound: Some(Box::new(bound)),
            upper: false,
        }
    }

    /// Simple name without type arguments.
    pub fn simple_name(&self) -> &str {
        match self {
            TypeRef::Named { simple_name, .. } => simple_name,
            TypeRef::Primitive(p) => p.name(),
            TypeRef::Generic(name) => name,
            TypeRef::Parametrized { base, .. } => base.simple_name(),
            TypeRef::Wildcard { .. } => "?",
            TypeRef::Void => "void",
        }
    }

    /// Package the type lives in.
    ///
    /// Primitives, `void` and type variables report `java.lang` so import
    /// inference skips them.
    pub fn package_name(&self) -> &str {
        match self {
            TypeRef::Named { package_name, .. } => package_name,
            TypeRef::Parametrized { base, .. } => base.package_name(),
            _ => JAVA_LANG,
        }
    }

    /// `package.SimpleName`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.package_name(), self.simple_name())
    }

    /// The primitive type, if this is one.
    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            TypeRef::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Collect every named type referenced by this type, including type
    /// arguments and wildcard bounds.
    pub fn collect_named<'a>(&'a self, out: &mut Vec<&'a TypeRef>) {
        match self {
            TypeRef::Named { .. } => out.push(self),
            TypeRef::Parametrized { base, args } => {
                base.collect_named(out);
                for arg in args {
                    arg.collect_named(out);
                }
            }
            TypeRef::Wildcard {
                bound: Some(bound), ..
            } => bound.collect_named(out),
            _ => {}
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Parametrized { base, args } => {
                write!(f, "{base}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            TypeRef::Wildcard {
                bound: Some(bound),
                upper,
            } => {
                let keyword = if *upper { "extends" } else { "super" };
                write!(f, "? {keyword} {bound}")
            }
            other => f.write_str(other.simple_name()),
        }
    }
}

/// An annotation applied to a declaration or parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// The annotation type.
    pub ty: TypeRef,
    /// Raw parameter list, rendered inside parentheses when non-empty.
    pub parameters: String,
}

impl Annotation {
    /// Create an annotation without parameters.
    pub fn new(ty: TypeRef) -> Self {
        Self {
            ty,
            parameters: String::new(),
        }
    }

    /// Set the raw parameter list.
    pub fn with_parameters(mut self, parameters: impl Into<String>) -> Self {
        self.parameters = parameters.into();
        self
    }

    /// `@Override`
    pub fn overrides() -> Self {
        Self::new(TypeRef::named("Override", JAVA_LANG))
    }

    /// `@FunctionalInterface`
    pub fn functional_interface() -> Self {
        Self::new(TypeRef::named("FunctionalInterface", JAVA_LANG))
    }

    /// `@Deprecated`, optionally with `since` and `forRemoval`.
    pub fn deprecated(since: &str, for_removal: bool) -> Self {
        let mut parameters = Vec::new();
        if !since.is_empty() {
            parameters.push(format!("since = {since}"));
        }
        if for_removal {
            parameters.push("forRemoval = true".to_string());
        }

        Self::new(TypeRef::named("Deprecated", JAVA_LANG)).with_parameters(parameters.join(", "))
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.ty)?;
        if !self.parameters.is_empty() {
            write!(f, "({})", self.parameters)?;
        }
        Ok(())
    }
}

/// The narrower of two primitives.
pub fn smaller(alpha: PrimitiveType, beta: PrimitiveType) -> PrimitiveType {
    if alpha.bit_size() < beta.bit_size() {
        alpha
    } else {
        beta
    }
}

/// The wider of two primitives.
pub fn larger(alpha: PrimitiveType, beta: PrimitiveType) -> PrimitiveType {
    if alpha.bit_size() > beta.bit_size() {
        alpha
    } else {
        beta
    }
}

/// Numeric cast from `from` to `to` applied to the expression `value`.
///
/// Widening between primitives is implicit and yields `value` unchanged;
/// narrowing yields `(to) value`. Non-primitive casts are always explicit.
pub fn cast(from: &TypeRef, to: &TypeRef, value: &str) -> String {
    match (from, to) {
        (TypeRef::Primitive(from), TypeRef::Primitive(to)) => cast_primitive(*from, *to, value),
        _ => format!("({to}) {value}"),
    }
}

/// Value conversion from `from` to `to` applied to the expression `value`.
///
/// Unlike [`cast`], floating point values are reinterpreted bit for bit
/// and booleans are encoded as `1` or the target's default literal.
pub fn convert(from: &TypeRef, to: &TypeRef, value: &str) -> String {
    match (from, to) {
        (TypeRef::Primitive(from), TypeRef::Primitive(to)) => {
            convert_primitive(*from, *to, value)
        }
        _ => cast(from, to, value),
    }
}

fn requires_cast(from: PrimitiveType, to: PrimitiveType) -> bool {
    use PrimitiveType::*;

    match to {
        Byte => matches!(from, Short | Int | Char | Long),
        Short => matches!(from, Int | Char | Long),
        Int => matches!(from, Long | Float | Double),
        Char => matches!(from, Byte | Short | Int | Long | Float | Double),
        Long => matches!(from, Float | Double),
        Float => matches!(from, Double),
        Boolean | Double => false,
    }
}

fn cast_primitive(from: PrimitiveType, to: PrimitiveType, value: &str) -> String {
    if requires_cast(from, to) {
        format!("({to}) {value}")
    } else {
        value.to_string()
    }
}

fn convert_primitive(from: PrimitiveType, to: PrimitiveType, value: &str) -> String {
    use PrimitiveType::*;

    match (from, to) {
        (Boolean, Byte | Short | Int | Float | Double | Long) => {
            cast_primitive(Int, to, &format!("({value} ? 1 : {})", to.null_value()))
        }
        (Boolean, Char) => format!("{value} ? '\\u0001' : {}", to.null_value()),
        (Float, Byte | Short) => {
            convert_primitive(Int, to, &format!("Float.floatToRawIntBits({value})"))
        }
        (Float, Int | Long) => format!("Float.floatToRawIntBits({value})"),
        (Double, Byte | Short | Int) => {
            convert_primitive(Long, to, &format!("Double.doubleToRawLongBits({value})"))
        }
        (Double, Long) => format!("Double.doubleToRawLongBits({value})"),
        (_, Boolean) => format!("{value} != {}", from.null_value()),
        (Byte | Short | Int | Char, Float) => format!("Float.intBitsToFloat({value})"),
        (Byte | Short | Int | Char | Long, Double) => format!("Double.longBitsToDouble({value})"),
        _ => cast_primitive(from, to, value),
    }
}
