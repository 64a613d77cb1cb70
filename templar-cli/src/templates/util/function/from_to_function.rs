//! `<From>To<To>Function`: primitive specialisations of a one-argument
//! function, for every pair of value types.

use templar::{
    convert, Annotation, Method, Modifiers, Parameter, PrimitiveType, Profile, Target, TypeDecl,
    TypeRef,
};

use super::{CAT_APPLICATION, CAT_FACTORIES, PACKAGE};
use crate::templates::{type_name, AUTHOR, COPYRIGHT_HEADER, MODULE_BASE, VALUE_TYPES, VERSION};

pub const UNIT: &str = "util.function.from_to_function";

/// The function interface converting `from` to `to`.
pub fn type_ref(from: PrimitiveType, to: PrimitiveType) -> TypeRef {
    TypeRef::named(name(from, to), PACKAGE)
}

fn name(from: PrimitiveType, to: PrimitiveType) -> String {
    type_name(&[from.name(), "to", to.name(), "function"])
}

pub fn profile() -> Profile {
    let mut profile = Profile::new("FromToFunction");
    for &from in &VALUE_TYPES {
        for &to in &VALUE_TYPES {
            profile = profile.target(target(from, to));
        }
    }
    profile
}

fn target(from: PrimitiveType, to: PrimitiveType) -> Target {
    let name = name(from, to);
    let conversion = convert(&TypeRef::from(from), &TypeRef::from(to), "t");

    let decl = TypeDecl::interface(name.as_str())
        .with_modifiers(Modifiers::PUBLIC)
        .annotated(Annotation::functional_interface())
        .documented(format!(
            "A function converting an {{@code {from}}} to {{@code {to}}}."
        ))
        .author(AUTHOR)
        .since(VERSION)
        .member(
            Method::new(to, "apply")
                .documented("Applies this function to the given argument.")
                .param(Parameter::new(from, "t", "the function argument"))
                .returns("the function result")
                .since(VERSION)
                .in_category(CAT_APPLICATION),
        )
        .member(
            Method::new(type_ref(from, to), "converting")
                .with_modifiers(Modifiers::STATIC)
                .documented(format!(
                    "Returns a function that converts its argument to {{@code {to}}}.\n\n\
                     Floating point values are reinterpreted bit for bit rather than rounded."
                ))
                .returns(format!("a converting {{@code {name}}}"))
                .since(VERSION)
                .with_body(format!("return t -> {conversion};"))
                .in_category(CAT_FACTORIES),
        );

    Target::java(MODULE_BASE, PACKAGE, decl).with_header(COPYRIGHT_HEADER)
}
