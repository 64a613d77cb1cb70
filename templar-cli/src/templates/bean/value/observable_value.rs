//! `Observable<Type>Value`: a read-only value that notifies listeners.

use templar::doc::INHERIT_DOC;
use templar::types::JAVA_LANG;
use templar::{
    Annotation, Import, Method, Modifiers, Parameter, PrimitiveType, Profile, Target, TypeDecl,
    TypeRef,
};

use super::{writable_value, CAT_LISTENERS, CAT_VALUE_OPS, CHANGE_PACKAGE, PACKAGE};
use crate::templates::{type_name, AUTHOR, COPYRIGHT_HEADER, MODULE_BASE, VALUE_TYPES, VERSION};

pub const UNIT: &str = "bean.value.observable_value";

/// The observable value interface for `ty`.
pub fn type_ref(ty: PrimitiveType) -> TypeRef {
    TypeRef::named(name(ty), PACKAGE)
}

/// The primitive change listener for `ty`.
pub fn change_listener(ty: PrimitiveType) -> TypeRef {
    TypeRef::named(type_name(&[ty.name(), "change", "listener"]), CHANGE_PACKAGE)
}

fn name(ty: PrimitiveType) -> String {
    type_name(&["observable", ty.name(), "value"])
}

pub fn profile() -> Profile {
    VALUE_TYPES
        .iter()
        .fold(Profile::new("ObservableValue"), |profile, &ty| {
            profile.target(target(ty))
        })
}

fn target(ty: PrimitiveType) -> Target {
    let name = name(ty);
    let listener = change_listener(ty);
    let listener_name = listener.simple_name().to_string();
    let null_pointer = TypeRef::named("NullPointerException", JAVA_LANG);

    let decl = TypeDecl::interface(name.as_str())
        .with_modifiers(Modifiers::PUBLIC)
        .implements(TypeRef::parametrized(
            TypeRef::named("ObservableValue", PACKAGE),
            [ty.boxed()],
        ))
        .documented(format!("An observable {{@code {ty}}} value."))
        .see(writable_value::type_ref(ty).simple_name())
        .author(AUTHOR)
        .since(VERSION)
        .member(
            Method::new(ty, "get")
                .documented(format!("Returns the value of this {{@link {name}}}."))
                .returns(format!("the value of this {{@code {name}}}"))
                .since(VERSION)
                .in_category(CAT_VALUE_OPS),
        )
        .member(
            Method::new(ty.boxed(), "getValue")
                .annotated(Annotation::overrides())
                .documented(INHERIT_DOC)
                .since(VERSION)
                .with_body("return this.get();")
                .in_category(CAT_VALUE_OPS),
        )
        .member(
            Method::new(TypeRef::Void, "addListener")
                .documented(
                    "Attaches the specified listener to this {@link ObservableValue}.\n\n\
                     As long as the listener is attached it will be notified whenever the value \
                     of this {@code ObservableValue} changes.",
                )
                .param(Parameter::new(
                    listener.clone(),
                    "listener",
                    "the listener to be attached to this {@code ObservableValue}",
                ))
                .throws(null_pointer.clone(), "if {@code listener} is {@code null}")
                .see(format!("#removeListener({listener_name})"))
                .since(VERSION)
                .in_category(CAT_LISTENERS),
        )
        .member(
            Method::new(TypeRef::Void, "addListener")
                .annotated(Annotation::overrides())
                .documented(INHERIT_DOC)
                .param(Parameter::new(
                    TypeRef::parametrized(
                        TypeRef::named("ChangeListener", CHANGE_PACKAGE),
                        [TypeRef::wildcard_super(ty.boxed())],
                    ),
                    "listener",
                    "",
                ))
                .see(format!("#addListener({listener_name})"))
                .since(VERSION)
                .with_body(format!("this.addListener({listener_name}.wrap(listener));"))
                .in_category(CAT_LISTENERS),
        )
        .member(
            Method::new(TypeRef::Void, "removeListener")
                .documented("Detaches the specified listener from this value.")
                .param(Parameter::new(
                    listener,
                    "listener",
                    "the listener to be detached from this value",
                ))
                .throws(null_pointer, "if {@code listener} is {@code null}")
                .see(format!("#addListener({listener_name})"))
                .since(VERSION)
                .in_category(CAT_LISTENERS),
        );

    Target::java(MODULE_BASE, PACKAGE, decl)
        .with_header(COPYRIGHT_HEADER)
        .import(Import::wildcard(CHANGE_PACKAGE))
}
