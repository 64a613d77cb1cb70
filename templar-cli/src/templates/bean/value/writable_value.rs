//! `Writable<Type>Value`: an observable value that can be set.

use templar::{Method, Modifiers, Parameter, PrimitiveType, Profile, Target, TypeDecl, TypeRef};

use super::{observable_value, CAT_VALUE_OPS, PACKAGE};
use crate::templates::{type_name, AUTHOR, COPYRIGHT_HEADER, MODULE_BASE, VALUE_TYPES, VERSION};

pub const UNIT: &str = "bean.value.writable_value";

/// The writable value interface for `ty`.
pub fn type_ref(ty: PrimitiveType) -> TypeRef {
    TypeRef::named(name(ty), PACKAGE)
}

fn name(ty: PrimitiveType) -> String {
    type_name(&["writable", ty.name(), "value"])
}

pub fn profile() -> Profile {
    VALUE_TYPES
        .iter()
        .fold(Profile::new("WritableValue"), |profile, &ty| {
            profile.target(target(ty))
        })
}

fn target(ty: PrimitiveType) -> Target {
    let name = name(ty);

    let decl = TypeDecl::interface(name.as_str())
        .with_modifiers(Modifiers::PUBLIC)
        .implements(TypeRef::parametrized(
            TypeRef::named("WritableValue", PACKAGE),
            [ty.boxed()],
        ))
        .implements(observable_value::type_ref(ty))
        .documented(format!("A writable {{@code {ty}}} value."))
        .author(AUTHOR)
        .since(VERSION)
        .member(
            Method::new(ty, "set")
                .documented(format!("Sets the value of this {{@link {name}}}."))
                .param(Parameter::new(ty, "value", "the new value"))
                .returns(format!("the previous value of this {{@code {name}}}"))
                .since(VERSION)
                .in_category(CAT_VALUE_OPS),
        );

    Target::java(MODULE_BASE, PACKAGE, decl).with_header(COPYRIGHT_HEADER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use templar::Renderer;

    #[test]
    fn test_rendered_interface() {
        let text = Renderer::default()
            .render(&target(PrimitiveType::Double))
            .unwrap();

        assert!(text.contains(
            "public interface WritableDoubleValue extends WritableValue<Double>, ObservableDoubleValue {"
        ));
        assert!(text.contains("     * @param value the new value\n"));
        assert!(text.contains("     * @return the previous value of this {@code WritableDoubleValue}\n"));
        assert!(text.contains("    double set(double value);\n"));
        assert!(!text.contains("import "));
    }
}
