//! Primitive specialisations of the observable value interfaces.

pub mod observable_value;
pub mod writable_value;

pub const PACKAGE: &str = "io.kraton.bean.value";

/// Package of the change listener types.
pub const CHANGE_PACKAGE: &str = "io.kraton.bean.value.change";

pub const CAT_VALUE_OPS: &str = "1_Value Operations";
pub const CAT_LISTENERS: &str = "2_Listeners";
