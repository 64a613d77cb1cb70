//! Primitive function interfaces.

pub mod from_to_function;

pub const PACKAGE: &str = "io.kraton.util.function";

pub const CAT_APPLICATION: &str = "0_Application";
pub const CAT_FACTORIES: &str = "1_Factories";
