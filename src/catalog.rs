mod builtin;
pub mod model;
