pub mod entities;
pub mod error;
pub mod value_objects;
