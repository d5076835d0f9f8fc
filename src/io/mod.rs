pub mod compression;
pub mod csv;
pub mod fetch;
pub mod json;
pub mod source;
