pub mod csv;
pub mod error;
pub mod http;
pub mod object_store;
pub mod source;
