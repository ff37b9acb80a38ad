// src/db/mod.rs
//! SQLCipher-backed store of document pointers and key history
pub mod documents_db_conn;
pub mod documents_db_ops;

pub use documents_db_conn::open_documents_db;
pub use documents_db_ops::*;
