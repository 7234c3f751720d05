pub mod conversion;
pub mod mysql;
pub mod postgresql;
pub mod sqlite;
