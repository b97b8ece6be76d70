mod sql;

pub use sql::SqlContentStore;
