pub mod clear_db;
pub mod initdb;
pub mod migrate_and_serve;
pub mod serve;

pub use clear_db::clear_database;
pub use initdb::init_database;
pub use migrate_and_serve::migrate_and_serve;
pub use serve::serve;
