pub mod create_admin;
pub mod initdb;
pub mod migrate_and_serve;
pub mod serve;

pub use create_admin::{create_admin, AdminAccount};
pub use initdb::init_database;
pub use migrate_and_serve::migrate_and_serve;
pub use serve::serve;
