// crm-server/src/db/mod.rs

// Declare child modules
pub mod pg;

pub use pg::PgRepository;
