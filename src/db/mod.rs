pub mod notes;
pub mod seed;
pub mod tenants;
pub mod users;
