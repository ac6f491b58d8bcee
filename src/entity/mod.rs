pub mod admin_profiles;
pub mod audit_logs;
pub mod clients;
pub mod products;
pub mod reviews;
pub mod visits;

pub use admin_profiles::Entity as AdminProfiles;
pub use audit_logs::Entity as AuditLogs;
pub use clients::Entity as Clients;
pub use products::Entity as Products;
pub use reviews::Entity as Reviews;
pub use visits::Entity as Visits;
