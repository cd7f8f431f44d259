pub mod auth;
pub mod catalog;
pub mod inventory;
pub mod rbac;
pub mod reports;
pub mod tenancy;
