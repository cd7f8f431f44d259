pub mod auth;
pub mod catalog;
pub mod documents;
pub mod imports;
pub mod inventory;
pub mod rbac;
pub mod reports;
pub mod taxpayer;
pub mod tenancy;
pub mod transfers;
