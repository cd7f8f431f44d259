pub mod auth;
pub mod catalog_service;
pub mod document_service;
pub mod import_service;
pub mod inventory_service;
pub mod rbac_service;
pub mod report_service;
pub mod tenancy_service;
pub mod transfer_service;
