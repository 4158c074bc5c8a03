// Application layer - Use cases and the store port
pub mod charge_repository;
pub mod charge_service;
pub mod import_service;
pub mod insights_service;
