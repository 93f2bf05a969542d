// Application layer - Use cases and the ports they depend on
pub mod document_writer;
pub mod event_repository;
pub mod report_service;
