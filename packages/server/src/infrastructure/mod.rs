//! Infrastructure layer: wire protocol, DTOs and storage implementations.

pub mod dto;
pub mod protocol;
pub mod repository;
