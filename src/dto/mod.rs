pub mod batch_dto;
pub mod envelope_dto;
pub mod resume_dto;
pub mod session_dto;
