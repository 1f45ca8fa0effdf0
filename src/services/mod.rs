pub mod intake_service;
pub mod notification_service;
pub mod resume_api_service;
pub mod session_service;
