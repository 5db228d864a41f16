pub mod gateway;
pub mod http_helpers;
pub mod json_extract;
pub mod quiz_service;
pub mod tool_service;
pub mod upload;
pub mod usage_service;
