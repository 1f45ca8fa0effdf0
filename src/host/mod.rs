pub mod host_bridge;
pub mod window_registry;
