pub mod attendance;
pub mod files;
pub mod reference;
