pub mod cmd_decode;
pub mod cmd_render;
pub mod cmd_versions;
pub mod common;
