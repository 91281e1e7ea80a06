pub mod files;
pub mod html;
