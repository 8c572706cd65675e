pub mod content;
pub mod customization;
pub mod request;
pub mod template;
