pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{parse_url_line, split_target};
