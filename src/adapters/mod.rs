// Adapters layer: concrete page sources for the upstream transfer list.

pub mod file;
pub mod http;

pub use file::FilePageSource;
pub use http::HttpPageSource;
