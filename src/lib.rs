pub mod filter;
pub mod loader;
pub mod mcp;
pub mod model;
pub mod selection;
pub mod source;
