pub mod board;
pub mod cache;
pub mod crop;
pub mod enums;
pub mod snapshot;

pub use board::*;
pub use cache::*;
pub use crop::*;
pub use enums::*;
pub use snapshot::*;
