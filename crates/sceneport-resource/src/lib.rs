mod archive;
mod cache;
mod key;

pub use cache::{ResourceCache, ResourceError};
pub use key::{KeyError, ResourceKey};
