//! Binary asset storage backends.

mod local;

pub use local::LocalAssetStorage;
