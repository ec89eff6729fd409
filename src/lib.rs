// Pokedex - terminal creature lookup with cry playback
// Module declarations
pub mod api;
pub mod audio;
pub mod deeplink;
pub mod error;
pub mod lookup;

pub use error::LookupError;
