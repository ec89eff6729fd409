// Audio playback module
// One shared cue player per session, rebound between lookups

pub mod player;

pub use player::{CuePlayer, CueSource};
