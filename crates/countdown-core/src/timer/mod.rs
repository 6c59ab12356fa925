mod duration;
mod engine;
mod ticker;

pub use duration::{
    format_mmss, parse_preset_secs, DurationInput, MAX_DURATION_SECS, MAX_MINUTES, MAX_SECONDS,
};
pub use engine::{CountdownEngine, Phase, ZERO_DURATION_MESSAGE};
pub use ticker::{Ticker, TICK_PERIOD};
