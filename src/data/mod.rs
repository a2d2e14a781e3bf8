pub mod loader;
pub mod parse;
pub mod types;

pub use loader::{load_spot_history, read_spot_history, LoaderError};
pub use parse::{clean_numeric, parse_timestamp};
pub use types::{MarketRow, OptionType, SpotBar};
