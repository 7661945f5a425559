pub mod chain;
pub mod result;
pub mod ticker;

pub use chain::{ChainSnapshot, OptionChain, OptionContract, Quote};
pub use result::AnalysisResult;
pub use ticker::{OptionType, TickerConfig};
