pub mod coin;
pub mod justified;
pub mod partition;
pub mod sizer;

pub use coin::{CoinFlip, FixedCoin, RandomCoin, ScriptedCoin};
pub use justified::JustifiedLayout;
pub use partition::{partition, Partitioner};
pub use sizer::size_row;
