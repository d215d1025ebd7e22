pub mod candle;
pub mod interval;
pub mod symbol;
pub mod timestamp;
