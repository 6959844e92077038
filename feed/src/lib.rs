pub mod export;
pub mod parser;
pub mod replay;
pub mod wire;
