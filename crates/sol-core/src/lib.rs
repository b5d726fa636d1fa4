pub mod correction;
pub mod export;
pub mod flags;
pub mod graph;
pub mod locale;
pub mod matching;
pub mod pattern;
pub mod payload;
pub mod settings;
pub mod solution;
pub mod unicode;
