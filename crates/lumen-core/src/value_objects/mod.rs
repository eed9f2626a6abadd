//! Value objects - identifier and text-extraction types

mod snowflake;
mod tokenized;

pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
pub use tokenized::TokenizedText;
