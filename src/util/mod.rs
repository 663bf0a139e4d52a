pub mod codeblock;
pub mod fresh;
pub mod hangul;
pub mod parse;
pub mod time;
