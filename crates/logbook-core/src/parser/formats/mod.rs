pub mod bracket;
pub mod json_line;
