pub mod config;
pub mod parse;
pub mod regimen;
pub mod run;
