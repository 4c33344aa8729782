pub mod cms;
pub mod config;
