// Shared infrastructure: configuration, identifier validation and lookup
// history persistence.

pub mod battle_tag;
pub mod config;
pub mod db;
