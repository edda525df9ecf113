//! This is the library of the PR content labeler bot.
pub mod config;
pub mod github;
pub mod labeler;
pub mod utils;

#[cfg(test)]
mod tests;
