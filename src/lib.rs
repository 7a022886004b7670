pub mod config;
pub mod contact;
pub mod content;
pub mod logger;
pub mod resume;
pub mod server;
pub mod text_utils;
pub mod util;
mod query_string;
mod view;
#[cfg(test)]
mod test_data;
