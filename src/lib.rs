pub mod config;
pub mod logger;
pub mod text_utils;
pub mod i18n;
pub mod storage;
pub mod content;
pub mod post_list;
pub mod post_index;
pub mod paginator;
pub mod view;
pub mod comments;
#[cfg(test)]
mod test_data;
