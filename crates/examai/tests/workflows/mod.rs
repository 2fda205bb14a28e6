use super::*;

mod custom_source;
mod scrape_and_store;
