/*!
 * Common test utilities for the subsieve test suite
 */

use serde_json::{json, Value};
use std::sync::Arc;

use subsieve::app_config::Config;
use subsieve::{MockFetcher, PageFetcher, ReconciliationPipeline};

pub const CATALOG: &str = "https://catalog.test";
pub const INDEX: &str = "https://subs.test/api";
pub const API_KEY: &str = "test-key";

/// Route library logs to the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Wrap a state value the way the catalog embeds it
pub fn next_data_page(state: &Value) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>Catalog</title></head><body><div id=\"__next\"></div>\
         <script id=\"__NEXT_DATA__\" type=\"application/json\">{}</script>\
         <script src=\"/_next/static/chunks/main.js\"></script></body></html>",
        state
    )
}

/// State of a search page
pub fn search_state(data: Value) -> Value {
    json!({"props": {"pageProps": {"data": data}}, "page": "/search"})
}

/// State of a title page
pub fn title_state(data: Value) -> Value {
    json!({"props": {"pageProps": {"data": data}}, "page": "/anime/[id]"})
}

/// State of a watch page
pub fn episode_state(episode: Value, anime: Value) -> Value {
    json!({"props": {"pageProps": {"episode": episode, "animeData": anime}}, "page": "/watch/[id]"})
}

/// One search result as the catalog lists it
pub fn catalog_entry(title: &str, link: &str, anilist: Option<u32>) -> Value {
    let mut entry = json!({
        "title": title,
        "link": link,
        "posterImage": {"original": format!("https://img.test/{}.jpg", link)}
    });
    if let Some(id) = anilist {
        entry["mappings"] = json!({"anilist": id});
    }
    entry
}

/// One subtitle index entry
pub fn index_entry(id: u32, name: &str, anilist: Option<u32>) -> Value {
    json!({"id": id, "name": name, "anilist_id": anilist})
}

pub fn entries_url() -> String {
    format!("{}/entries/search?anime=true", INDEX)
}

pub fn entries_by_id_url(id: u32) -> String {
    format!("{}/entries/search?anime=true&anilist_id={}", INDEX, id)
}

pub fn entries_by_title_url(encoded_title: &str) -> String {
    format!("{}/entries/search?anime=true&query={}", INDEX, encoded_title)
}

pub fn files_url(entry_id: u32) -> String {
    format!("{}/entries/{}/files", INDEX, entry_id)
}

/// Configuration pointing at the test hosts
pub fn test_config(title_fallback: bool) -> Config {
    let mut config = Config::default();
    config.catalog.base_url = CATALOG.to_string();
    config.subtitle_index.endpoint = INDEX.to_string();
    config.subtitle_index.api_key = API_KEY.to_string();
    config.matching.title_fallback = title_fallback;
    config
}

/// Pipeline over a mock fetcher; the fetcher is returned for request assertions
pub fn create_pipeline(fetcher: MockFetcher, title_fallback: bool) -> (Arc<MockFetcher>, ReconciliationPipeline) {
    init_logging();
    let fetcher = Arc::new(fetcher);
    let shared: Arc<dyn PageFetcher> = fetcher.clone();
    let pipeline = ReconciliationPipeline::from_config(shared, &test_config(title_fallback));
    (fetcher, pipeline)
}
