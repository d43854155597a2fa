/*!
 * Integration tests for title details
 */

use serde_json::json;
use subsieve::{MockFetcher, TitleDetails};

use crate::common::{create_pipeline, next_data_page, title_state};

const TITLE_URL: &str = "https://catalog.test/anime/frieren";

#[tokio::test]
async fn test_details_withFullTitlePage_shouldFormatFields() {
    let state = title_state(json!({
        "_id": "f1",
        "title": "Frieren",
        "synopsys": "After the party defeats the Demon King...",
        "synonyms": ["Sousou no Frieren", "Frieren at the Funeral", "葬送のフリーレン", "Frieren: Beyond Journey's End", "FBJE", "Frieren TV"],
        "animeSeason": {"season": "Fall", "year": 2023}
    }));
    let (fetcher, pipeline) = create_pipeline(MockFetcher::new().with_page(TITLE_URL, next_data_page(&state)), true);

    let details = pipeline.details(TITLE_URL).await;
    assert_eq!(details.description, "After the party defeats the Demon King...");
    assert_eq!(
        details.aliases,
        "Sousou no Frieren, Frieren at the Funeral, 葬送のフリーレン, Frieren: Beyond Journey's End, FBJE"
    );
    assert_eq!(details.airdate, "Fall 2023");

    // Details never consult the subtitle index
    assert_eq!(fetcher.request_count(), 1);
}

#[tokio::test]
async fn test_details_withSparseTitlePage_shouldUseDefaults() {
    let state = title_state(json!({"title": "Frieren", "animeSeason": {"year": "2023"}}));
    let (_, pipeline) = create_pipeline(MockFetcher::new().with_page(TITLE_URL, next_data_page(&state)), true);

    let details = pipeline.details(TITLE_URL).await;
    assert_eq!(details.description, "No description available");
    assert_eq!(details.aliases, "No aliases available");
    assert_eq!(details.airdate, "Unknown 2023");
}

#[tokio::test]
async fn test_details_withFailedFetch_shouldReturnPlaceholders() {
    let (_, pipeline) = create_pipeline(
        MockFetcher::new().with_status(TITLE_URL, 502, "Bad Gateway"),
        true,
    );

    let details = pipeline.details(TITLE_URL).await;
    assert_eq!(details, TitleDetails::unavailable());
    assert_eq!(details.description, "Error loading description");
    assert_eq!(details.aliases, "Duration: Unknown");
    assert_eq!(details.airdate, "Aired: Unknown");
}
