/*!
 * Integration tests for episode listing and stream resolution
 */

use serde_json::{json, Value};
use subsieve::errors::{FetchError, PipelineError};
use subsieve::{MockFetcher, StreamResolution};

use crate::common::{
    create_pipeline, entries_by_id_url, entries_by_title_url, episode_state, files_url, index_entry,
    next_data_page, title_state, API_KEY, INDEX,
};

const TITLE_URL: &str = "https://catalog.test/anime/show";
const WATCH_URL: &str = "https://catalog.test/watch/slug-4?origin=origin-1";

/// Title page with twelve episode slots
fn twelve_episode_title(anilist: Option<u32>) -> Value {
    let slugs: Vec<String> = (1..=12).map(|n| format!("slug-{}", n)).collect();
    let mut data = json!({"_id": "origin-1", "title": "Show", "ep": slugs});
    if let Some(id) = anilist {
        data["mappings"] = json!({"anilist": id});
    }
    title_state(data)
}

fn subtitle_files(numbers: &[u32]) -> Value {
    Value::Array(
        numbers
            .iter()
            .map(|n| json!({"name": format!("Show - {:02}.srt", n), "url": format!("https://cdn.test/{}.srt", n)}))
            .collect(),
    )
}

#[tokio::test]
async fn test_listEpisodes_withThreeSubtitledEpisodes_shouldReturnIntersection() {
    let fetcher = MockFetcher::new()
        .with_page(TITLE_URL, next_data_page(&twelve_episode_title(Some(21))))
        .with_json(entries_by_id_url(21), &json!([index_entry(7, "Show", Some(21))]))
        .with_json(files_url(7), &subtitle_files(&[6, 2, 4]));
    let (_, pipeline) = create_pipeline(fetcher, true);

    let episodes = pipeline.list_episodes(TITLE_URL).await;
    let numbers: Vec<u32> = episodes.iter().map(|e| e.number).collect();
    assert_eq!(numbers, vec![2, 4, 6]);
    assert_eq!(episodes[0].href, "https://catalog.test/watch/slug-2?origin=origin-1");
    assert_eq!(episodes[1].href, "https://catalog.test/watch/slug-4?origin=origin-1");
    assert_eq!(episodes[2].href, "https://catalog.test/watch/slug-6?origin=origin-1");
}

#[tokio::test]
async fn test_listEpisodes_withSubtitleBeyondCatalog_shouldDropIt() {
    let fetcher = MockFetcher::new()
        .with_page(TITLE_URL, next_data_page(&twelve_episode_title(Some(21))))
        .with_json(entries_by_id_url(21), &json!([index_entry(7, "Show", Some(21))]))
        .with_json(files_url(7), &subtitle_files(&[1, 13, 0]));
    let (_, pipeline) = create_pipeline(fetcher, true);

    let numbers: Vec<u32> = pipeline.list_episodes(TITLE_URL).await.iter().map(|e| e.number).collect();
    assert_eq!(numbers, vec![1]);
}

#[tokio::test]
async fn test_listEpisodes_withUnusableSlot_shouldSkipThatEpisode() {
    let state = title_state(json!({
        "_id": "origin-1",
        "title": "Show",
        "mappings": {"anilist": 21},
        "ep": ["slug-1", null, {"bad": true}]
    }));
    let fetcher = MockFetcher::new()
        .with_page(TITLE_URL, next_data_page(&state))
        .with_json(entries_by_id_url(21), &json!([index_entry(7, "Show", Some(21))]))
        .with_json(files_url(7), &subtitle_files(&[1, 2, 3]));
    let (_, pipeline) = create_pipeline(fetcher, true);

    let numbers: Vec<u32> = pipeline.list_episodes(TITLE_URL).await.iter().map(|e| e.number).collect();
    assert_eq!(numbers, vec![1]);
}

#[tokio::test]
async fn test_listEpisodes_withoutExternalId_shouldSearchByTitle() {
    let fetcher = MockFetcher::new()
        .with_page(TITLE_URL, next_data_page(&twelve_episode_title(None)))
        .with_json(entries_by_title_url("Show"), &json!([index_entry(9, "Show (TV)", None)]))
        .with_json(files_url(9), &subtitle_files(&[3]));
    let (fetcher, pipeline) = create_pipeline(fetcher, true);

    let episodes = pipeline.list_episodes(TITLE_URL).await;
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].href, "https://catalog.test/watch/slug-3?origin=origin-1");
    assert!(fetcher
        .requests_to(INDEX)
        .iter()
        .all(|r| r.header_value("Authorization") == Some(API_KEY)));
}

#[tokio::test]
async fn test_listEpisodes_withoutExternalIdAndNoFallback_shouldNotQueryIndex() {
    let fetcher = MockFetcher::new().with_page(TITLE_URL, next_data_page(&twelve_episode_title(None)));
    let (fetcher, pipeline) = create_pipeline(fetcher, false);

    assert!(pipeline.list_episodes(TITLE_URL).await.is_empty());
    assert!(fetcher.requests_to(INDEX).is_empty());
}

#[tokio::test]
async fn test_listEpisodes_withMissingEpisodeArray_shouldReportField() {
    let state = title_state(json!({"_id": "origin-1", "title": "Show", "mappings": {"anilist": 21}}));
    let fetcher = MockFetcher::new().with_page(TITLE_URL, next_data_page(&state));
    let (_, pipeline) = create_pipeline(fetcher, true);

    assert_eq!(
        pipeline.try_list_episodes(TITLE_URL).await,
        Err(PipelineError::MissingField("props.pageProps.data.ep"))
    );
    assert!(pipeline.list_episodes(TITLE_URL).await.is_empty());
}

#[tokio::test]
async fn test_listEpisodes_withIndexFailure_shouldReturnEmpty() {
    let fetcher = MockFetcher::new()
        .with_page(TITLE_URL, next_data_page(&twelve_episode_title(Some(21))))
        .with_status(entries_by_id_url(21), 500, "boom");
    let (_, pipeline) = create_pipeline(fetcher, true);

    assert!(pipeline.list_episodes(TITLE_URL).await.is_empty());
}

fn watch_page(stream: Option<&str>, number: u32) -> String {
    let mut episode = json!({"number": number});
    if let Some(link) = stream {
        episode["streamLink"] = json!(link);
    }
    let anime = json!({"title": "Show", "mappings": {"anilist": 21}});
    next_data_page(&episode_state(episode, anime))
}

#[tokio::test]
async fn test_resolveStream_withSubtitle_shouldReturnBothUrls() {
    let fetcher = MockFetcher::new()
        .with_page(WATCH_URL, watch_page(Some("https://stream.test/4.m3u8"), 4))
        .with_json(entries_by_id_url(21), &json!([index_entry(7, "Show", Some(21))]))
        .with_json(files_url(7), &subtitle_files(&[3, 4]));
    let (_, pipeline) = create_pipeline(fetcher, true);

    assert_eq!(
        pipeline.resolve_stream(WATCH_URL).await,
        StreamResolution {
            stream: Some("https://stream.test/4.m3u8".to_string()),
            subtitles: Some("https://cdn.test/4.srt".to_string()),
        }
    );
}

#[tokio::test]
async fn test_resolveStream_withIntegralFloatNumber_shouldFindSubtitle() {
    let episode = json!({"number": "4.0", "streamLink": "https://stream.test/4.m3u8"});
    let anime = json!({"title": "Show", "mappings": {"anilist": 21}});
    let fetcher = MockFetcher::new()
        .with_page(WATCH_URL, next_data_page(&episode_state(episode, anime)))
        .with_json(entries_by_id_url(21), &json!([index_entry(7, "Show", Some(21))]))
        .with_json(files_url(7), &subtitle_files(&[3, 4]));
    let (_, pipeline) = create_pipeline(fetcher, true);

    let resolution = pipeline.resolve_stream(WATCH_URL).await;
    assert_eq!(resolution.subtitles.as_deref(), Some("https://cdn.test/4.srt"));
}

#[tokio::test]
async fn test_resolveStream_withoutStreamLink_shouldReturnNothing() {
    let fetcher = MockFetcher::new().with_page(WATCH_URL, watch_page(None, 4));
    let (fetcher, pipeline) = create_pipeline(fetcher, true);

    assert_eq!(pipeline.resolve_stream(WATCH_URL).await, StreamResolution::default());
    assert!(fetcher.requests_to(INDEX).is_empty());
}

#[tokio::test]
async fn test_resolveStream_withSubtitleLookupFailure_shouldKeepStream() {
    let fetcher = MockFetcher::new()
        .with_page(WATCH_URL, watch_page(Some("https://stream.test/4.m3u8"), 4))
        .with_failure(
            entries_by_id_url(21),
            FetchError::RequestFailed("connection refused".to_string()),
        );
    let (_, pipeline) = create_pipeline(fetcher, true);

    let resolution = pipeline.resolve_stream(WATCH_URL).await;
    assert_eq!(resolution.stream.as_deref(), Some("https://stream.test/4.m3u8"));
    assert_eq!(resolution.subtitles, None);
}

#[tokio::test]
async fn test_resolveStream_withNoSubtitleForEpisode_shouldKeepStream() {
    let fetcher = MockFetcher::new()
        .with_page(WATCH_URL, watch_page(Some("https://stream.test/4.m3u8"), 4))
        .with_json(entries_by_id_url(21), &json!([index_entry(7, "Show", Some(21))]))
        .with_json(files_url(7), &subtitle_files(&[1, 2]));
    let (_, pipeline) = create_pipeline(fetcher, true);

    let resolution = pipeline.resolve_stream(WATCH_URL).await;
    assert!(resolution.stream.is_some());
    assert!(resolution.subtitles.is_none());
}

#[tokio::test]
async fn test_resolveStream_withUnreachablePage_shouldReturnNothing() {
    let (_, pipeline) = create_pipeline(MockFetcher::new(), true);
    assert_eq!(pipeline.resolve_stream(WATCH_URL).await, StreamResolution::default());
    assert!(matches!(
        pipeline.try_resolve_stream(WATCH_URL).await,
        Err(PipelineError::Fetch(FetchError::Status { status_code: 404, .. }))
    ));
}

#[test]
fn test_streamResolution_serialization_shouldUseNullForMissingSubtitles() {
    let resolution = StreamResolution {
        stream: Some("https://stream.test/1.m3u8".to_string()),
        subtitles: None,
    };
    assert_eq!(
        serde_json::to_value(&resolution).unwrap(),
        json!({"stream": "https://stream.test/1.m3u8", "subtitles": null})
    );
}
