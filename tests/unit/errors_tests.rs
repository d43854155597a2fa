/*!
 * Tests for error types and conversions
 */

use subsieve::errors::{AppError, FetchError, IndexError, PipelineError};

#[test]
fn test_fetchError_status_shouldDisplayStatusAndUrl() {
    let error = FetchError::Status {
        status_code: 503,
        url: "https://catalog.test/search?q=x".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("503"));
    assert!(display.contains("https://catalog.test/search?q=x"));
}

#[test]
fn test_fetchError_timeout_shouldDisplayCorrectly() {
    let error = FetchError::Timeout("https://subs.test/api".to_string());
    assert!(format!("{}", error).contains("timed out"));
}

#[test]
fn test_indexError_fromFetchError_shouldWrapSource() {
    let error: IndexError = FetchError::RequestFailed("connection reset".to_string()).into();
    assert!(matches!(error, IndexError::Fetch(FetchError::RequestFailed(_))));
    assert!(format!("{}", error).contains("connection reset"));
}

#[test]
fn test_pipelineError_fromIndexError_shouldWrapSource() {
    let error: PipelineError = IndexError::MalformedResponse("expected an array".to_string()).into();
    let display = format!("{}", error);
    assert!(display.contains("Subtitle index error"));
    assert!(display.contains("expected an array"));
}

#[test]
fn test_pipelineError_missingField_shouldNameField() {
    let error = PipelineError::MissingField("props.pageProps.data.ep");
    assert!(format!("{}", error).contains("props.pageProps.data.ep"));
}

#[test]
fn test_appError_fromPipelineError_shouldConvert() {
    let error: AppError = PipelineError::MissingState {
        url: "https://catalog.test/anime/x".to_string(),
    }
    .into();
    assert!(matches!(error, AppError::Pipeline(PipelineError::MissingState { .. })));
}

#[test]
fn test_appError_fromIoAndAnyhow_shouldConvert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "conf.json missing");
    let error: AppError = io.into();
    assert!(matches!(error, AppError::File(_)));

    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(ref message) if message == "something odd"));
}
