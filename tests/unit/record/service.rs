use super::*;

#[test]
fn filename_hint_is_extracted() {
    let header = Some("attachment; filename=\"race-42.webm\"");
    assert_eq!(filename_from_content_disposition(header), "race-42.webm");
}

#[test]
fn missing_or_malformed_header_falls_back() {
    assert_eq!(
        filename_from_content_disposition(None),
        DEFAULT_VIDEO_FILENAME
    );
    assert_eq!(
        filename_from_content_disposition(Some("attachment")),
        DEFAULT_VIDEO_FILENAME
    );
    assert_eq!(
        filename_from_content_disposition(Some("attachment; filename=\"\"")),
        DEFAULT_VIDEO_FILENAME
    );
    assert_eq!(
        filename_from_content_disposition(Some("attachment; filename=\"unterminated")),
        DEFAULT_VIDEO_FILENAME
    );
}

#[test]
fn save_video_writes_under_the_hinted_name() {
    let dir = std::env::temp_dir().join(format!("chartrace-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let file = VideoFile {
        filename: "out.webm".to_string(),
        bytes: vec![1, 2, 3],
    };
    let path = save_video(&file, &dir).unwrap();
    assert_eq!(path.file_name().unwrap(), "out.webm");
    assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn session_id_is_opaque_but_readable() {
    let id = SessionId::new("abc-123");
    assert_eq!(id.as_str(), "abc-123");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(serde_json::from_str::<SessionId>(&json).unwrap(), id);
}
