use reqscribe::encoder::{
    HWP_MEDIA_TYPE, encode, load_files, media_type_for_extension, read_file, text_segment,
};
use reqscribe::{AttachmentSet, EncodedFile, EncodedInput, FileInput, FileKind, ReqscribeError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_binary_file_is_base64_encoded_in_full() {
    let bytes: Vec<u8> = (0..=255).collect();
    let input = FileInput::new("scan.png", "image/png", bytes.clone());

    let EncodedInput::Attachment(file) = encode(&input).expect("png is accepted") else {
        panic!("images become attachments");
    };
    assert_eq!(file.name, "scan.png");
    assert_eq!(file.media_type, "image/png");

    let decoded = STANDARD
        .decode(&file.payload)
        .expect("payload is standard base64");
    assert_eq!(decoded, bytes);
}

#[test]
fn test_missing_media_type_is_inferred_from_extension() {
    let input = FileInput::new("brief.DOCX", "", b"PK".to_vec());
    let EncodedInput::Attachment(file) = encode(&input).expect("docx is accepted") else {
        panic!("word documents become attachments");
    };
    assert_eq!(
        file.media_type,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
}

#[test]
fn test_hwp_is_recognized_by_extension_only() {
    assert_eq!(
        FileKind::classify("report.hwp", "").ok(),
        Some(FileKind::Hwp)
    );
    assert_eq!(
        FileKind::classify("report.hwp", "application/octet-stream").ok(),
        Some(FileKind::Hwp)
    );
    assert_eq!(media_type_for_extension("report.hwp"), Some(HWP_MEDIA_TYPE));

    let input = FileInput::new("report.hwp", "", vec![0xd0, 0xcf]);
    let EncodedInput::Attachment(file) = encode(&input).expect("hwp is accepted") else {
        panic!("hwp becomes an attachment");
    };
    assert_eq!(file.media_type, HWP_MEDIA_TYPE);
}

#[test]
fn test_text_files_are_never_attached() {
    let input = FileInput::new("notes.md", "text/markdown", "# Title".as_bytes().to_vec());
    assert_eq!(
        encode(&input).expect("markdown is accepted"),
        EncodedInput::Text {
            name: "notes.md".to_string(),
            content: "# Title".to_string(),
        }
    );
}

#[test]
fn test_invalid_utf8_text_is_decoded_lossily() {
    let input = FileInput::new("notes.txt", "text/plain", vec![b'o', b'k', 0xff]);
    let EncodedInput::Text { content, .. } = encode(&input).expect("txt is accepted") else {
        panic!("text stays text");
    };
    assert_eq!(content, "ok\u{fffd}");
}

#[test]
fn test_unknown_types_are_rejected() {
    let input = FileInput::new("tool.exe", "application/x-msdownload", vec![0x4d, 0x5a]);
    let err = encode(&input).expect_err("executables are rejected");
    assert!(matches!(err, ReqscribeError::UnsupportedFile(_)));
    assert!(err.to_string().contains("tool.exe"));
}

#[test]
fn test_text_segment_format() {
    assert_eq!(
        text_segment("hello.txt", "hello"),
        "\n\n--- File: hello.txt ---\nhello"
    );
}

#[test]
fn test_attachment_set_deduplicates_by_name() {
    let file = |payload: &str| EncodedFile {
        name: "scan.png".to_string(),
        media_type: "image/png".to_string(),
        payload: payload.to_string(),
    };

    let mut set = AttachmentSet::new();
    assert!(set.add(file("first")));
    assert!(!set.add(file("second")));
    assert_eq!(set.len(), 1);
    assert_eq!(set.as_slice()[0].payload, "first");

    assert!(set.remove("scan.png").is_some());
    assert!(set.is_empty());
}

#[tokio::test]
async fn test_read_file_reports_missing_files() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let err = read_file(&dir.path().join("nope.pdf"))
        .await
        .expect_err("missing file fails");
    assert!(matches!(err, ReqscribeError::FileRead { ref name, .. } if name == "nope.pdf"));
}

#[tokio::test]
async fn test_load_files_keeps_selection_order() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let mut paths = Vec::new();
    for (index, name) in ["c.txt", "a.png", "b.md"].iter().enumerate() {
        let file_path = dir.path().join(name);
        // Larger files first so reads are unlikely to finish in order
        fs::write(&file_path, "x".repeat((3 - index) * 100_000)).expect("write file");
        paths.push(file_path);
    }

    let loaded = load_files(&paths).await;
    let names: Vec<&str> = loaded
        .iter()
        .map(|entry| entry.as_ref().expect("file loads").name())
        .collect();
    assert_eq!(names, vec!["c.txt", "a.png", "b.md"]);
}
