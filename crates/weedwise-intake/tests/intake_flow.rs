//! Intake Flow Tests
//!
//! Validate-then-encode over in-memory and on-disk files.

use proptest::prelude::*;
use std::io::Write;
use weedwise_intake::{
    encode, validate, DiskFile, ImageFile, IntakeError, IntakePolicy, MemoryFile,
    DEFAULT_MAX_UPLOAD_BYTES,
};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_png_file_becomes_png_data_uri() {
    let policy = IntakePolicy::default();
    let bytes: Vec<u8> = (0..2_000_000u32).map(|i| (i % 251) as u8).collect();
    let file = MemoryFile::new("field.png", "image/png", bytes.clone());

    let accepted = validate(file, &policy).unwrap();
    let image = encode(&accepted, &policy).await.unwrap();

    assert!(image.as_str().starts_with("data:image/png"));
    assert_eq!(image.decode().unwrap(), bytes);
}

#[tokio::test]
async fn test_exact_limit_is_accepted_and_encoded() {
    let policy = IntakePolicy::default();
    let bytes = vec![0xAB; usize::try_from(DEFAULT_MAX_UPLOAD_BYTES).unwrap()];
    let file = MemoryFile::new("big.jpg", "image/jpeg", bytes);

    let accepted = validate(file, &policy).unwrap();
    let image = encode(&accepted, &policy).await.unwrap();
    assert_eq!(image.decode().unwrap().len() as u64, DEFAULT_MAX_UPLOAD_BYTES);
}

#[tokio::test]
async fn test_text_file_is_rejected() {
    let file = MemoryFile::new("notes.txt", "text/plain", b"hello".to_vec());
    let err = validate(file, &IntakePolicy::default()).unwrap_err();
    assert!(matches!(err, IntakeError::InvalidType { ref media_type } if media_type == "text/plain"));
}

#[tokio::test]
async fn test_disk_file_round_trip() {
    let mut tmp = tempfile::Builder::new().suffix(".webp").tempfile().unwrap();
    tmp.write_all(b"RIFF....WEBPVP8 ").unwrap();

    let policy = IntakePolicy::default();
    let file = DiskFile::open(tmp.path()).await.unwrap();
    assert_eq!(file.media_type(), "image/webp");

    let accepted = validate(file, &policy).unwrap();
    let image = encode(&accepted, &policy).await.unwrap();
    assert_eq!(image.media_type(), "image/webp");
    assert_eq!(image.decode().unwrap(), b"RIFF....WEBPVP8 ".to_vec());
}

#[tokio::test]
async fn test_disk_text_file_is_rejected() {
    let mut tmp = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    tmp.write_all(b"not an image").unwrap();

    let file = DiskFile::open(tmp.path()).await.unwrap();
    assert!(matches!(
        validate(file, &IntakePolicy::default()),
        Err(IntakeError::InvalidType { .. })
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_encode_is_byte_faithful(
        bytes in proptest::collection::vec(any::<u8>(), 1..4096),
        subtype in "(png|jpeg|gif|webp)",
    ) {
        let policy = IntakePolicy::default();
        let media_type = format!("image/{subtype}");
        let file = MemoryFile::new("upload", media_type.clone(), bytes.clone());

        let accepted = validate(file, &policy).unwrap();
        let image = runtime().block_on(encode(&accepted, &policy)).unwrap();

        prop_assert!(!image.is_empty());
        prop_assert_eq!(image.media_type(), media_type.as_str());
        prop_assert_eq!(image.decode().unwrap(), bytes);
    }
}
