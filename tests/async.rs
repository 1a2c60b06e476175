mod common;

use common::text;
use futures::io::BufReader;
use lzwpack::encode::Encoder;
use tokio::io::AsyncWriteExt as _;
use tokio_util::compat::TokioAsyncReadCompatExt as _;

#[tokio::test(flavor = "multi_thread")]
async fn encode_through_pipe() {
    let data = text(300_000);
    let (mut tx, rx) = tokio::io::duplex(1 << 10);

    let input = data.clone();
    let writer = tokio::spawn(async move {
        for chunk in input.chunks(777) {
            tx.write_all(chunk).await.unwrap();
        }
        tx.shutdown().await.unwrap();
    });

    let mut compressed = vec![];
    let mut encoder = Encoder::new();
    let result = encoder
        .into_async(&mut compressed)
        .encode_all(BufReader::new(rx.compat()))
        .await;
    writer.await.unwrap();

    result.status.unwrap();
    assert_eq!(result.bytes_read, data.len());
    assert_eq!(result.bytes_written, compressed.len());
    assert_eq!(compressed, lzwpack::encode(&data));
}

#[tokio::test]
async fn encode_without_end() {
    let data = text(1_000);
    let mut compressed = vec![];
    let mut encoder = Encoder::new();
    let result = encoder
        .into_async(&mut compressed)
        .encode(futures::io::Cursor::new(&data[..]))
        .await;
    result.status.unwrap();
    assert_eq!(result.bytes_read, data.len());
    assert!(!encoder.has_ended());
}
