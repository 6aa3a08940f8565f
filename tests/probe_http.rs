//! HEAD probing against a throwaway local server.

use std::time::Duration;
use streampicker::extractor::{AudioStream, MediaFormat};
use streampicker::metadata::{HeadProbe, HttpHeadProbe, StreamMetadataWrapper, StreamSize};
use streampicker::utils::StreamError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn local_probe(timeout: Duration) -> HttpHeadProbe {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpHeadProbe::with_client(client, timeout)
}

/// Serve one canned response per connection, forever
async fn serve(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{}/stream", addr)
}

#[tokio::test]
async fn test_head_reads_length_and_type() {
    let url = serve(
        "HTTP/1.1 200 OK\r\nContent-Length: 3145728\r\nContent-Type: audio/mp4\r\nConnection: close\r\n\r\n",
    )
    .await;

    let probe = local_probe(Duration::from_secs(5));
    let headers = probe.head(&url).await.unwrap();
    assert_eq!(headers.content_length(), Some(3_145_728));
    assert_eq!(headers.get("content-type"), Some("audio/mp4"));

    let wrapper = StreamMetadataWrapper::new(vec![AudioStream::new(url.as_str(), None, 128)]);
    let handle = wrapper.handle_at(0).unwrap();
    assert!(wrapper.ensure_size_and_format(handle, &probe).await);
    assert_eq!(wrapper.size(handle), StreamSize::Known(3_145_728));
    assert_eq!(wrapper.format(handle), Some(MediaFormat::M4a));
    assert_eq!(wrapper.formatted_size(handle), "3.00 MiB");
}

#[tokio::test]
async fn test_head_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/slow", listener.local_addr().unwrap());
    // accept and never answer
    let _server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let probe = local_probe(Duration::from_millis(200));
    let result = probe.head(&url).await;
    assert!(matches!(result, Err(StreamError::ProbeTimeout(_))));
}

#[tokio::test]
async fn test_refused_connection_marks_size_unknown() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/gone", listener.local_addr().unwrap());
    drop(listener);

    let probe = local_probe(Duration::from_secs(5));
    let mut wrapper = StreamMetadataWrapper::new(vec![AudioStream::new(url.as_str(), Some(MediaFormat::M4a), 128)]);
    assert!(wrapper.refresh_all(&probe, 1).await);
    assert_eq!(wrapper.size(wrapper.handle_at(0).unwrap()), StreamSize::Unknown);
}
