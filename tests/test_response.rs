use depot::http::response::{Response, StatusCode};
use depot::http::writer::{ResponseWriter, serialize_response};
use tokio::io::AsyncReadExt;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::Created.as_u16(), 201);
    assert_eq!(StatusCode::NoContent.as_u16(), 204);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    assert_eq!(StatusCode::LengthRequired.as_u16(), 411);
    assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
    assert_eq!(StatusCode::InsufficientStorage.as_u16(), 507);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::Created.reason_phrase(), "Created");
    assert_eq!(StatusCode::NoContent.reason_phrase(), "No Content");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::MethodNotAllowed.reason_phrase(),
        "Method Not Allowed"
    );
    assert_eq!(StatusCode::LengthRequired.reason_phrase(), "Length Required");
    assert_eq!(StatusCode::NotImplemented.reason_phrase(), "Not Implemented");
    assert_eq!(
        StatusCode::InsufficientStorage.reason_phrase(),
        "Insufficient Storage"
    );
}

#[test]
fn test_serialize_ok_response() {
    let bytes = serialize_response(&Response::ok("Foo"));

    assert_eq!(
        &bytes[..],
        b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\nConnection: keep-alive\r\n\r\nFoo"
    );
}

#[test]
fn test_serialize_empty_response() {
    let bytes = serialize_response(&Response::empty(StatusCode::Created));

    assert_eq!(
        &bytes[..],
        b"HTTP/1.1 201 Created\r\nContent-Length: 0\r\nConnection: keep-alive\r\n\r\n"
    );
}

#[test]
fn test_serialize_closing_response() {
    let bytes = serialize_response(&Response::bad_request("Request Too Long").closing());
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(text.contains("Content-Length: 16\r\n"));
    assert!(text.contains("Connection: close\r\n"));
    assert!(text.ends_with("\r\n\r\nRequest Too Long"));
}

#[test]
fn test_content_length_tracks_binary_body() {
    let body = vec![0u8, 13, 10, 13, 10, 255];
    let bytes = serialize_response(&Response::ok(body.clone()));
    let text = String::from_utf8_lossy(&bytes);

    assert!(text.contains("Content-Length: 6\r\n"));
    assert!(bytes.ends_with(&body));
}

#[test]
fn test_no_content_drops_body() {
    let response = Response::new(StatusCode::NoContent, "ignored");
    assert!(response.body.is_empty());

    let bytes = serialize_response(&response);
    assert!(String::from_utf8_lossy(&bytes).contains("Content-Length: 0\r\n"));
}

#[test]
fn test_not_found_has_body() {
    let response = Response::not_found();
    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(response.body, "Resource Not Found");
    assert!(!response.close);
}

#[tokio::test]
async fn test_writer_sends_every_byte() {
    let body = vec![b'x'; 64 * 1024];
    let response = Response::ok(body.clone());
    let expected = serialize_response(&response);

    // A small pipe forces many partial writes
    let (mut client, mut server) = tokio::io::duplex(512);
    let reader = tokio::spawn(async move {
        let mut received = Vec::new();
        client.read_to_end(&mut received).await.unwrap();
        received
    });

    let mut writer = ResponseWriter::new(&response);
    writer.write_to_stream(&mut server).await.unwrap();
    assert_eq!(writer.remaining(), 0);
    drop(server);

    assert_eq!(reader.await.unwrap(), expected.to_vec());
}

#[tokio::test]
async fn test_writer_fails_when_peer_is_gone() {
    let (client, mut server) = tokio::io::duplex(16);
    drop(client);

    let mut writer = ResponseWriter::new(&Response::ok("some body"));
    assert!(writer.write_to_stream(&mut server).await.is_err());
    assert!(writer.remaining() > 0);
}
