use bytes::Bytes;

/// HTTP status codes the server emits.
///
/// - `Ok` (200): resource returned
/// - `Created` (201): dynamic resource created
/// - `NoContent` (204): dynamic resource updated or deleted
/// - `BadRequest` (400): malformed request or framing failure
/// - `NotFound` (404): unknown resource or path namespace
/// - `MethodNotAllowed` (405): method not supported for the resource class
/// - `LengthRequired` (411): `PUT` without `Content-Length` under the strict policy
/// - `NotImplemented` (501): `HEAD`
/// - `InsufficientStorage` (507): dynamic store is full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 204 No Content
    NoContent,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 411 Length Required
    LengthRequired,
    /// 501 Not Implemented
    NotImplemented,
    /// 507 Insufficient Storage
    InsufficientStorage,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use depot::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::InsufficientStorage.as_u16(), 507);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::LengthRequired => 411,
            StatusCode::NotImplemented => 501,
            StatusCode::InsufficientStorage => 507,
        }
    }

    /// Returns the standard reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::LengthRequired => "Length Required",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::InsufficientStorage => "Insufficient Storage",
        }
    }

    /// Whether responses with this status may carry a body.
    pub fn allows_body(&self) -> bool {
        !matches!(self, StatusCode::NoContent)
    }
}

/// A response ready to be serialized.
///
/// `Content-Length` is not stored; the writer derives it from `body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Response body
    pub body: Bytes,
    /// Close the connection once this response is written.
    pub close: bool,
}

impl Response {
    /// A response with a body. Bodies on 204 are dropped.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let body = if status.allows_body() {
            body.into()
        } else {
            Bytes::new()
        };
        Self {
            status,
            body,
            close: false,
        }
    }

    /// A response without a body.
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, Bytes::new())
    }

    /// 200 OK with the given body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::Ok, body)
    }

    /// 404 Not Found.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound, "Resource Not Found")
    }

    /// 400 Bad Request with a short explanation.
    pub fn bad_request(reason: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::BadRequest, reason)
    }

    /// Marks the response as the last one on its connection.
    pub fn closing(mut self) -> Self {
        self.close = true;
        self
    }
}
