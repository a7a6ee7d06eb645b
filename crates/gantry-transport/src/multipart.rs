use uuid::Uuid;

/// A fully assembled multipart/form-data request body.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    /// `multipart/form-data; boundary=<boundary>`
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Assemble a single-part multipart/form-data body holding one file.
///
/// The part carries `Content-Disposition: form-data; name="<field>";
/// filename="<file_name>"` and `Content-Type: application/octet-stream`.
/// The boundary is fresh per call, so request bodies from concurrent runs
/// never share a delimiter.
pub fn file_part(field: &str, file_name: &str, content: &[u8]) -> MultipartBody {
    let boundary = format!("gantry-{}", Uuid::new_v4().simple());

    let mut body = Vec::with_capacity(content.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    MultipartBody {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        body,
    }
}
