use axum::{extract::Request, http::header, middleware::Next, response::Response};

/// Policy attached to every response, static assets and API replies alike.
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self' data: blob:; \
     script-src 'self' 'unsafe-inline' 'unsafe-eval' http://localhost:3001; \
     style-src 'self' 'unsafe-inline' https://fonts.googleapis.com https://cdn.mathpix.com; \
     connect-src 'self' http://localhost:3001 ws://localhost:3001; \
     img-src 'self' data: blob: https:; \
     font-src 'self' data: https://fonts.gstatic.com https://cdn.mathpix.com;";

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        header::HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );

    response
}
