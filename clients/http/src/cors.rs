use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::{
        header::{self, HeaderValue},
        Method,
    },
    Error, HttpResponse,
};
use actix_web_lab::middleware::Next;

const ALLOW_METHODS: &str = "GET, POST, OPTIONS, PUT, DELETE, PATCH";
const ALLOW_HEADERS: &str = "accept, authorization, content-type, x-requested-with";
const MAX_AGE: &str = "1";
const EXPOSE_HEADERS: &str = "Location";

/// Permissive CORS policy, wrapped around every route with `from_fn(cors)`.
///
/// The request `Origin` is echoed back (or `*` without one) and credentials are allowed.
/// `OPTIONS` requests are answered here with headers only, the wrapped service never
/// sees them.
pub async fn cors(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    let mut res = if req.method() == Method::OPTIONS {
        req.into_response(HttpResponse::Ok().finish())
    } else {
        next.call(req).await?.map_into_boxed_body()
    };

    let headers = res.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(MAX_AGE),
    );
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static(EXPOSE_HEADERS),
    );

    Ok(res)
}
