use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_cors::Cors;
use actix_web::{
    body::{BoxBody, EitherBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{
        header::{self, HeaderMap},
        Method, StatusCode,
    },
    Error, HttpResponse,
};
use futures::future::LocalBoxFuture;

use crate::{config::Config, services::http_helpers::fail};

/// CORS policy for the configured frontend origins.
pub fn cors(config: &Config) -> Cors {
    config
        .cors_allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .supports_credentials()
}

/// Envelope code for a status produced outside the route handlers.
pub fn error_code_for(status: StatusCode) -> &'static str {
    match status {
        StatusCode::UNAUTHORIZED => "unauthorized",
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::METHOD_NOT_ALLOWED => "method_not_allowed",
        StatusCode::PAYLOAD_TOO_LARGE => "payload_too_large",
        StatusCode::TOO_MANY_REQUESTS => "rate_limit",
        s if s.is_server_error() => "server_error",
        _ => "bad_request",
    }
}

fn envelope_for(status: StatusCode) -> HttpResponse {
    let message = match status {
        StatusCode::PAYLOAD_TOO_LARGE => "Request body exceeds the size limit",
        s => s.canonical_reason().unwrap_or("Request failed"),
    };
    fail(error_code_for(status), message, status)
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Swaps a non-envelope error body for the envelope, keeping any CORS headers.
fn replace_with_envelope<B>(res: ServiceResponse<B>) -> ServiceResponse<BoxBody> {
    let mut envelope = envelope_for(res.status());
    for (name, value) in res
        .headers()
        .iter()
        .filter(|(name, _)| name.as_str().starts_with("access-control-"))
    {
        envelope.headers_mut().append(name.clone(), value.clone());
    }
    res.into_response(envelope)
}

/// Outermost layer that keeps the wire contract uniform.
///
/// Error responses built by the framework or by CORS (oversized bodies,
/// rejected origins) are re-rendered as failure envelopes, and a CORS preflight
/// answered with 200 is reported as 204.
pub struct EnvelopeGuard;

impl<S, B> Transform<S, ServiceRequest> for EnvelopeGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = EnvelopeGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(EnvelopeGuardService {
            service: Rc::new(service),
        }))
    }
}

pub struct EnvelopeGuardService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for EnvelopeGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let request = req.request().clone();
        let preflight = req.method() == Method::OPTIONS;

        Box::pin(async move {
            let mut res = match service.call(req).await {
                Ok(res) => res,
                Err(err) => {
                    let status = err.as_response_error().status_code();
                    log::info!("Request rejected before routing: {}", err);
                    return Ok(
                        ServiceResponse::new(request, envelope_for(status)).map_into_right_body()
                    );
                }
            };

            let status = res.status();
            if preflight && status == StatusCode::OK {
                *res.response_mut().status_mut() = StatusCode::NO_CONTENT;
                return Ok(res.map_into_left_body());
            }

            if (status.is_client_error() || status.is_server_error()) && !is_json(res.headers()) {
                return Ok(replace_with_envelope(res).map_into_right_body());
            }

            Ok(res.map_into_left_body())
        })
    }
}
