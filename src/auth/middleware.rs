use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header::AUTHORIZATION, Method},
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures::future::LocalBoxFuture;

use crate::{
    auth::{Claims, TokenVerifier},
    errors::AppError,
};

pub const AUTH_REQUIRED_MESSAGE: &str = "Authentication required";

/// What the gate does with one request.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// CORS preflight; passed through untouched.
    Preflight,
    Authenticated(Claims),
    /// No valid token, but the development bypass supplies an identity.
    Bypassed(Claims),
    Rejected,
}

/// Authentication policy wrapped around every protected route.
///
/// Preflight requests always pass. Otherwise a verified token passes, then the
/// development bypass (when active) passes with the anonymous identity, and
/// everything else is answered with a 401 `unauthorized` envelope.
#[derive(Clone)]
pub struct AccessGate {
    verifier: Arc<TokenVerifier>,
    dev_bypass: bool,
}

impl AccessGate {
    pub fn new(verifier: Arc<TokenVerifier>, dev_bypass: bool) -> Self {
        Self {
            verifier,
            dev_bypass,
        }
    }

    pub fn decide(&self, method: &Method, authorization: Option<&str>) -> GateDecision {
        if *method == Method::OPTIONS {
            return GateDecision::Preflight;
        }

        match self.verifier.verify(authorization) {
            Some(claims) => GateDecision::Authenticated(claims),
            None if self.dev_bypass => GateDecision::Bypassed(Claims::dev_anonymous()),
            None => GateDecision::Rejected,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGateService {
            service: Rc::new(service),
            gate: self.clone(),
        }))
    }
}

pub struct AccessGateService<S> {
    service: Rc<S>,
    gate: AccessGate,
}

impl<S, B> Service<ServiceRequest> for AccessGateService<S>
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

        let authorization = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        let decision = self.gate.decide(req.method(), authorization);

        // The identity slot never carries anything over from earlier layers.
        req.extensions_mut().remove::<Claims>();

        Box::pin(async move {
            match decision {
                GateDecision::Preflight => {}
                GateDecision::Authenticated(claims) | GateDecision::Bypassed(claims) => {
                    req.extensions_mut().insert(claims);
                }
                GateDecision::Rejected => {
                    let response =
                        AppError::Unauthorized(AUTH_REQUIRED_MESSAGE.to_string()).error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Identity of the current request, as established by the gate.
pub fn current_identity(req: &HttpRequest) -> Option<Claims> {
    req.extensions().get::<Claims>().cloned()
}

// Extractor for the gate-approved identity in handlers
pub struct AuthenticatedUser(pub Claims);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let claims = current_identity(req)
            .ok_or_else(|| AppError::Unauthorized(AUTH_REQUIRED_MESSAGE.to_string()));

        ready(claims.map(AuthenticatedUser))
    }
}
