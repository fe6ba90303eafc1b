//! Per-route request counter feeding `http_requests_total`.
//!
//! Routes are labelled by their matched template (`/filter/{index}`), so
//! deleting different filter entries lands in one series.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use axum::extract::MatchedPath;
use axum::http::Request;
use envform_telemetry::Metrics;
use tower::{Layer, Service};

/// Counts every completed envform request once its response status is known.
#[derive(Clone)]
pub(crate) struct HttpMetricsLayer {
    metrics: Metrics,
}

impl HttpMetricsLayer {
    pub(crate) const fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }
}

impl<S> Layer<S> for HttpMetricsLayer {
    type Service = HttpMetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HttpMetricsService {
            inner,
            metrics: self.metrics.clone(),
        }
    }
}

#[derive(Clone)]
pub(crate) struct HttpMetricsService<S> {
    inner: S,
    metrics: Metrics,
}

impl<S, B> Service<Request<B>> for HttpMetricsService<S>
where
    S: Service<Request<B>, Response = axum::response::Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let route = route_label(&req);
        let metrics = self.metrics.clone();
        let fut = self.inner.call(req);

        Box::pin(async move {
            let response = fut.await?;
            metrics.inc_http_request(&route, response.status().as_u16());
            Ok(response)
        })
    }
}

/// Matched route template, or the raw path when no route matched.
fn route_label<B>(req: &Request<B>) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path(), MatchedPath::as_str)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use axum::body::Body;
    use axum::response::Response;
    use std::convert::Infallible;
    use tower::{ServiceExt, service_fn};

    #[tokio::test]
    async fn unmatched_request_is_counted_under_raw_path() -> Result<()> {
        let metrics = Metrics::new()?;
        let service = HttpMetricsLayer::new(metrics.clone()).layer(service_fn(
            |_req: Request<Body>| async { Ok::<_, Infallible>(Response::new(Body::empty())) },
        ));

        let request = Request::builder().uri("/filter/3").body(Body::empty())?;
        let response = service.oneshot(request).await?;
        assert_eq!(response.status().as_u16(), 200);

        let rendered = metrics.render()?;
        assert!(rendered.contains(r#"route="/filter/3""#));
        assert!(rendered.contains(r#"code="200""#));
        Ok(())
    }
}
