//! Per-client fixed-window limit on `/api` traffic.
//!
//! Each request to the service can fan out into dozens of upstream LeetCode
//! calls, so inbound volume is capped per IP before any handler runs.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::{broadcast, Mutex};

use crate::response::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u64,
    started: Instant,
}

#[derive(Debug, Clone)]
pub struct RateLimiter {
    window: Duration,
    max_requests: u64,
    windows: Arc<Mutex<HashMap<IpAddr, Window>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u64,
    pub remaining: u64,
    /// Unix seconds at which the current window ends.
    pub reset_at: u64,
    pub retry_after_secs: u64,
}

impl RateLimiter {
    pub fn new(window_secs: u64, max_requests: u64) -> Self {
        Self {
            window: Duration::from_secs(window_secs.max(1)),
            max_requests,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn check(&self, ip: IpAddr) -> RateLimitDecision {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        let window = windows.entry(ip).or_insert(Window {
            count: 0,
            started: now,
        });
        if now.duration_since(window.started) >= self.window {
            *window = Window {
                count: 0,
                started: now,
            };
        }

        let allowed = window.count < self.max_requests;
        if allowed {
            window.count += 1;
        }

        let retry_after_secs = self
            .window
            .saturating_sub(now.duration_since(window.started))
            .as_secs();
        let unix_now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        RateLimitDecision {
            allowed,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(window.count),
            reset_at: unix_now + retry_after_secs,
            retry_after_secs,
        }
    }

    /// Drops windows idle for more than two periods.
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let horizon = self.window * 2;
        self.windows
            .lock()
            .await
            .retain(|_, w| now.duration_since(w.started) <= horizon);
    }

    pub async fn tracked_clients(&self) -> usize {
        self.windows.lock().await.len()
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitState {
    pub limiter: RateLimiter,
}

impl RateLimitState {
    pub fn new(window_secs: u64, max_requests: u64) -> Self {
        Self {
            limiter: RateLimiter::new(window_secs, max_requests),
        }
    }
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let ip = extract_client_ip(req.headers(), peer, state.config().trust_proxy);
    let decision = state.rate_limit().limiter.check(ip).await;

    let mut response = if decision.allowed {
        next.run(req).await
    } else {
        tracing::warn!(%ip, path = %req.uri().path(), "Rate limit exceeded");
        let mut response =
            AppError::too_many_requests("Too many requests, please slow down").into_response();
        if let Ok(v) = decision.retry_after_secs.max(1).to_string().parse() {
            response.headers_mut().insert("retry-after", v);
        }
        response
    };

    apply_rate_limit_headers(&mut response, &decision);
    response
}

fn apply_rate_limit_headers(response: &mut Response, decision: &RateLimitDecision) {
    let headers = response.headers_mut();
    for (name, value) in [
        ("ratelimit-limit", decision.limit),
        ("ratelimit-remaining", decision.remaining),
        ("ratelimit-reset", decision.reset_at),
    ] {
        if let Ok(v) = value.to_string().parse() {
            headers.insert(name, v);
        }
    }
}

/// Proxy headers are only honoured behind a trusted proxy; otherwise the
/// socket peer is used.
pub fn extract_client_ip(headers: &HeaderMap, peer: Option<IpAddr>, trust_proxy: bool) -> IpAddr {
    let fallback = peer.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
    if !trust_proxy {
        return fallback;
    }

    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse().ok())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
        })
        .unwrap_or(fallback)
}

pub async fn rate_limit_cleanup_loop(
    state: Arc<RateLimitState>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(300));
    loop {
        tokio::select! {
            _ = interval.tick() => state.limiter.cleanup().await,
            _ = shutdown_rx.recv() => break,
        }
    }
}
