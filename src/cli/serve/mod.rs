//! Resolution server: every GET answers with the resolution of its URL.
//!
//! | Outcome            | Status |
//! |--------------------|--------|
//! | found              | 200    |
//! | permission denied  | 403    |
//! | not found, skipped | 404    |
//! | bad target         | 400    |
//! | repository fault   | 500    |

mod lifecycle;
mod response;

pub use lifecycle::setup_shutdown_handler;

use std::sync::Arc;

use anyhow::{Context, Result};
use tiny_http::{Request, Server};

use itemroute::{debug, log};

use super::common::Router;
use super::resolve::report;

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
}

/// Bind the HTTP server and register it for Ctrl+C shutdown.
pub fn bind_server(router: &Router) -> Result<BoundServer> {
    let serve = &router.config.serve;
    let (server, addr) = lifecycle::bind_with_retry(serve.interface, serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);
    Ok(BoundServer { server })
}

impl BoundServer {
    /// Start the request loop (blocking until shutdown).
    pub fn run(self, router: Arc<Router>) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(router.config.serve.threads)
            .thread_name(|i| format!("itemroute-serve-{i}"))
            .build()
            .context("failed to create request thread pool")?;

        for request in self.server.incoming_requests() {
            let router = Arc::clone(&router);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &router) {
                    log!("serve"; "request error: {e}");
                }
            });
        }

        debug!("serve"; "request loop ended");
        Ok(())
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, router: &Router) -> Result<()> {
    if lifecycle::is_shutdown() {
        return response::respond_unavailable(request);
    }
    if !response::is_allowed_method(request.method()) {
        return response::respond_method_not_allowed(request);
    }

    let url = request.url().to_string();
    let mut state = match router.request_state(&url) {
        Ok(state) => state,
        Err(e) => return response::respond_error(request, 400, &e),
    };

    match router.resolver.resolve(&mut state) {
        Ok(outcome) => {
            let status = response::outcome_status(outcome.as_ref());
            debug!("serve"; "{} {} -> {}", request.method(), url, status);
            response::respond_report(request, status, &report(&url, &state, outcome.as_ref()))
        }
        Err(e) => {
            let e = anyhow::Error::from(e);
            log!("error"; "{url}: {e:#}");
            response::respond_error(request, 500, &e)
        }
    }
}
