//! HTTP server construction.

use std::net::TcpListener;

use actix_web::{App, HttpServer, dev::Server, web};
use tracing_actix_web::TracingLogger;

use crate::handlers;
use crate::state::AppState;

/// Build the HTTP server on an already bound listener.
///
/// The returned [`Server`] must be awaited (or spawned) to start serving;
/// stop it through [`Server::handle`].
pub fn run(listener: TcpListener, state: AppState) -> std::io::Result<Server> {
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(data.clone())
            .configure(handlers::configure_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
