use std::sync::Arc;

use switchyard_bus::{AmqpLogTransport, Emitter, connect_broker};
use switchyard_gateway::Dispatcher;
use switchyard_server::config::{self, LogRoute};
use switchyard_server::error::ServerError;
use switchyard_server::{api, telemetry};
use switchyard_transport::{
    GrpcLogTransport, HttpAuthClient, HttpLogTransport, HttpMailClient, LogTransport,
    RpcLogTransport, default_http_client,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    telemetry::init();

    let config = config::load()?;

    let client = default_http_client().map_err(|e| ServerError::Config(e.to_string()))?;
    let auth = Arc::new(HttpAuthClient::new(
        client.clone(),
        &config.downstream.auth_url,
    ));
    let mail = Arc::new(HttpMailClient::new(
        client.clone(),
        &config.downstream.mail_url,
    ));

    // The log transport is a deployment choice; the dispatcher never knows
    // which protocol is behind it.
    let log: Arc<dyn LogTransport> = match config.downstream.log_route {
        LogRoute::Http => Arc::new(HttpLogTransport::new(
            client,
            &config.downstream.logger_url,
        )),
        LogRoute::Rpc => Arc::new(RpcLogTransport::new(config.downstream.rpc_addr.clone())),
        LogRoute::Grpc => Arc::new(GrpcLogTransport::new(config.downstream.grpc_url.clone())),
        LogRoute::Bus => {
            // Dependencies are dialed before any traffic is served; a
            // broker that never comes up is fatal.
            let conn =
                connect_broker(&config.broker.url, config.broker.max_connect_attempts).await?;
            let emitter = Emitter::new(Arc::new(conn)).await?;
            Arc::new(AmqpLogTransport::new(emitter))
        }
    };

    let dispatcher = Arc::new(Dispatcher::new(auth, mail, log));
    let app = api::router(api::AppState { dispatcher });

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr).await?;
    info!(
        addr = %config.server.listen_addr,
        log_route = ?config.downstream.log_route,
        "gateway server listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
