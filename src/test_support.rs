use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{
    App, Error,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    test::TestRequest,
    web::Data,
};
use serde_json::Value;

use crate::{
    config::{Config, DatabaseConfig},
    routes,
    store::CredentialStore,
};

/// Governor keys on the peer IP, so every test request needs one.
pub const PEER: SocketAddr = SocketAddr::V4(std::net::SocketAddrV4::new(
    std::net::Ipv4Addr::LOCALHOST,
    40000,
));

pub fn config(jwt_secret: Option<&str>) -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        database: DatabaseConfig {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "ems_test".to_string(),
            max_connections: 1,
            acquire_timeout: Duration::from_millis(100),
            tx_timeout: Duration::from_millis(500),
            run_migrations: false,
        },
        jwt_secret: jwt_secret.map(str::to_string),
        token_ttl: 3600,
        rate_login_per_min: 1000,
        rate_register_per_min: 1000,
        api_prefix: "/api".to_string(),
        log_dir: "logs".to_string(),
        log_level: tracing::Level::DEBUG,
    }
}

/// The production route table wired to the given store.
pub fn app<S>(
    store: Arc<S>,
    jwt_secret: Option<&'static str>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    S: CredentialStore + 'static,
{
    let config = config(jwt_secret);
    let store: Arc<dyn CredentialStore> = store;

    App::new()
        .app_data(Data::from(store))
        .app_data(Data::new(config.clone()))
        .configure(|cfg| routes::configure(cfg, &config))
}

pub fn post(uri: &str, body: &Value) -> TestRequest {
    TestRequest::post().uri(uri).peer_addr(PEER).set_json(body)
}

pub fn get(uri: &str, token: Option<&str>) -> TestRequest {
    let req = TestRequest::get().uri(uri).peer_addr(PEER);
    match token {
        Some(token) => req.insert_header(("Authorization", format!("Bearer {token}"))),
        None => req,
    }
}
