use db::{Config, Database, MemoryStore, NoTls, Store};
use hyper::{server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use std::{
    convert::Infallible,
    env,
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};
use tokio::{net::TcpListener, runtime::Runtime};

async fn serve<S>(listener: TcpListener, store: Arc<S>) -> anyhow::Result<()>
where
    S: Store + Send + Sync + 'static,
{
    let mut stop = core::pin::pin!(tokio::signal::ctrl_c());
    loop {
        let (stream, peer) = tokio::select! {
            biased;
            res = &mut stop => break res?,
            res = listener.accept() => res?,
        };

        let store = store.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let store = store.clone();
                async move { Ok::<_, Infallible>(api::respond(req, &*store).await) }
            });
            if let Err(err) = http1::Builder::new().serve_connection(TokioIo::new(stream), service).await {
                log::error!("Connection with {peer} failed: {err}");
            }
        });
    }

    log::info!("Received shutdown signal.");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse environment variables
    let port = env::var("PORT")?.parse()?;
    let database = match env::var("PG_HOSTNAME") {
        Ok(host) => {
            let user = env::var("PG_USERNAME")?;
            let pass = env::var("PG_PASSWORD")?;
            let data = env::var("PG_DATABASE")?;
            let pg_port: u16 = match env::var("PG_PORT") {
                Ok(pg_port) => pg_port.parse()?,
                _ => 5432,
            };
            let mut config = Config::new();
            config.user(&user).password(&pass).host(&host).dbname(&data).port(pg_port);
            Some(config)
        }
        _ => None,
    };

    let runtime = Runtime::new()?;
    runtime.block_on(run(port, database))
}

async fn run(port: u16, database: Option<Config>) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("Listening on {addr}.");

    let Some(config) = database else {
        log::warn!("PG_HOSTNAME is not set. Polls will only be kept in memory.");
        return serve(listener, Arc::new(MemoryStore::new())).await;
    };

    let (client, conn) = config.connect(NoTls).await?;
    let handle = tokio::spawn(conn);
    let db = Database::from(client);
    db.init_schema().await?;
    log::info!("Connected to the database.");

    serve(listener, Arc::new(db)).await?;
    handle.abort();
    Ok(())
}
