//! hexrgb 変換APIサーバー

use actix_cors::Cors;
use actix_files::Files;
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::{guard, middleware, web, App, HttpServer};
use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hexrgb_common::{
    api::{configure, not_found},
    Settings, VERSION,
};

/// CORS設定を構築
fn build_cors(origins: &[String]) -> Cors {
    if origins.iter().any(|o| o == "*") {
        return Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);
    }

    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // .env があれば環境変数として読み込む
    let dotenv_loaded = dotenv::dotenv().is_ok();

    // 設定読み込み（ログ初期化より先に行う）
    let settings = Settings::new().context("failed to load configuration")?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(&settings.logging.level))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    info!("hexrgb server starting (version {})", VERSION);
    if dotenv_loaded {
        info!("Loaded environment from .env");
    }

    settings.validate().context("invalid configuration")?;
    info!("Configuration validated successfully");

    let bind_address = settings.bind_address();
    let cors_origins = settings.api.cors_origins.clone();
    let max_body_size = settings.api.max_body_size;

    let static_dir = settings.static_files.dir.clone().filter(|dir| {
        let exists = std::path::Path::new(dir).is_dir();
        if !exists {
            warn!("Static directory {} does not exist, static files disabled", dir);
        }
        exists
    });
    if let Some(dir) = &static_dir {
        info!("Serving static files from {}", dir);
    }

    info!("Starting HTTP server on {}", bind_address);

    // HTTPサーバー構築
    let mut server = HttpServer::new(move || {
        let mut app = App::new()
            .app_data(web::PayloadConfig::new(max_body_size))
            .wrap(middleware::Logger::default())
            .wrap(build_cors(&cors_origins))
            .configure(configure)
            .default_service(web::to(not_found));

        // 静的ファイルはAPIルートの後に登録し、見つからなければ404 JSONを返す
        if let Some(dir) = &static_dir {
            app = app.service(
                Files::new("/", dir)
                    .index_file("index.html")
                    .guard(guard::Any(guard::Get()).or(guard::Head()))
                    .default_handler(fn_service(|req: ServiceRequest| async {
                        let (req, _) = req.into_parts();
                        let resp = not_found(req.clone()).await;
                        Ok::<_, actix_web::Error>(ServiceResponse::new(req, resp))
                    })),
            );
        }

        app
    });

    if let Some(workers) = settings.server.workers {
        server = server.workers(workers);
    }

    let server = server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .disable_signals()
        .run();

    info!("Server running at http://{}", bind_address);

    let server_handle = server.handle();

    // シャットダウンハンドラー
    let shutdown_task = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        info!("Shutdown signal received, stopping server...");
        server_handle.stop(true).await;
        info!("Server stopped");
    };

    // サーバーとシャットダウンタスクを並行実行
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_task => {
            info!("Shutdown completed");
        }
    }

    Ok(())
}
