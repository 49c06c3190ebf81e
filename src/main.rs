use blogicum::{init_tracing, make_router, run_app, Config};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            std::process::exit(1);
        }
    };
    init_tracing(&config.log_level);
    let router = make_router();
    if let Err(error) = run_app(router, config).await {
        tracing::error!("Error: {:#}", error);
        std::process::exit(1);
    }
}
