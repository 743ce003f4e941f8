use dotenvy::dotenv;
use evalproy::cli;
use evalproy::logging::init_tracing;
use evalproy::router::init_router;
use evalproy::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    // Check if this is a CLI command
    if args.len() > 1 && args[1] == "crear-supervisor" {
        handle_crear_supervisor(args).await;
        return;
    }

    // Normal server startup
    init_tracing();

    let state = init_app_state().await;
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("🚀 Server running on http://localhost:3000");
    println!("📖 Scalar UI available at http://localhost:3000/scalar");
    axum::serve(listener, app).await.unwrap();
}

async fn handle_crear_supervisor(args: Vec<String>) {
    if args.len() != 4 {
        eprintln!("Usage: {} crear-supervisor <nombre> <correo>", args[0]);
        std::process::exit(1);
    }

    let nombre = &args[2];
    let correo = &args[3];

    // Initialize database connection
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    match cli::crear_supervisor(&pool, nombre, correo).await {
        Ok(_) => {
            println!("✅ Supervisor created successfully!");
            println!("   Correo: {correo}");
            println!("   Nombre: {nombre}");
        }
        Err(e) => {
            eprintln!("❌ Error creating supervisor: {e}");
            std::process::exit(1);
        }
    }
}
