use mock_social_api::generator;

fn main() {
    dotenv::dotenv().ok();

    let path = std::env::var("DB_PATH").unwrap_or_else(|_| "db.json".to_string());

    let db = generator::generate(&mut rand::thread_rng());
    let json = serde_json::to_string(&db).expect("dataset serializes");
    std::fs::write(&path, json).expect("db file is writable");

    println!("{path} file has been generated");
}
