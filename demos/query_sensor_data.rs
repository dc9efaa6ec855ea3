use eav_influxdb_rs::{
    data::{QueryRequest, QueryRow},
    InfluxClient,
};

fn setup() {
    simple_logger::init_with_level(log::Level::Info).unwrap();
    dotenvy::dotenv().unwrap();
}

#[tokio::main]
async fn main() {
    setup();
    let client = InfluxClient::from_env().unwrap();

    let sql = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "SELECT * FROM sensor_data ORDER BY time DESC LIMIT 20".to_string());

    match client.query(QueryRequest::new(sql)).send::<QueryRow>().await {
        Ok(rows) => {
            for row in &rows {
                println!("{}", serde_json::Value::Object(row.clone()));
            }
            log::info!("{} rows", rows.len());
        }
        Err(e) => log::error!("query failed: {}", e),
    }
}
