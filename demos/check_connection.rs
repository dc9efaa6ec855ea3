use eav_influxdb_rs::InfluxClient;

fn setup() {
    simple_logger::init_with_level(log::Level::Info).unwrap();
    dotenvy::dotenv().unwrap();
}

#[tokio::main]
async fn main() {
    setup();
    let client = InfluxClient::from_env().unwrap();

    match client.list_database().send().await {
        Ok(dbs) => log::info!("databases: {:?}", dbs),
        Err(e) => log::error!("can not list databases: {}", e),
    }

    match client.test_connection().timeout_ms(5000).send().await {
        Ok(db) => log::info!("connection ok, database `{}` exists", db),
        Err(e) => log::error!("connection test failed: {}", e),
    }
}
