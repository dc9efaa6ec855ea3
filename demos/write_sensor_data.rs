use eav_influxdb_rs::{
    data::WriteLpRequest,
    eav::{EavMessage, DEFAULT_ENTITY_KEY, DEFAULT_MEASUREMENT},
    InfluxClient,
};
use fake::{uuid::UUIDv4, Fake};
use rand::random_range;

fn setup() {
    simple_logger::init_with_level(log::Level::Info).unwrap();
    dotenvy::dotenv().unwrap();
}

/// 模拟一批传感器消息，按 EAV 的方式写入 InfluxDB
#[tokio::main]
async fn main() {
    setup();
    let client = InfluxClient::from_env().unwrap();

    const SENSORS: usize = 5;

    for _ in 0..SENSORS {
        let id: String = UUIDv4.fake();
        let sensor_id = format!("sensor-{}", &id[0..8]);

        let temperature: f64 = random_range(15.0f64..35.0f64);
        let humidity: u32 = random_range(20..90);
        let status = if random_range(0..10) < 9 { "active" } else { "degraded" };

        let payload = serde_json::json!({
            "sensor_id": sensor_id,
            "temperature": (temperature * 10.0).round() / 10.0,
            // 字符串形式的数字也会按数字写入
            "humidity": humidity.to_string(),
            "status": status,
        });

        let msg = EavMessage::from_json(payload.to_string().as_bytes(), DEFAULT_ENTITY_KEY).unwrap();
        let request = WriteLpRequest::new().points(msg.to_points(DEFAULT_MEASUREMENT));

        match client.write_lp(request).send().await {
            Ok(resp) => log::info!("{}: wrote {} lines at {}", sensor_id, resp.line_count, resp.timestamp_ns),
            Err(e) => log::error!("{}: write failed: {}", sensor_id, e),
        }
    }
}
