use chrono::{DateTime, Utc};

/// 当前时间的纳秒级时间戳，用作一次写入的所有数据点的共享时间戳
pub(crate) fn current_time_ns() -> i64 {
    let now: DateTime<Utc> = Utc::now();

    // 只有在 2262 年之后才会溢出
    now.timestamp_nanos_opt().unwrap_or(i64::MAX)
}

/// 去掉末尾的 `/`，方便和接口路径拼接
pub(crate) fn trim_endpoint(endpoint: &str) -> String {
    endpoint.trim().trim_end_matches('/').to_string()
}

/// 日志里只打印前面一部分响应内容
pub(crate) fn truncate_for_log(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }

    format!("{}...", s.chars().take(max_chars).collect::<String>())
}

#[cfg(test)]
mod test_util_fns {
    use super::{current_time_ns, trim_endpoint, truncate_for_log};

    #[test]
    fn test_trim_endpoint() {
        assert_eq!("http://localhost:8181", trim_endpoint("http://localhost:8181/"));
        assert_eq!("http://localhost:8181", trim_endpoint(" http://localhost:8181// "));
        assert_eq!("http://localhost:8181", trim_endpoint("http://localhost:8181"));
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!("abc", truncate_for_log("abc", 3));
        assert_eq!("ab...", truncate_for_log("abc", 2));
        assert_eq!("温度...", truncate_for_log("温度传感器", 2));
    }

    #[test]
    fn test_current_time_ns() {
        // 2023-11-14
        assert!(current_time_ns() > 1_700_000_000_000_000_000);
    }
}
