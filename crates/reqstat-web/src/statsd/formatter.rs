//! DogStatsD line format: `name:value|type[|@rate][|#tag1,tag2]`.

use bytes::{BufMut, BytesMut};

use reqstat_core::error::{ReqstatError, Result};
use reqstat_core::TagSet;

#[derive(Debug, Clone, Copy)]
pub(super) enum MetricType {
    Count,
    Gauge,
    Timing,
    Histogram,
    Set,
}

impl MetricType {
    fn as_str(&self) -> &'static str {
        match self {
            MetricType::Count => "c",
            MetricType::Gauge => "g",
            MetricType::Timing => "ms",
            MetricType::Histogram => "h",
            MetricType::Set => "s",
        }
    }
}

pub(super) fn int_value(value: i64) -> String {
    let mut buffer = itoa::Buffer::new();
    buffer.format(value).to_string()
}

pub(super) fn float_value(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(ReqstatError::Transport(format!("non-finite metric value {value}")));
    }
    let mut buffer = ryu::Buffer::new();
    let s = buffer.format_finite(value);
    // ryu renders whole numbers as `1.0`; statsd is happy with `1`
    Ok(s.strip_suffix(".0").unwrap_or(s).to_string())
}

pub(super) fn format_line(
    buf: &mut BytesMut,
    name: &str,
    value: &str,
    metric_type: MetricType,
    sample_rate: f64,
    tags: Option<&TagSet>,
) {
    buf.put_slice(name.as_bytes());
    buf.put_u8(b':');
    buf.put_slice(value.as_bytes());
    buf.put_u8(b'|');
    buf.put_slice(metric_type.as_str().as_bytes());

    if sample_rate < 1.0 {
        let mut buffer = ryu::Buffer::new();
        buf.put_slice(b"|@");
        buf.put_slice(buffer.format(sample_rate).as_bytes());
    }

    if let Some(tags) = tags.filter(|t| !t.is_empty()) {
        buf.put_slice(b"|#");
        for (i, tag) in tags.iter().enumerate() {
            if i > 0 {
                buf.put_u8(b',');
            }
            buf.put_slice(tag.as_str().as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqstat_core::Tag;

    fn line(
        name: &str,
        value: &str,
        metric_type: MetricType,
        sample_rate: f64,
        tags: Option<&TagSet>,
    ) -> String {
        let mut buf = BytesMut::new();
        format_line(&mut buf, name, value, metric_type, sample_rate, tags);
        String::from_utf8(buf.to_vec()).unwrap()
    }

    #[test]
    fn count_simple() {
        assert_eq!(line("test.count", &int_value(20), MetricType::Count, 1.0, None), "test.count:20|c");
    }

    #[test]
    fn gauge_negative() {
        assert_eq!(line("g", &int_value(-3), MetricType::Gauge, 1.0, None), "g:-3|g");
    }

    #[test]
    fn timing_with_rate_and_tags() {
        let tags: TagSet = [Tag::parse("app:myapp").unwrap(), Tag::parse("http_method:GET").unwrap()]
            .into_iter()
            .collect();
        let v = float_value(12.5).unwrap();
        assert_eq!(
            line("myapp.test", &v, MetricType::Timing, 0.5, Some(&tags)),
            "myapp.test:12.5|ms|@0.5|#app:myapp,http_method:GET"
        );
    }

    #[test]
    fn empty_tag_set_writes_no_section() {
        let tags = TagSet::new();
        assert_eq!(line("h", "1", MetricType::Histogram, 1.0, Some(&tags)), "h:1|h");
        assert_eq!(line("s", "user42", MetricType::Set, 1.0, None), "s:user42|s");
    }

    #[test]
    fn float_rendering() {
        assert_eq!(float_value(3.0).unwrap(), "3");
        assert_eq!(float_value(0.25).unwrap(), "0.25");
        assert!(float_value(f64::NAN).is_err());
        assert!(float_value(f64::INFINITY).is_err());
    }
}
