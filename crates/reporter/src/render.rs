//! 리포트 렌더러
//!
//! 컬럼 목록(필드 이름 순서)을 스키마로 삼아 CSV와 HTML 본문을 만듭니다.
//! 행에 없는 필드는 빈 값으로 출력합니다.

use std::fmt::Write as _;

use smsprobe_core::config::ReportConfig;
use smsprobe_core::error::ProbeError;
use smsprobe_core::types::ResultProfile;

const CELL_STYLE: &str = "border: 1px solid black; border-collapse: collapse;";
const TABLE_STYLE: &str = "width:100%; border: 1px solid black; border-collapse: collapse;";

/// 첨부 파일 안내 문구
pub const SEE_ATTACHED: &str = "Please see attached CSV file.";

/// 컬럼 이름으로 값을 꺼낼 수 있는 리포트 행
pub trait ReportRow {
    fn value(&self, column: &str) -> Option<&str>;
}

impl ReportRow for ResultProfile {
    fn value(&self, column: &str) -> Option<&str> {
        self.field(column)
    }
}

/// 렌더링 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub subject: String,
    pub text: String,
    pub html: String,
    /// `attach_csv`가 켜진 경우에만 생성
    pub csv: Option<String>,
}

/// 설정에 따라 리포트 전체를 렌더링합니다.
///
/// # Errors
///
/// CSV 직렬화에 실패하면 에러를 반환합니다.
pub fn render_report<R: ReportRow>(
    config: &ReportConfig,
    rows: &[R],
) -> Result<RenderedReport, ProbeError> {
    let csv = if config.attach_csv {
        Some(render_csv(&config.field_list, rows)?)
    } else {
        None
    };

    let html = if config.results_in_email {
        render_html_table(&config.report_name, &config.field_list, rows, config.sample_cap)
    } else {
        render_html_notice(&config.report_name)
    };

    Ok(RenderedReport {
        subject: config.report_name.clone(),
        text: plain_text(&config.report_name),
        html,
        csv,
    })
}

/// CSV 텍스트를 만듭니다.
///
/// 헤더는 필드 이름을 그대로 쉼표로 잇고, 데이터 값은 모두 큰따옴표로 감쌉니다.
pub fn render_csv<R: ReportRow>(fields: &[String], rows: &[R]) -> Result<String, ProbeError> {
    let mut header = csv_writer(csv::QuoteStyle::Necessary, Vec::new());
    header.write_record(fields).map_err(csv_error)?;
    let buf = finish(header)?;

    let mut writer = csv_writer(csv::QuoteStyle::Always, buf);
    for row in rows {
        writer
            .write_record(fields.iter().map(|field| row.value(field).unwrap_or_default()))
            .map_err(csv_error)?;
    }
    let buf = finish(writer)?;

    // 입력이 모두 &str이므로 항상 유효한 UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn csv_writer(quote_style: csv::QuoteStyle, buf: Vec<u8>) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .quote_style(quote_style)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(buf)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ProbeError> {
    writer
        .into_inner()
        .map_err(|e| ProbeError::Io(std::io::Error::new(e.error().kind(), e.to_string())))
}

fn csv_error(e: csv::Error) -> ProbeError {
    ProbeError::Io(e.into())
}

/// 결과 표가 포함된 HTML 본문을 만듭니다.
///
/// `sample_cap`이 0이면 전체 행을, 아니면 앞에서부터 `sample_cap`개 행만 포함합니다.
pub fn render_html_table<R: ReportRow>(
    report_name: &str,
    fields: &[String],
    rows: &[R],
    sample_cap: usize,
) -> String {
    let name = html_escape(report_name);
    let mut html = String::from("<html>\n<head></head>\n<body>\n");

    let shown = if sample_cap == 0 {
        let _ = writeln!(
            html,
            "<p>Here is the data for the {name} report. Total records found: {}</p>",
            rows.len()
        );
        rows
    } else {
        let _ = writeln!(
            html,
            "<p>Here is the data for: {name}.<br />\nA sample of {sample_cap} rows of data is shown here. See attached CSV for full results.</p>"
        );
        &rows[..rows.len().min(sample_cap)]
    };

    let _ = writeln!(html, "<table style=\"{TABLE_STYLE}\">\n<thead>\n<tr>");
    for field in fields {
        let _ = writeln!(html, "<th style=\"{CELL_STYLE}\">{}</th>", html_escape(field));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in shown {
        html.push_str("<tr>\n");
        for field in fields {
            let _ = writeln!(
                html,
                "<td style=\"{CELL_STYLE}\">{}</td>",
                html_escape(row.value(field).unwrap_or_default())
            );
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</body>\n</html>");
    html
}

/// 표 없이 첨부 파일을 안내하는 HTML 본문
pub fn render_html_notice(report_name: &str) -> String {
    format!(
        "<html>\n<head></head>\n<body>\n<p>{}</p>\n\n<p>{SEE_ATTACHED}</p>\n</body>\n</html>\n",
        html_escape(report_name)
    )
}

/// HTML을 표시할 수 없는 수신자를 위한 본문
pub fn plain_text(report_name: &str) -> String {
    format!("{report_name}\n\n{SEE_ATTACHED}")
}

pub fn html_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapRow(HashMap<&'static str, &'static str>);

    impl ReportRow for MapRow {
        fn value(&self, column: &str) -> Option<&str> {
            self.0.get(column).copied()
        }
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    fn profiles(n: usize) -> Vec<ResultProfile> {
        (1..=n)
            .map(|i| ResultProfile {
                id: i.to_string(),
                country_name: "Ukraine".to_owned(),
                provider_name: "Kyivstar".to_owned(),
                text_delivered: "N/A".to_owned(),
                receipt_delay: "N/A".to_owned(),
                test_status: "WAIT".to_owned(),
                received_from: "N/A".to_owned(),
            })
            .collect()
    }

    #[test]
    fn csv_header_is_unquoted_and_values_quoted() {
        let rows = vec![MapRow(HashMap::from([("id", "7"), ("countryName", "Russia")]))];
        let csv = render_csv(&fields(&["id", "countryName"]), &rows).unwrap();
        assert_eq!(csv, "id,countryName\n\"7\",\"Russia\"\n");
    }

    #[test]
    fn csv_missing_field_is_empty_quoted_value() {
        let rows = vec![MapRow(HashMap::from([("a", "1"), ("c", "3")]))];
        let csv = render_csv(&fields(&["a", "b", "c"]), &rows).unwrap();
        assert_eq!(csv.lines().nth(1), Some("\"1\",\"\",\"3\""));
    }

    #[test]
    fn csv_doubles_embedded_quotes() {
        let rows = vec![MapRow(HashMap::from([("t", "say \"hi\"")]))];
        let csv = render_csv(&fields(&["t"]), &rows).unwrap();
        assert_eq!(csv, "t\n\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn zero_cap_shows_all_rows_and_total() {
        let html = render_html_table("Weekly", &fields(&["id"]), &profiles(5), 0);
        assert_eq!(html.matches("<tr>").count(), 6); // 헤더 1 + 데이터 5
        assert!(html.contains("Total records found: 5"));
        assert!(!html.contains("A sample of"));
    }

    #[test]
    fn nonzero_cap_shows_sample_notice() {
        let html = render_html_table("Weekly", &fields(&["id"]), &profiles(5), 2);
        assert_eq!(html.matches("<tr>").count(), 3);
        assert!(html.contains("A sample of 2 rows of data is shown here"));
        assert!(html.contains("See attached CSV"));
        assert!(!html.contains("Total records found"));
    }

    #[test]
    fn cap_larger_than_rows_shows_all_rows() {
        let html = render_html_table("Weekly", &fields(&["id"]), &profiles(3), 10);
        assert_eq!(html.matches("<tr>").count(), 4);
    }

    #[test]
    fn html_values_and_name_are_escaped() {
        let rows = vec![MapRow(HashMap::from([("t", "<b>R&D</b>")]))];
        let html = render_html_table("A <test> & more", &fields(&["t"]), &rows, 0);
        assert!(html.contains("&lt;b&gt;R&amp;D&lt;/b&gt;"));
        assert!(html.contains("A &lt;test&gt; &amp; more"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn notice_body_names_report() {
        let html = render_html_notice("Weekly");
        assert!(html.contains("<p>Weekly</p>"));
        assert!(html.contains(SEE_ATTACHED));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn plain_text_fallback() {
        assert_eq!(plain_text("Weekly"), "Weekly\n\nPlease see attached CSV file.");
    }

    #[test]
    fn render_report_follows_config_switches() {
        let mut config = ReportConfig::default();
        let rendered = render_report(&config, &profiles(2)).unwrap();
        assert!(rendered.csv.is_none());
        assert!(rendered.html.contains("<table"));
        assert_eq!(rendered.subject, config.report_name);

        config.attach_csv = true;
        config.results_in_email = false;
        let rendered = render_report(&config, &profiles(2)).unwrap();
        assert_eq!(rendered.csv.as_deref().map(|c| c.lines().count()), Some(3));
        assert!(!rendered.html.contains("<table"));
    }
}
