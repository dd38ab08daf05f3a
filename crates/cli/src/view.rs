use classcope_api::Record;
use classcope_core::ScanReport;
use serde::Serialize;
use std::sync::Arc;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// A terminal-optimized view of a Record
#[derive(Tabled)]
pub struct RecordView {
    pub kind: String,
    pub name: String,
    pub namespace: String,
    pub supertype: String,
    pub annotations: String,
}

impl RecordView {
    pub fn from_record(record: &Record) -> Self {
        let kind = if record.is_interface {
            "interface"
        } else if record.is_abstract {
            "abstract"
        } else {
            "class"
        };
        let mut supertypes: Vec<&str> = record.direct_supertypes().collect();
        if supertypes.is_empty() {
            supertypes.push("-");
        }
        Self {
            kind: kind.to_string(),
            name: record.simple_name.clone(),
            namespace: non_empty(record.namespace()),
            supertype: supertypes.join(", "),
            annotations: if record.annotations.is_empty() {
                "-".to_string()
            } else {
                record
                    .annotations
                    .iter()
                    .map(|a| format!("@{}", a.rsplit('.').next().unwrap_or(a)))
                    .collect::<Vec<_>>()
                    .join(" ")
            },
        }
    }
}

fn non_empty(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

/// Render records as a table, or as pretty JSON when `json` is set.
pub fn render_records(records: &[Arc<Record>], json: bool) -> Result<String, serde_json::Error> {
    if json {
        let plain: Vec<&Record> = records.iter().map(|r| r.as_ref()).collect();
        return serde_json::to_string_pretty(&plain);
    }
    if records.is_empty() {
        return Ok("(no records)".to_string());
    }
    let views: Vec<RecordView> = records.iter().map(|r| RecordView::from_record(r)).collect();
    Ok(Table::new(&views).with(Style::psql()).to_string())
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

pub fn render_report(report: &ScanReport, json: bool) -> Result<String, serde_json::Error> {
    if json {
        return render_json(report);
    }
    let scope = report
        .scope
        .map_or_else(|| "-".to_string(), |s| s.to_string());
    Ok(format!(
        "Scope:           {scope}\n\
         Sources:         {}\n\
         Scanned:         {}\n\
         Excluded:        {}\n\
         Failed:          {}\n\
         Records:         {}\n\
         Skipped entries: {}\n\
         Elapsed:         {:?}",
        report.sources,
        report.scanned,
        report.excluded,
        report.failed,
        report.records,
        report.skipped_entries,
        report.elapsed
    ))
}
