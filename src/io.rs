use crate::model::{Member, RotationPeriod, RotationSchedule};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de membres depuis CSV: header `user_id,display_name`
pub fn import_members_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Member>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing user_id")?.trim();
        let display = rec.get(1).context("missing display_name")?.trim();
        if id.is_empty() || display.is_empty() {
            bail!("invalid member row (empty)");
        }
        out.push(Member::new(id, display));
    }
    Ok(out)
}

/// Export JSON des périodes (jolie mise en forme)
pub fn export_periods_json<P: AsRef<Path>>(path: P, periods: &[RotationPeriod]) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(periods)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des périodes: header `start_time,end_time,user_id,display_name`
pub fn export_periods_csv<P: AsRef<Path>>(
    path: P,
    periods: &[RotationPeriod],
    schedule: &RotationSchedule,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["start_time", "end_time", "user_id", "display_name"])?;
    for p in periods {
        let start = p.start_time.to_rfc3339();
        let end = p.end_time.map(|e| e.to_rfc3339()).unwrap_or_default();
        let user = p.user_id.as_ref().map(|u| u.as_str()).unwrap_or("");
        let display = p
            .user_id
            .as_ref()
            .map(|u| schedule.display_name(u))
            .unwrap_or("");
        w.write_record([start.as_str(), end.as_str(), user, display])?;
    }
    w.flush()?;
    Ok(())
}
