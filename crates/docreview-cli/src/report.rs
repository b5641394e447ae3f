use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use docreview_core::{Classification, FolderKey, ResultMap};
use serde::Serialize;

/// Everything a rendered report needs besides the results themselves.
pub struct ReportContext<'a> {
    pub root: &'a str,
    pub filter: Option<&'a str>,
    pub key: FolderKey,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    root: &'a str,
    filter: Option<&'a str>,
    key: FolderKey,
    counts: BTreeMap<&'static str, usize>,
    results: &'a ResultMap,
}

fn counts(results: &ResultMap) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<&'static str, usize> = Classification::ALL
        .iter()
        .map(|c| (c.as_str(), 0))
        .collect();
    for classification in results.values() {
        *counts.entry(classification.as_str()).or_default() += 1;
    }
    counts
}

pub fn write_text(out: &mut impl Write, ctx: &ReportContext<'_>, results: &ResultMap) -> Result<()> {
    writeln!(out, "Access decision report")?;
    writeln!(out, "  root: {}", ctx.root)?;
    writeln!(out, "  filter: {}", ctx.filter.unwrap_or("(none)"))?;
    writeln!(out, "  key: {}", ctx.key.as_str())?;
    writeln!(out)?;

    if results.is_empty() {
        writeln!(out, "No folders classified.")?;
        return Ok(());
    }

    let counts = counts(results);
    let summary: Vec<String> = Classification::ALL
        .iter()
        .map(|c| format!("{}={}", c.as_str(), counts[c.as_str()]))
        .collect();
    writeln!(out, "Summary: {}", summary.join(" "))?;
    writeln!(out)?;

    let width = results.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for (key, classification) in results {
        writeln!(out, "{key:<width$}  {classification}")?;
    }
    Ok(())
}

pub fn write_json(out: &mut impl Write, ctx: &ReportContext<'_>, results: &ResultMap) -> Result<()> {
    let report = JsonReport {
        root: ctx.root,
        filter: ctx.filter,
        key: ctx.key,
        counts: counts(results),
        results,
    };
    serde_json::to_writer(&mut *out, &report)?;
    out.write_all(b"\n")?;
    Ok(())
}
