//! Server-rendered HTML for both front ends.
//!
//! Templates are embedded at compile time and share `base.html` (page shell and
//! styles). Tera autoescapes `.html` templates, so resume names and rejection
//! reasons render as text.

use serde::Serialize;
use tera::{Context, Tera};

use crate::screening::pipeline::Analysis;

const TPL_BASE: &str = include_str!("templates/base.html");
const TPL_INDEX: &str = include_str!("templates/index.html");
const TPL_RESULTS: &str = include_str!("templates/results.html");
const TPL_LIVE: &str = include_str!("templates/live.html");

/// One row of the results table, pre-formatted for display.
#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    rank: usize,
    resume_name: &'a str,
    score: String,
    skills: String,
}

/// Registers every page template. `base.html` goes first since the others extend it.
pub fn load_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template("base.html", TPL_BASE)?;
    tera.add_raw_template("index.html", TPL_INDEX)?;
    tera.add_raw_template("results.html", TPL_RESULTS)?;
    tera.add_raw_template("live.html", TPL_LIVE)?;
    Ok(tera)
}

/// Upload form. `error` is shown above the form when a submission was rejected.
pub fn render_index(tera: &Tera, error: Option<&str>) -> Result<String, tera::Error> {
    let mut context = Context::new();
    context.insert("error", &error);
    tera.render("index.html", &context)
}

/// Ranked results table with a CSV download link.
pub fn render_results(tera: &Tera, analysis: &Analysis) -> Result<String, tera::Error> {
    let rows: Vec<ResultRow<'_>> = analysis
        .results
        .iter()
        .enumerate()
        .map(|(i, record)| ResultRow {
            rank: i + 1,
            resume_name: &record.resume_name,
            score: format!("{:.2}", record.similarity_score),
            skills: record.matched_keywords.join(", "),
        })
        .collect();

    let mut context = Context::new();
    context.insert("rows", &rows);
    context.insert("rejected", &analysis.rejected);
    tera.render("results.html", &context)
}

/// Reactive page: re-runs the analysis through the JSON API whenever the inputs change.
pub fn render_live(tera: &Tera) -> Result<String, tera::Error> {
    tera.render("live.html", &Context::new())
}
