//! Renders report data into single- or multi-page A4 PDFs with the
//! built-in Helvetica fonts. Everything is laid out line by line from
//! the top margin; a new page is started when the cursor reaches the
//! bottom margin.

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::entities::test_results::ResultStatus;
use crate::error::AppError;
use crate::services::reports::{CoverageReportData, ProjectSummaryData, RunReportData};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 7.0;

struct PdfWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    layer: PdfLayerReference,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self, AppError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(map_pdf_err)?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(map_pdf_err)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            font,
            font_bold,
            layer,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        })
    }

    fn advance(&mut self, height: f32) {
        if self.y - height < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        self.y -= height;
    }

    fn heading(&mut self, text: &str) {
        self.advance(LINE_HEIGHT_MM * 1.5);
        self.layer
            .use_text(text, 18.0, Mm(MARGIN_MM), Mm(self.y), &self.font_bold);
    }

    fn subheading(&mut self, text: &str) {
        self.advance(LINE_HEIGHT_MM * 1.3);
        self.layer
            .use_text(text, 14.0, Mm(MARGIN_MM), Mm(self.y), &self.font_bold);
    }

    fn line(&mut self, text: &str) {
        self.advance(LINE_HEIGHT_MM);
        self.layer
            .use_text(text, 11.0, Mm(MARGIN_MM), Mm(self.y), &self.font);
    }

    fn spacer(&mut self) {
        self.advance(LINE_HEIGHT_MM / 2.0);
    }

    fn finish(self) -> Result<Vec<u8>, AppError> {
        self.doc.save_to_bytes().map_err(map_pdf_err)
    }
}

fn map_pdf_err(e: printpdf::Error) -> AppError {
    AppError::internal(format!("PDF rendering failed: {e}"))
}

fn format_ts(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string())
}

fn status_label(status: ResultStatus) -> &'static str {
    match status {
        ResultStatus::Passed => "PASSED",
        ResultStatus::Failed => "FAILED",
        ResultStatus::Blocked => "BLOCKED",
        ResultStatus::Skipped => "SKIPPED",
        ResultStatus::Untested => "UNTESTED",
    }
}

pub fn render_project_summary(data: &ProjectSummaryData) -> Result<Vec<u8>, AppError> {
    let mut pdf = PdfWriter::new("Project Summary")?;

    pdf.heading(&format!(
        "Project Summary: {} ({})",
        data.project.name, data.project.key
    ));
    if let Some(description) = &data.project.description {
        pdf.line(description);
    }
    pdf.line(&format!("Generated: {}", format_ts(OffsetDateTime::now_utc())));
    pdf.spacer();

    pdf.subheading("Inventory");
    pdf.line(&format!("Test suites: {}", data.suite_count));
    pdf.line(&format!("Test cases: {}", data.case_count));
    pdf.line(&format!("Test runs: {}", data.run_count));
    pdf.spacer();

    match &data.latest_run {
        Some((run, stats)) => {
            pdf.subheading(&format!("Latest run: {}", run.name));
            pdf.line(&format!(
                "Passed {} / Failed {} / Blocked {} / Skipped {} / Untested {}",
                stats.passed, stats.failed, stats.blocked, stats.skipped, stats.untested
            ));
            pdf.line(&format!(
                "Completion {}%, pass rate {}%",
                stats.completion_percentage, stats.pass_percentage
            ));
        }
        None => pdf.line("No test runs yet."),
    }

    pdf.finish()
}

pub fn render_coverage_report(data: &CoverageReportData) -> Result<Vec<u8>, AppError> {
    let mut pdf = PdfWriter::new("Requirement Coverage")?;

    pdf.heading(&format!(
        "Requirement Coverage: {} ({})",
        data.project.name, data.project.key
    ));
    pdf.line(&format!("Generated: {}", format_ts(OffsetDateTime::now_utc())));
    pdf.spacer();

    pdf.line(&format!(
        "Requirements: {} total, {} covered, {} uncovered",
        data.stats.total_requirements,
        data.stats.covered_requirements,
        data.stats.uncovered_requirements
    ));
    pdf.line(&format!("Coverage: {}%", data.stats.coverage_percentage));
    pdf.spacer();

    if data.rows.is_empty() {
        pdf.line("This project has no requirements.");
    } else {
        pdf.subheading("Requirements");
        for row in &data.rows {
            let mark = if row.covered { "covered" } else { "UNCOVERED" };
            pdf.line(&format!("[{mark}] {} - {}", row.external_key, row.title));
        }
    }

    pdf.finish()
}

pub fn render_run_report(data: &RunReportData) -> Result<Vec<u8>, AppError> {
    let mut pdf = PdfWriter::new("Run Results")?;

    pdf.heading(&format!("Run Results: {}", data.run.name));
    pdf.line(&format!("Created: {}", format_ts(data.run.created_at)));
    if let Some(completed_at) = data.run.completed_at {
        pdf.line(&format!("Completed: {}", format_ts(completed_at)));
    }
    pdf.spacer();

    pdf.line(&format!(
        "Results: {} total, {} executed ({}% complete, {}% passing)",
        data.stats.total,
        data.stats.executed,
        data.stats.completion_percentage,
        data.stats.pass_percentage
    ));
    pdf.spacer();

    if data.rows.is_empty() {
        pdf.line("No results recorded.");
    } else {
        pdf.subheading("Per-case results");
        for row in &data.rows {
            let mut line = format!("[{}] {}", status_label(row.status), row.case_title);
            if let Some(elapsed) = row.elapsed_seconds {
                line.push_str(&format!(" ({elapsed}s)"));
            }
            pdf.line(&line);
            if let Some(comment) = &row.comment {
                pdf.line(&format!("    {comment}"));
            }
        }
    }

    pdf.finish()
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::{render_coverage_report, render_project_summary, render_run_report};
    use crate::entities::test_results::ResultStatus;
    use crate::entities::{projects, test_runs};
    use crate::services::reports::{
        CoverageReportData, ProjectSummaryData, RequirementRow, ResultRow, RunReportData,
    };
    use crate::services::stats::{CoverageStats, RunStats};

    fn project() -> projects::Model {
        let now = OffsetDateTime::now_utc();
        projects::Model {
            id: 1,
            org_id: 1,
            name: "Storefront".to_string(),
            key: "STORE".to_string(),
            description: Some("Web storefront".to_string()),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn run() -> test_runs::Model {
        let now = OffsetDateTime::now_utc();
        test_runs::Model {
            id: 5,
            project_id: 1,
            milestone_id: None,
            name: "Release 1.2 regression".to_string(),
            state: crate::entities::test_runs::RunState::Active,
            created_by: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn summary_renders_to_pdf_bytes() {
        let data = ProjectSummaryData {
            project: project(),
            suite_count: 3,
            case_count: 42,
            run_count: 7,
            latest_run: Some((run(), RunStats::from_counts(&[(ResultStatus::Passed, 4)]))),
        };
        let bytes = render_project_summary(&data).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn coverage_report_renders_many_rows_across_pages() {
        let rows: Vec<RequirementRow> = (0..120)
            .map(|i| RequirementRow {
                external_key: format!("REQ-{i}"),
                title: format!("Requirement number {i}"),
                covered: i % 3 == 0,
            })
            .collect();
        let data = CoverageReportData {
            project: project(),
            stats: CoverageStats::compute(120, 40),
            rows,
        };
        let bytes = render_coverage_report(&data).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn run_report_renders_to_pdf_bytes() {
        let data = RunReportData {
            run: run(),
            stats: RunStats::from_counts(&[
                (ResultStatus::Passed, 2),
                (ResultStatus::Failed, 1),
            ]),
            rows: vec![
                ResultRow {
                    case_title: "Login with valid credentials".to_string(),
                    status: ResultStatus::Passed,
                    comment: None,
                    elapsed_seconds: Some(12),
                },
                ResultRow {
                    case_title: "Login with wrong password".to_string(),
                    status: ResultStatus::Failed,
                    comment: Some("Error message missing".to_string()),
                    elapsed_seconds: None,
                },
            ],
        };
        let bytes = render_run_report(&data).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
