//! Writes postings to a date-organized directory tree, one text file per
//! posting.

use crate::client::JobPosting;
use crate::error::Result;
use chrono::{Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const MAX_FILENAME_LEN: usize = 100;
const RULE_HEAVY: &str =
    "================================================================================";
const RULE_LIGHT: &str =
    "--------------------------------------------------------------------------------";

/// Handles writing job postings to an organized file structure
pub struct FileWriter {
    base_path: PathBuf,
}

impl FileWriter {
    /// Create a writer rooted at `base_path`, creating it if needed
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write postings under `<base>/<YYYY-MM-DD>/`, disambiguating filename
    /// collisions with a numeric suffix.
    ///
    /// The exists-check has a race under concurrent writers; acceptable for
    /// single-process batch runs.
    pub fn write_jobs(&self, jobs: &[JobPosting], date: Option<NaiveDate>) -> Result<Vec<PathBuf>> {
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        let date = date.unwrap_or_else(|| Local::now().date_naive());
        let output_dir = self.base_path.join(date.format("%Y-%m-%d").to_string());
        fs::create_dir_all(&output_dir)?;

        let mut written_files = Vec::with_capacity(jobs.len());

        for job in jobs {
            let base_name = job_filename(job);
            let mut file_path = output_dir.join(format!("{base_name}.txt"));

            let mut counter = 1;
            while file_path.exists() {
                file_path = output_dir.join(format!("{base_name}_{counter}.txt"));
                counter += 1;
            }

            fs::write(&file_path, format_job_content(job))?;
            debug!("Wrote {}", file_path.display());
            written_files.push(file_path);
        }

        Ok(written_files)
    }

    /// Write a single posting
    pub fn write_job(&self, job: &JobPosting, date: Option<NaiveDate>) -> Result<PathBuf> {
        let mut files = self.write_jobs(std::slice::from_ref(job), date)?;
        Ok(files.remove(0))
    }
}

/// Sanitize text for use as a filename: keep alphanumerics, hyphens, and
/// underscores; whitespace runs become single underscores; the result is
/// trimmed and truncated.
fn sanitize_filename(text: &str, max_length: usize) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_') || c.is_whitespace())
        .collect();

    let underscored = kept.split_whitespace().collect::<Vec<_>>().join("_");

    let mut collapsed = String::with_capacity(underscored.len());
    let mut previous_was_underscore = false;
    for ch in underscored.chars() {
        if ch == '_' {
            if !previous_was_underscore {
                collapsed.push('_');
            }
            previous_was_underscore = true;
        } else {
            collapsed.push(ch);
            previous_was_underscore = false;
        }
    }

    let trimmed = collapsed.trim_matches('_');
    let truncated: String = trimmed.chars().take(max_length).collect();
    truncated.trim_end_matches('_').to_string()
}

fn job_filename(job: &JobPosting) -> String {
    format!(
        "{}_{}",
        sanitize_filename(&job.company, MAX_FILENAME_LEN),
        sanitize_filename(&job.title, MAX_FILENAME_LEN)
    )
}

fn format_thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Render one posting as the text file body
fn format_job_content(job: &JobPosting) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(RULE_HEAVY.to_string());
    lines.push(format!("JOB POSTING: {}", job.title));
    lines.push(RULE_HEAVY.to_string());
    lines.push(String::new());

    lines.push(format!("Company: {}", job.company));
    lines.push(format!("Location: {}", job.location));
    lines.push(format!("Remote Type: {}", capitalize(job.remote_type.as_str())));

    if job.salary_min.is_some() || job.salary_max.is_some() {
        let mut salary = String::new();
        if let Some(min) = job.salary_min {
            salary.push_str(&format!("${}", format_thousands(min)));
        }
        if job.salary_min.is_some() && job.salary_max.is_some() {
            salary.push_str(" - ");
        }
        if let Some(max) = job.salary_max {
            salary.push_str(&format!("${}", format_thousands(max)));
        }
        lines.push(format!("Salary: {salary}"));
    }

    if let Some(posted) = job.posted_date {
        lines.push(format!("Posted Date: {}", posted.format("%Y-%m-%d")));
    }

    lines.push(format!("Job URL: {}", job.job_url));
    lines.push(format!("Board: {}", job.board_name));
    lines.push(format!("Board Job ID: {}", job.board_job_id));
    lines.push(String::new());

    if !job.description.is_empty() {
        lines.push(RULE_LIGHT.to_string());
        lines.push("DESCRIPTION".to_string());
        lines.push(RULE_LIGHT.to_string());
        lines.push(job.description.clone());
        lines.push(String::new());
    }

    if !job.requirements.is_empty() {
        lines.push(RULE_LIGHT.to_string());
        lines.push("REQUIREMENTS".to_string());
        lines.push(RULE_LIGHT.to_string());
        for requirement in &job.requirements {
            lines.push(format!("- {requirement}"));
        }
        lines.push(String::new());
    }

    lines.push(RULE_HEAVY.to_string());
    lines.push(format!(
        "Generated: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(RULE_HEAVY.to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RemoteType;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_posting(company: &str, title: &str) -> JobPosting {
        JobPosting {
            title: title.to_string(),
            company: company.to_string(),
            location: "Austin, TX, US".to_string(),
            remote_type: RemoteType::Hybrid,
            salary_min: Some(90_000),
            salary_max: Some(120_000),
            description: "Build and run things.".to_string(),
            requirements: vec!["Rust".to_string(), "Kubernetes".to_string()],
            posted_date: None,
            job_url: "https://example.com/apply".to_string(),
            board_name: "JSearch".to_string(),
            board_job_id: "abc123".to_string(),
            raw_data: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Acme Corp", 100), "Acme_Corp");
        assert_eq!(
            sanitize_filename("Senior DevOps Engineer (Remote!)", 100),
            "Senior_DevOps_Engineer_Remote"
        );
        assert_eq!(sanitize_filename("a  b___c", 100), "a_b_c");
        assert_eq!(sanitize_filename("___", 100), "");
        assert_eq!(sanitize_filename("C++ / Rust", 100), "C_Rust");
    }

    #[test]
    fn test_sanitize_filename_truncates() {
        let long = "x".repeat(250);
        assert_eq!(sanitize_filename(&long, 100).len(), 100);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(950), "950");
        assert_eq!(format_thousands(90_000), "90,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_content_includes_fields() {
        let content = format_job_content(&sample_posting("Acme", "Engineer"));
        assert!(content.contains("JOB POSTING: Engineer"));
        assert!(content.contains("Company: Acme"));
        assert!(content.contains("Remote Type: Hybrid"));
        assert!(content.contains("Salary: $90,000 - $120,000"));
        assert!(content.contains("- Rust"));
        assert!(content.contains("- Kubernetes"));
        assert!(content.contains("Board Job ID: abc123"));
    }

    #[test]
    fn test_write_jobs_creates_dated_directory() {
        let dir = TempDir::new().unwrap();
        let writer = FileWriter::new(dir.path().join("pipeline")).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

        let files = writer
            .write_jobs(&[sample_posting("Acme", "Engineer")], Some(date))
            .unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("2026-08-06/Acme_Engineer.txt"));
        assert!(files[0].exists());
    }

    #[test]
    fn test_collisions_get_numeric_suffix() {
        let dir = TempDir::new().unwrap();
        let writer = FileWriter::new(dir.path()).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

        let jobs = vec![
            sample_posting("Acme", "Engineer"),
            sample_posting("Acme", "Engineer"),
            sample_posting("Acme", "Engineer"),
        ];
        let files = writer.write_jobs(&jobs, Some(date)).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "Acme_Engineer.txt",
                "Acme_Engineer_1.txt",
                "Acme_Engineer_2.txt"
            ]
        );
        assert!(files.iter().all(|p| p.exists()));
    }

    #[test]
    fn test_write_jobs_empty_input() {
        let dir = TempDir::new().unwrap();
        let writer = FileWriter::new(dir.path()).unwrap();
        assert!(writer.write_jobs(&[], None).unwrap().is_empty());
    }

    #[test]
    fn test_write_single_job() {
        let dir = TempDir::new().unwrap();
        let writer = FileWriter::new(dir.path()).unwrap();

        let path = writer
            .write_job(&sample_posting("Acme", "Engineer"), None)
            .unwrap();
        assert!(path.exists());
    }
}
