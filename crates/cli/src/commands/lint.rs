use crate::exit_code::ExitCode;
use crate::OutputFormat;
use colored::Colorize;
use relay_extract::analyze_source;
use relay_linter::{lint_source, LintConfig, LintSeverity};
use relay_types::{Language, LineIndex};
use std::collections::HashMap;
use std::path::PathBuf;

/// Diagnostic output structure for collecting warnings and errors
struct DiagnosticOutput {
    file_path: String,
    line: usize,
    column: usize,
    end_line: usize,
    end_column: usize,
    message: String,
    severity: String,
    rule: String,
}

/// File-level diagnostic grouping for JSON output
#[derive(Default)]
struct FileDiagnostics {
    errors: Vec<DiagnosticOutput>,
    warnings: Vec<DiagnosticOutput>,
}

pub fn run(paths: &[PathBuf], config_path: Option<PathBuf>, format: OutputFormat) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            return ExitCode::ConfigError;
        }
    };

    let files = collect_source_files(paths);

    let mut files_with_diagnostics: HashMap<String, FileDiagnostics> = HashMap::new();
    let mut io_failures = 0usize;
    let mut parse_failures = 0usize;
    let mut files_checked = 0usize;

    for file in &files {
        let contents = match std::fs::read_to_string(file) {
            Ok(contents) => contents,
            Err(err) => {
                eprintln!(
                    "{} failed to read {}: {err}",
                    "error:".red().bold(),
                    file.display()
                );
                io_failures += 1;
                continue;
            }
        };
        let analysis = match analyze_source(file, &contents) {
            Ok(analysis) => analysis,
            Err(err) => {
                eprintln!("{} {err}", "error:".red().bold());
                parse_failures += 1;
                continue;
            }
        };
        files_checked += 1;

        let diagnostics = lint_source(&analysis, &config);
        if diagnostics.is_empty() {
            continue;
        }

        let line_index = LineIndex::new(&contents);
        let file_path_str = file.display().to_string();
        let file_diags = files_with_diagnostics.entry(file_path_str.clone()).or_default();

        for diag in diagnostics {
            let start = line_index.position(diag.range.start);
            let end = line_index.position(diag.range.end);
            let severity_string = match diag.severity {
                LintSeverity::Error => "error",
                LintSeverity::Warning => "warning",
                LintSeverity::Info => "info",
                LintSeverity::Off => continue,
            }
            .to_string();

            let diag_output = DiagnosticOutput {
                file_path: file_path_str.clone(),
                // Convert from 0-based to 1-based for display
                line: (start.line + 1) as usize,
                column: (start.character + 1) as usize,
                end_line: (end.line + 1) as usize,
                end_column: (end.character + 1) as usize,
                message: diag.message,
                severity: severity_string,
                rule: diag.rule,
            };

            match diag.severity {
                LintSeverity::Error => file_diags.errors.push(diag_output),
                _ => file_diags.warnings.push(diag_output),
            }
        }
    }

    let all_warnings: Vec<_> = files_with_diagnostics
        .values()
        .flat_map(|f| &f.warnings)
        .collect();
    let all_errors: Vec<_> = files_with_diagnostics
        .values()
        .flat_map(|f| &f.errors)
        .collect();
    let total_warnings = all_warnings.len();
    let total_errors = all_errors.len();

    match format {
        OutputFormat::Human => {
            for warning in &all_warnings {
                println!(
                    "\n{}:{}:{}: {} {}",
                    warning.file_path,
                    warning.line,
                    warning.column,
                    "warning:".yellow().bold(),
                    warning.message.yellow()
                );
                println!("  {}: {}", "rule".dimmed(), warning.rule.dimmed());
            }

            for error in &all_errors {
                println!(
                    "\n{}:{}:{}: {} {}",
                    error.file_path,
                    error.line,
                    error.column,
                    "error:".red().bold(),
                    error.message.red()
                );
                println!("  {}: {}", "rule".dimmed(), error.rule.dimmed());
            }

            println!();
            if total_errors == 0 && total_warnings == 0 {
                println!(
                    "{}",
                    format!("✓ No issues found in {files_checked} file(s)")
                        .green()
                        .bold()
                );
            } else if total_errors == 0 {
                println!(
                    "{}",
                    format!("✓ Linting passed with {total_warnings} warning(s)")
                        .yellow()
                        .bold()
                );
            } else if total_warnings == 0 {
                println!("{}", format!("✗ Found {total_errors} error(s)").red());
            } else {
                println!(
                    "{}",
                    format!("✗ Found {total_errors} error(s) and {total_warnings} warning(s)")
                        .red()
                );
            }
        }
        OutputFormat::Json => {
            let diag_to_json = |d: &DiagnosticOutput| {
                serde_json::json!({
                    "message": d.message,
                    "severity": d.severity,
                    "rule": d.rule,
                    "location": {
                        "start": { "line": d.line, "column": d.column },
                        "end": { "line": d.end_line, "column": d.end_column }
                    }
                })
            };

            let mut files: Vec<serde_json::Value> = files_with_diagnostics
                .iter()
                .map(|(file, diags)| {
                    serde_json::json!({
                        "file": file,
                        "errors": diags.errors.iter().map(diag_to_json).collect::<Vec<_>>(),
                        "warnings": diags.warnings.iter().map(diag_to_json).collect::<Vec<_>>()
                    })
                })
                .collect();

            // Sort files for consistent output
            files.sort_by(|a, b| {
                a.get("file")
                    .and_then(|v| v.as_str())
                    .cmp(&b.get("file").and_then(|v| v.as_str()))
            });

            let output = serde_json::json!({
                "success": total_errors == 0,
                "files": files,
                "stats": {
                    "total_files": files_checked,
                    "total_errors": total_errors,
                    "total_warnings": total_warnings
                }
            });

            match serde_json::to_string_pretty(&output) {
                Ok(text) => println!("{text}"),
                Err(err) => eprintln!("{} {err}", "error:".red().bold()),
            }
        }
        OutputFormat::Github => {
            for warning in &all_warnings {
                println!(
                    "::warning file={},line={},col={}::{} [{}]",
                    warning.file_path, warning.line, warning.column, warning.message, warning.rule
                );
            }

            for error in &all_errors {
                println!(
                    "::error file={},line={},col={}::{} [{}]",
                    error.file_path, error.line, error.column, error.message, error.rule
                );
            }
        }
    }

    if total_errors > 0 {
        ExitCode::LintError
    } else if io_failures > 0 {
        ExitCode::IoError
    } else if parse_failures > 0 {
        ExitCode::ParseError
    } else {
        ExitCode::Success
    }
}

fn load_config(config_path: Option<PathBuf>) -> Result<LintConfig, relay_linter::ConfigError> {
    if let Some(path) = config_path {
        return LintConfig::load(&path);
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match LintConfig::find_config(&cwd) {
        Some(path) => LintConfig::load(&path),
        None => Ok(LintConfig::default()),
    }
}

/// Expand the given paths into the list of lintable source files.
///
/// Directories are walked recursively, honoring `.gitignore`; anything
/// without a recognized JavaScript/TypeScript extension is skipped.
fn collect_source_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in ignore::WalkBuilder::new(path).build().flatten() {
                let entry_path = entry.path();
                if entry.file_type().is_some_and(|ty| ty.is_file())
                    && Language::from_path(entry_path).is_some()
                {
                    files.push(entry_path.to_path_buf());
                }
            }
        } else if Language::from_path(path).is_some() {
            files.push(path.clone());
        } else {
            tracing::warn!(path = %path.display(), "skipping file with unrecognized extension");
        }
    }
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn collects_js_and_ts_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "x;").unwrap();
        fs::write(dir.path().join("b.tsx"), "x;").unwrap();
        fs::write(dir.path().join("notes.md"), "# notes").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.ts"), "x;").unwrap();

        let files = collect_source_files(&[dir.path().to_path_buf()]);
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["a.js", "b.tsx", "c.ts"]);
    }

    #[test]
    fn explicit_file_paths_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("only.js");
        fs::write(&file, "x;").unwrap();
        assert_eq!(collect_source_files(&[file.clone()]), vec![file]);
    }

    #[test]
    fn unrecognized_explicit_path_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data.json");
        fs::write(&file, "{}").unwrap();
        assert!(collect_source_files(&[file]).is_empty());
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let config = load_config(None);
        assert!(config.is_ok());
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let err = load_config(Some(PathBuf::from("/nonexistent/relay-lint.yml"))).unwrap_err();
        assert!(matches!(err, relay_linter::ConfigError::Io { .. }));
    }
}
