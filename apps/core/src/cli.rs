use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{self, ConfigError};
use crate::ignore_list::IgnoreSet;
use crate::matcher::ResultSet;
use crate::registry::DirectoryAppSource;
use crate::session::FilterSession;

const USAGE: &str = "usage: quicklaunch-core [--config PATH] [--root DIR]... [--ignore PATH]... \
[--match-path] [--full-path] [--json] [QUERY]";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}\n{usage}", usage = USAGE)]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to encode results: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub roots: Vec<PathBuf>,
    pub ignored: Vec<String>,
    pub match_path: bool,
    pub full_path: bool,
    pub json: bool,
    pub help: bool,
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResultRow {
    pub name: String,
    pub path: String,
    pub icon: String,
    pub label: String,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, CliError> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => options.config_path = Some(PathBuf::from(value_for(arg, iter.next())?)),
            "--root" => options.roots.push(PathBuf::from(value_for(arg, iter.next())?)),
            "--ignore" => options.ignored.push(value_for(arg, iter.next())?.to_string()),
            "--match-path" => options.match_path = true,
            "--full-path" => options.full_path = true,
            "--json" => options.json = true,
            "-h" | "--help" => options.help = true,
            flag if flag.starts_with("--") => {
                return Err(CliError::Usage(format!("unknown option '{flag}'")));
            }
            text => {
                if options.query.is_some() {
                    return Err(CliError::Usage(format!("unexpected argument '{text}'")));
                }
                options.query = Some(text.to_string());
            }
        }
    }

    Ok(options)
}

/// Scans, matches once, and writes one row per result to `out`.
pub fn run_with_output(options: CliOptions, out: &mut impl Write) -> Result<usize, CliError> {
    if options.help {
        writeln!(out, "{USAGE}")?;
        return Ok(0);
    }

    let mut cfg = config::load(options.config_path.as_deref())?;
    if !options.roots.is_empty() {
        cfg.app_roots = options.roots.clone();
    }
    cfg.match_path |= options.match_path;
    cfg.show_full_path |= options.full_path;
    if !options.ignored.is_empty() {
        if !cfg.apply_ignore_list {
            tracing::info!(
                ignored = options.ignored.len(),
                "--ignore given; enabling ignore list"
            );
        }
        cfg.apply_ignore_list = true;
        for path in &options.ignored {
            cfg.ignored_paths.add(path.as_str());
        }
    }
    config::validate(&cfg)?;

    let query = options
        .query
        .clone()
        .or_else(|| cfg.initial_query().map(str::to_string))
        .unwrap_or_default();
    tracing::info!(
        config_path = %cfg.config_path.display(),
        roots = cfg.app_roots.len(),
        query = query.as_str(),
        "one-shot query"
    );

    let settings = cfg.filter_settings();
    let source = DirectoryAppSource::new(
        cfg.app_roots.clone(),
        cfg.scan_max_depth,
        cfg.exclude_roots.clone(),
    );
    let mut session = FilterSession::new(
        Box::new(source),
        settings,
        Arc::new(cfg.ignored_paths.clone()),
    );
    session.restore_query(&query);

    let rows = result_rows(session.current_results(), settings.show_full_path);
    if options.json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
    } else {
        for row in &rows {
            writeln!(out, "{}", row.label)?;
        }
    }
    Ok(rows.len())
}

pub fn result_rows(results: &ResultSet, show_full_path: bool) -> Vec<ResultRow> {
    results
        .iter()
        .map(|entry| ResultRow {
            name: entry.name.clone(),
            path: entry.path.clone(),
            icon: entry.icon.as_str().to_string(),
            label: entry.display_label(show_full_path),
        })
        .collect()
}

fn value_for<'a>(flag: &str, value: Option<&'a String>) -> Result<&'a str, CliError> {
    value
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("missing value for '{flag}'")))
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_args, CliError};

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags_and_query() {
        let options = parse_cli_args(&args(&[
            "--root", "/apps", "--ignore", "/apps/Tracker", "--match-path", "--json", "te",
        ]))
        .unwrap();

        assert_eq!(options.roots, vec![std::path::PathBuf::from("/apps")]);
        assert_eq!(options.ignored, vec!["/apps/Tracker".to_string()]);
        assert!(options.match_path);
        assert!(options.json);
        assert!(!options.full_path);
        assert_eq!(options.query.as_deref(), Some("te"));
    }

    #[test]
    fn rejects_missing_flag_value() {
        let result = parse_cli_args(&args(&["--config"]));
        assert!(matches!(result, Err(CliError::Usage(_))));
    }

    #[test]
    fn rejects_unknown_flag_and_second_query() {
        assert!(parse_cli_args(&args(&["--bogus"])).is_err());
        assert!(parse_cli_args(&args(&["one", "two"])).is_err());
    }
}
