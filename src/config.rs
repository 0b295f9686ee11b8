use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::display::DisplayLocale;
use crate::providers::{Session, ThemeMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

/// Where page data comes from, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Postgres(String),
    JsonFile(PathBuf),
    Sample,
}

/// Global settings. Every flag falls back to an environment variable, and a
/// `.env` file is read before parsing.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// JSON snapshot with dashboard data
    #[arg(long, env = "IVY_DATA", global = true)]
    pub data: Option<PathBuf>,
    /// Postgres connection string for stored dashboard data
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    pub database_url: Option<String>,
    #[arg(
        long,
        env = "IVY_LOCALE",
        value_enum,
        default_value_t = DisplayLocale::EnUs,
        global = true
    )]
    pub locale: DisplayLocale,
    #[arg(long, env = "IVY_THEME", value_enum, default_value_t = ThemeMode::System, global = true)]
    pub theme: ThemeMode,
    /// Render as if this user were signed in
    #[arg(long, env = "IVY_SESSION_USER", global = true)]
    pub session_user: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown, global = true)]
    pub format: OutputFormat,
    /// Write output to this file instead of stdout
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,
}

impl SourceKind {
    /// Name safe to log; never includes the connection string.
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Postgres(_) => "postgres",
            SourceKind::JsonFile(_) => "json file",
            SourceKind::Sample => "sample",
        }
    }
}

impl Settings {
    pub fn source_kind(&self) -> SourceKind {
        if let Some(url) = self.database_url.as_deref().filter(|url| !url.trim().is_empty()) {
            SourceKind::Postgres(url.to_string())
        } else if let Some(path) = &self.data {
            SourceKind::JsonFile(path.clone())
        } else {
            SourceKind::Sample
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.session_user
            .as_deref()
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .map(|user| Session { user: user.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    #[command(args_override_self = true)]
    struct Harness {
        #[command(flatten)]
        settings: Settings,
    }

    /// Parses with the env-backed sources blanked so exported variables such
    /// as `DATABASE_URL` cannot leak in. Later flags override these.
    fn parse(args: &[&str]) -> Settings {
        let mut argv = vec!["ivy-dashboard", "--database-url", "", "--session-user", ""];
        argv.extend_from_slice(args);
        Harness::parse_from(argv).settings
    }

    #[test]
    fn source_precedence_prefers_database() {
        let settings = parse(&["--database-url", "postgres://localhost/ivy"]);
        assert_eq!(
            settings.source_kind(),
            SourceKind::Postgres("postgres://localhost/ivy".to_string())
        );

        let settings = parse(&["--data", "dashboard.json"]);
        assert_eq!(settings.source_kind(), SourceKind::JsonFile(PathBuf::from("dashboard.json")));
    }

    #[test]
    fn database_wins_over_data_file() {
        let settings = parse(&[
            "--data",
            "dashboard.json",
            "--database-url",
            "postgres://localhost/ivy",
        ]);
        assert!(matches!(settings.source_kind(), SourceKind::Postgres(_)));

        let settings = parse(&["--database-url", " ", "--data", "dashboard.json"]);
        assert!(matches!(settings.source_kind(), SourceKind::JsonFile(_)));
    }

    #[test]
    fn locale_and_theme_parse_by_name() {
        let settings = parse(&["--locale", "de-DE", "--theme", "dark", "--format", "json"]);
        assert_eq!(settings.locale, DisplayLocale::DeDe);
        assert_eq!(settings.theme, ThemeMode::Dark);
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn blank_session_user_means_signed_out() {
        let settings = parse(&["--session-user", "  "]);
        assert_eq!(settings.session(), None);

        let settings = parse(&["--session-user", "avery"]);
        assert_eq!(settings.session().map(|s| s.user), Some("avery".to_string()));
    }

    #[test]
    fn exported_database_url_is_overridden_by_blank_flag() {
        let settings = parse(&["--data", "dashboard.json"]);
        assert_eq!(settings.database_url.as_deref(), Some(""));
        assert_eq!(settings.source_kind(), SourceKind::JsonFile(PathBuf::from("dashboard.json")));
        assert_eq!(settings.session(), None);
    }
}
