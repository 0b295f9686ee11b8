use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

mod actions;
mod config;
mod db;
mod display;
mod error;
mod filter;
mod models;
mod pages;
mod providers;
mod report;
mod source;
mod ui;

use crate::actions::ActionIntent;
use crate::config::{OutputFormat, Settings, SourceKind};
use crate::filter::{CategoryFilter, InterviewFilter, StatusFilter, ALL_CATEGORIES, ALL_STATUSES};
use crate::pages::{
    AnalyticsPage, AnalyticsPeriod, DashboardPage, HomePage, InterviewsPage, LoginPage, Page,
    ViewContext,
};
use crate::providers::{AuthProvider, Providers, SessionIdentity};
use crate::source::Snapshot;
use crate::ui::Route;

#[derive(Parser)]
#[command(name = "ivy-dashboard")]
#[command(about = "Hiring dashboard views for the Ivy interview assistant", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the landing page
    Home,
    /// Render the sign-in page, or sign in with a provider and follow the redirect
    Login {
        #[arg(long, value_enum)]
        provider: Option<AuthProvider>,
    },
    /// Render the dashboard overview
    Dashboard {
        /// Activate a quick action by name and follow its intent
        #[arg(long)]
        activate: Option<String>,
    },
    /// Render the interview list
    Interviews {
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: CategoryFilter,
        #[arg(long, default_value = ALL_STATUSES)]
        status: StatusFilter,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Render charts and summary metrics
    Analytics {
        #[arg(long, value_enum, default_value_t)]
        period: AnalyticsPeriod,
    },
    /// Render whichever view a path points to
    Open { path: Route },
    /// Create or upgrade the database schema
    InitDb,
    /// Store the sample dashboard data
    Seed,
    /// Import interviews from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();
    let settings = cli.settings;

    match cli.command {
        Commands::InitDb => {
            let pool = connect(&settings).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect(&settings).await?;
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let pool = connect(&settings).await?;
            let counts = db::import_csv(&pool, &csv).await?;
            println!(
                "Imported interviews from {}: {} new, {} updated.",
                csv.display(),
                counts.inserted,
                counts.updated
            );
        }
        view => {
            let providers = build_providers(&settings).await?;
            render_view(view, &providers, &settings)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn render_view(
    command: Commands,
    providers: &Providers,
    settings: &Settings,
) -> anyhow::Result<()> {
    let ctx = view_context(settings);
    let page = match command {
        Commands::Home => Page::Home(HomePage::build()),
        Commands::Login { provider } => {
            let login = LoginPage::build();
            let Some(provider) = provider else {
                return emit(&Page::Login(login), providers, settings);
            };
            let identity = SessionIdentity::new(providers.session());
            let route = login.sign_in(&identity, provider);
            if route == Route::Login {
                tracing::warn!(
                    provider = provider.id(),
                    "sign-in declined; set IVY_SESSION_USER to sign in"
                );
            }
            return navigate(route, providers, ctx, settings);
        }
        Commands::Dashboard { activate } => {
            let dashboard = DashboardPage::build(providers, ctx)?;
            let Some(name) = activate else {
                return emit(&Page::Dashboard(dashboard), providers, settings);
            };
            return match dashboard.registry.activate(&name) {
                Some(ActionIntent::Navigate(route)) => navigate(route, providers, ctx, settings),
                Some(ActionIntent::Placeholder) => {
                    println!("`{name}` is not available yet.");
                    Ok(())
                }
                None => anyhow::bail!("no quick action named `{name}`"),
            };
        }
        Commands::Interviews {
            category,
            status,
            search,
        } => {
            let filter = InterviewFilter {
                category,
                status,
                search,
            };
            Page::Interviews(InterviewsPage::build(providers, ctx, filter))
        }
        Commands::Analytics { period } => Page::Analytics(AnalyticsPage::build(providers, period)),
        Commands::Open { path } => return navigate(path, providers, ctx, settings),
        Commands::InitDb | Commands::Seed | Commands::Import { .. } => {
            anyhow::bail!("database maintenance commands do not render a view")
        }
    };
    emit(&page, providers, settings)
}

fn view_context(settings: &Settings) -> ViewContext {
    ViewContext {
        locale: settings.locale,
        today: chrono::Local::now().date_naive(),
    }
}

async fn connect(settings: &Settings) -> anyhow::Result<PgPool> {
    let database_url = settings
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set to a Postgres instance")?;
    connect_url(database_url).await
}

async fn connect_url(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

async fn build_providers(settings: &Settings) -> anyhow::Result<Providers> {
    let source_kind = settings.source_kind();
    let snapshot = match &source_kind {
        SourceKind::Postgres(url) => {
            let pool = connect_url(url).await?;
            db::load_snapshot(&pool).await?
        }
        SourceKind::JsonFile(path) => Snapshot::from_json_file(path)?,
        SourceKind::Sample => Snapshot::sample()?,
    };
    tracing::info!(source = source_kind.label(), "dashboard data source ready");

    Ok(Providers::new(settings.theme, settings.session(), Box::new(snapshot)))
}

fn navigate(
    route: Route,
    providers: &Providers,
    ctx: ViewContext,
    settings: &Settings,
) -> anyhow::Result<()> {
    tracing::info!(path = route.path(), "navigating");
    match pages::open(route, providers, ctx)? {
        Some(page) => emit(&page, providers, settings),
        None => {
            println!("{route} is served outside the dashboard.");
            Ok(())
        }
    }
}

fn emit(page: &Page, providers: &Providers, settings: &Settings) -> anyhow::Result<()> {
    let rendered = match settings.format {
        OutputFormat::Json => serde_json::to_string_pretty(page)?,
        OutputFormat::Markdown => report::render_markdown(page, providers),
    };

    match &settings.out {
        Some(out) => {
            std::fs::write(out, rendered)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Page written to {}.", out.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
