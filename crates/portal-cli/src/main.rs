mod logging;
mod ui;

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use portal_core::account::active_applications;
use portal_core::account::outstanding_totals;
use portal_core::account::ranked_insights;
use portal_core::account::SAMPLE_PAYMENTS;
use portal_core::catalog::result_summary;
use portal_core::catalog::search_visible;
use portal_core::catalog::visible_services;
use portal_core::catalog::Catalog;
use portal_core::catalog::Service;
use portal_core::catalog::ServicePlatform;
use portal_core::chat::ChatRole;
use portal_core::membership::dashboard_briefing;
use portal_core::membership::Membership;
use portal_core::membership::MembershipTier;
use portal_core::progress::StepStatus;
use portal_core::replay_transcript;
use portal_core::Config;
use portal_core::SessionOptions;
use portal_core::TranscriptStore;
use portal_core::UserAction;
use portal_exec::SessionDriver;
use portal_exec::Timings;
use portal_exec::Typewriter;
use tokio_util::sync::CancellationToken;

use crate::logging::LogTarget;

#[derive(Debug, Parser)]
#[command(name = "portal", version, about = "Chamber member portal assistant")]
struct Cli {
    /// Config file (defaults to <config dir>/portal/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the ESG application assistant.
    Chat {
        /// Start in renewal mode.
        #[arg(long)]
        renewal: bool,
        #[arg(long)]
        tier: Option<MembershipTier>,
        /// Do not write a transcript journal.
        #[arg(long)]
        no_journal: bool,
    },
    /// List the services a tier can see, or search them.
    Services {
        #[arg(long)]
        tier: Option<MembershipTier>,
        #[arg(long, short)]
        query: Option<String>,
        /// Only services on this platform (adc, tamm, affiliates).
        #[arg(long)]
        platform: Option<ServicePlatform>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show the membership card, account activity and the assistant briefing.
    Dashboard {
        #[arg(long)]
        tier: Option<MembershipTier>,
        /// Ask the assistant one question and print its reply.
        #[arg(long)]
        ask: Option<String>,
    },
    /// Replay a saved chat transcript.
    Transcript {
        path: PathBuf,
        /// List only the events recorded after this sequence number.
        #[arg(long)]
        since: Option<u64>,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let target = match cli.command {
        Command::Chat { .. } => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    let _log_guard = logging::init(target);

    let config = Config::load(cli.config.as_deref())?;
    let catalog = Catalog::builtin();
    for issue in catalog.validate() {
        tracing::warn!(issue, "service catalog inconsistency");
    }

    match cli.command {
        Command::Chat {
            renewal,
            tier,
            no_journal,
        } => {
            let options = SessionOptions {
                renewal: renewal || config.session.renewal,
                tier: tier.unwrap_or(config.member.tier),
            };
            let journal = config.session.journal && !no_journal;
            run_chat(&config, options, journal)
        }
        Command::Services {
            tier,
            query,
            platform,
            category,
            json,
        } => {
            let filter = ServiceFilter {
                tier: tier.unwrap_or(config.member.tier),
                query,
                platform,
                category,
            };
            print_services(&catalog, &filter, json)
        }
        Command::Dashboard { tier, ask } => {
            let tier = tier.unwrap_or(config.member.tier);
            run_dashboard(&config, &catalog, tier, ask)
        }
        Command::Transcript { path, since } => match since {
            Some(seq) => print_events_since(&path, seq),
            None => print_transcript(&path),
        },
    }
}

fn build_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .build()
}

fn run_chat(
    config: &Config,
    options: SessionOptions,
    journal: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = build_runtime()?;
    let _entered = runtime.enter();

    let mut driver = SessionDriver::new(options, Timings::from(&config.timing));
    if journal {
        match dirs::data_dir() {
            Some(data_dir) => {
                let store = TranscriptStore::open(TranscriptStore::session_path(&data_dir))?;
                driver = driver.with_journal(store);
            }
            None => tracing::warn!("no data directory, transcript journal disabled"),
        }
    }
    tracing::info!(
        renewal = options.renewal,
        tier = options.tier.label(),
        "chat session started"
    );

    let result = ui::run(&mut driver);
    driver.shutdown();
    result
}

struct ServiceFilter {
    tier: MembershipTier,
    query: Option<String>,
    platform: Option<ServicePlatform>,
    category: Option<String>,
}

/// Tier gate (and search, if any) first, then platform and category.
fn select_services<'a>(catalog: &'a Catalog, filter: &ServiceFilter) -> Vec<&'a Service> {
    let mut services: Vec<&Service> = match filter.query.as_deref() {
        Some(query) => search_visible(query, catalog, filter.tier).services,
        None => visible_services(catalog, filter.tier),
    };
    if let Some(platform) = filter.platform {
        let on_platform = catalog.by_platform(platform);
        services.retain(|service| on_platform.iter().any(|other| other.id == service.id));
    }
    if let Some(category) = filter.category.as_deref() {
        let in_category = catalog.by_category(category);
        services.retain(|service| in_category.iter().any(|other| other.id == service.id));
    }
    services
}

fn print_services(
    catalog: &Catalog,
    filter: &ServiceFilter,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tier = filter.tier;
    let services = select_services(catalog, filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&services)?);
        return Ok(());
    }

    println!("{} ({} membership)", result_summary(services.len()), tier.label());
    for service in services {
        let ai = if service.ai_enabled { " [AI]" } else { "" };
        println!(
            "  {:<34} {:<20} {}{}",
            service.name,
            service.platform.label(),
            service.category,
            ai
        );
    }
    Ok(())
}

fn run_dashboard(
    config: &Config,
    catalog: &Catalog,
    tier: MembershipTier,
    ask: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let membership = Membership::new(
        config.member.company_name.as_str(),
        config.member.member_id.as_str(),
        tier,
    );
    println!("{} ({})", membership.company_name, membership.member_id);
    println!(
        "  {} membership, {} until {}",
        membership.tier.label(),
        membership.status.label(),
        membership.valid_until
    );
    println!(
        "  {} services used this month, {} available",
        membership.services_used_this_month,
        visible_services(catalog, tier).len()
    );
    if membership.renewal_due_soon() {
        if let Some(days) = membership.days_until_renewal {
            println!("  Renewal due in {days} days");
        }
    }
    println!();
    print_account_activity();

    let runtime = build_runtime()?;
    let timings = Timings::from(&config.timing);
    let briefing = Typewriter::new(dashboard_briefing(&membership, catalog), timings.typewriter_tick);
    runtime.block_on(async {
        let mut printed = 0;
        let mut stdout = std::io::stdout();
        briefing
            .reveal(&CancellationToken::new(), |prefix| {
                let _ = write!(stdout, "{}", &prefix[printed..]);
                let _ = stdout.flush();
                printed = prefix.len();
            })
            .await;
        println!();
    });

    let Some(question) = ask else {
        return Ok(());
    };
    let replies = runtime.block_on(async {
        let options = SessionOptions {
            renewal: config.session.renewal,
            tier,
        };
        let mut driver = SessionDriver::new(options, timings);
        let before = driver.state().messages.len();
        driver.dispatch(UserAction::SubmitText(question));
        while driver.state().is_awaiting_reply() {
            if !driver.next_event().await {
                break;
            }
        }
        driver.shutdown();
        driver
            .state()
            .messages
            .iter()
            .skip(before)
            .filter(|message| message.role == ChatRole::Assistant)
            .flat_map(|message| message.content.to_lines())
            .collect::<Vec<_>>()
    });
    println!();
    for line in replies {
        println!("{line}");
    }
    Ok(())
}

fn print_account_activity() {
    let applications = active_applications();
    println!("Active Applications ({})", applications.len());
    for application in applications {
        println!(
            "  {:<26} {:<14} {:<22} updated {}",
            application.service,
            application.status.label(),
            application.department,
            application.updated_at
        );
    }
    println!();

    println!("Payments");
    for payment in &SAMPLE_PAYMENTS {
        println!(
            "  {:<42} {:>6} {} {:<8} due {}",
            payment.description,
            payment.amount,
            payment.currency,
            payment.status.label(),
            payment.due_date
        );
    }
    for (currency, total) in outstanding_totals() {
        println!("  Outstanding: {total} {currency}");
    }
    println!();

    println!("Insights");
    for insight in ranked_insights() {
        let priority = insight.priority.map_or("-", |priority| priority.label());
        println!("  [{priority}] {}: {}", insight.kind.label(), insight.text);
    }
    println!();
}

fn open_existing(path: &Path) -> Result<TranscriptStore, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("no transcript at {}", path.display()).into());
    }
    Ok(TranscriptStore::open(path)?)
}

fn print_events_since(path: &Path, seq: u64) -> Result<(), Box<dyn std::error::Error>> {
    let records = open_existing(path)?.load_since(seq)?;
    if records.is_empty() {
        println!("{}: nothing after #{seq}", path.display());
        return Ok(());
    }
    for record in records {
        let at = chrono::DateTime::from_timestamp_millis(record.ts_ms)
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        println!("#{:<5} {at}  {}", record.seq, record.event.summary());
    }
    Ok(())
}

fn print_transcript(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let records = open_existing(path)?.load()?;
    let Some(session) = replay_transcript(&records) else {
        println!("{}: no session recorded", path.display());
        return Ok(());
    };

    let mode = if session.renewal { "renewal" } else { "new application" };
    println!("{} | {} | {} records", session.tier, mode, records.len());
    for step in session.progress.steps() {
        let marker = match step.status {
            StepStatus::Completed => "●",
            StepStatus::Current => "➤",
            StepStatus::Upcoming => "○",
        };
        println!("  {marker} {}", step.title);
    }
    println!("  {}% complete", session.progress.percent_complete());
    if session.submitted {
        println!("  application submitted");
    }
    println!();

    for message in session.messages.iter() {
        let mut lines = message.content.to_lines().into_iter();
        if let Some(first) = lines.next() {
            println!("{:>9}: {first}", message.role.label());
        }
        for line in lines {
            println!("           {line}");
        }
    }

    if !session.documents.is_empty() {
        println!();
        println!("Documents");
        for document in &session.documents {
            let status = if document.analyzed { "analyzed" } else { "pending" };
            println!("  #{} {} ({status})", document.id, document.filename);
        }
    }
    Ok(())
}
