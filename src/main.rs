use anyhow::Context;
use clap::Parser;
use megasena_results::domain::ports::DocumentStore;
use megasena_results::utils::logger;
use megasena_results::{CliConfig, Command, DrawRecord, NumberSet, ResultsError, ResultsService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting megasena-results CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config.command);
    }

    let firebase = match config.firebase_config() {
        Ok(firebase) => firebase,
        Err(e) => exit_with(&e),
    };

    // 整個行程只建立一次，之後以參照往下傳
    let service = ResultsService::shared(&firebase);

    if let Err(e) = run(service, config.command).await {
        match e.downcast_ref::<ResultsError>() {
            Some(results_error) => exit_with(results_error),
            None => return Err(e),
        }
    }

    Ok(())
}

async fn run<S: DocumentStore>(service: &ResultsService<S>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::History { json } => {
            let draws = service.fetch_recent_draws().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&draws)?);
            } else {
                for draw in &draws {
                    println!("{}", summary_line(draw));
                }
            }
        }
        Command::Draw { id, contest, json } => {
            let found = match (&id, contest) {
                (_, Some(contest)) => service.get_draw_by_contest(contest).await?,
                (Some(id), None) => service.get_draw(id).await?,
                (None, None) => anyhow::bail!("Provide a draw id or --contest"),
            };
            match found {
                Some(draw) if json => println!("{}", serde_json::to_string_pretty(&draw)?),
                Some(draw) => println!("{}", summary_line(&draw)),
                None => match contest {
                    Some(contest) => anyhow::bail!("Contest {} not found", contest),
                    None => anyhow::bail!("Draw '{}' not found", id.unwrap_or_default()),
                },
            }
        }
        Command::Check {
            drawn,
            latest,
            contest,
            tickets,
        } => {
            let drawn = match (drawn, contest) {
                (_, Some(contest)) => contest_drawn_set(service, contest).await?,
                (Some(text), None) if !latest => NumberSet::from(text),
                _ => latest_drawn_set(service).await?,
            };
            let tickets: Vec<NumberSet> = tickets.into_iter().map(NumberSet::from).collect();

            let results = service.compute_matches(Some(&drawn), Some(&tickets));
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Stats { top, last } => {
            let stats = service.statistics(top, last).await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}

async fn latest_drawn_set<S: DocumentStore>(service: &ResultsService<S>) -> anyhow::Result<NumberSet> {
    let draws = service.fetch_recent_draws().await?;
    let latest = draws.first().context("No draws available")?;
    tracing::info!(
        "🎯 Checking against contest {} ({})",
        latest.contest().map(|c| c.to_string()).unwrap_or_else(|| "?".into()),
        latest.id
    );
    latest
        .drawn_set()
        .with_context(|| format!("Draw '{}' has no drawn numbers", latest.id))
}

async fn contest_drawn_set<S: DocumentStore>(
    service: &ResultsService<S>,
    contest: u64,
) -> anyhow::Result<NumberSet> {
    let draw = service
        .get_draw_by_contest(contest)
        .await?
        .with_context(|| format!("Contest {} not found", contest))?;
    tracing::info!("🎯 Checking against contest {} ({})", contest, draw.id);
    draw.drawn_set()
        .with_context(|| format!("Draw '{}' has no drawn numbers", draw.id))
}

fn summary_line(draw: &DrawRecord) -> String {
    let contest = draw
        .contest()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string());
    let date = draw
        .draw_date()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!("{:>6}  {}  {}  [{}]", contest, date, draw.numbers().join(" "), draw.id)
}

fn exit_with(e: &ResultsError) -> ! {
    tracing::error!("❌ {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}
