use clap::Parser;
use expense_bills::config::session::read_token;
use expense_bills::config::toml_config::{LogFormat, TomlConfig};
use expense_bills::config::SubmitArgs;
use expense_bills::domain::model::{FileSelection, Route};
use expense_bills::domain::ports::ConfigProvider;
use expense_bills::utils::{logger, validation::Validate};
use expense_bills::{
    BillError, BillsPage, CliConfig, Command, FileChange, HistoryNavigator, HttpBillStore,
    LocalSessionStorage, NewBillController, NewBillForm, SubmitEvent,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let file_config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let verbose = cli.verbose || file_config.as_ref().is_some_and(|c| c.verbose());
    match file_config.as_ref().map(|c| c.log_format()) {
        Some(LogFormat::Json) => logger::init_json_logger(verbose),
        _ => logger::init_cli_logger(verbose),
    }

    tracing::info!("Starting expense-bills CLI");
    if verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let validation = match &file_config {
        Some(config) => config.validate().and_then(|_| cli.validate()),
        None => cli.validate(),
    };
    if let Err(e) = validation {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let provider: &dyn ConfigProvider = match &file_config {
        Some(config) => config,
        None => &cli,
    };

    if let Err(e) = run(&cli.command, provider).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn run(command: &Command, config: &dyn ConfigProvider) -> Result<(), BillError> {
    let session = LocalSessionStorage::from_file(config.session_path())?;
    let store = Arc::new(HttpBillStore::from_config(config)?.with_token(read_token(&session)));

    match command {
        Command::List => {
            println!("{}", BillsPage::new(store).render().await);
        }
        Command::Submit(args) => {
            let view = Arc::new(NewBillForm::from_values(&args.form_values()));
            let navigator = Arc::new(HistoryNavigator::starting_at(Route::NewBill));
            let controller =
                NewBillController::new(Arc::clone(&store), view, Arc::clone(&navigator), &session)?;

            attach_file(&controller, args).await?;

            let mut event = SubmitEvent::new();
            let pending = controller.on_submit(&mut event)?;

            // The process exits with main; let the background create finish first.
            if let Err(e) = pending.await {
                tracing::warn!("Background submission task failed: {}", e);
            }

            if navigator.current() == Some(Route::Bills) {
                println!("{}", BillsPage::new(store).render().await);
            }
        }
    }

    Ok(())
}

async fn attach_file(
    controller: &NewBillController<HttpBillStore, NewBillForm, HistoryNavigator>,
    args: &SubmitArgs,
) -> Result<(), BillError> {
    let Some(path) = &args.file else {
        return Ok(());
    };

    let file_name = path.to_string_lossy().to_string();
    let data = tokio::fs::read(path).await?;
    let selection = FileSelection::new(file_name.clone(), args.content_type_for(&file_name))
        .with_data(data);

    match controller.on_file_change(selection).await {
        FileChange::Uploaded(stored) => {
            println!("📎 {} -> {}", stored.file_name, stored.file_url);
        }
        FileChange::Rejected(message) | FileChange::UploadFailed(message) => {
            eprintln!("⚠️  {}", message);
        }
    }
    Ok(())
}
