pub mod session;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::{CliConfig, Command, SubmitArgs};

#[cfg(feature = "cli")]
mod cli_config {
    use crate::core::file_validator::extension_of;
    use crate::domain::model::FormValues;
    use crate::domain::ports::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::{Args, Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "expense-bills")]
    #[command(about = "Submit expense bills and list them from the command line")]
    pub struct CliConfig {
        #[arg(long, default_value = "http://localhost:5678")]
        pub api_endpoint: String,

        #[arg(long, default_value = "./session.json")]
        pub session_path: String,

        /// TOML configuration file; replaces the endpoint and session flags
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(long, default_value = "30")]
        pub timeout: u64,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Fill the new bill form, attach a file and submit it
        Submit(SubmitArgs),
        /// Show the bills listing
        List,
    }

    #[derive(Debug, Clone, Args)]
    pub struct SubmitArgs {
        /// Expense category label, e.g. "Transports"
        #[arg(long = "type")]
        pub expense_type: String,

        #[arg(long)]
        pub name: String,

        #[arg(long)]
        pub amount: String,

        /// Date as YYYY-MM-DD
        #[arg(long)]
        pub date: String,

        #[arg(long, default_value = "")]
        pub vat: String,

        #[arg(long, default_value = "")]
        pub pct: String,

        #[arg(long, default_value = "")]
        pub commentary: String,

        /// Receipt to attach (jpg, jpeg or png)
        #[arg(long)]
        pub file: Option<PathBuf>,

        /// Declared content type of the file; guessed from the extension when absent
        #[arg(long)]
        pub content_type: Option<String>,
    }

    impl SubmitArgs {
        pub fn form_values(&self) -> FormValues {
            FormValues {
                expense_type: self.expense_type.clone(),
                name: self.name.clone(),
                amount: self.amount.clone(),
                date: self.date.clone(),
                vat: self.vat.clone(),
                pct: self.pct.clone(),
                commentary: self.commentary.clone(),
            }
        }

        pub fn content_type_for(&self, file_name: &str) -> String {
            if let Some(content_type) = &self.content_type {
                return content_type.clone();
            }
            let guessed = match extension_of(file_name).as_deref() {
                Some("jpg") | Some("jpeg") => "image/jpeg",
                Some("png") => "image/png",
                Some("gif") => "image/gif",
                Some("pdf") => "application/pdf",
                _ => "application/octet-stream",
            };
            guessed.to_string()
        }
    }

    impl ConfigProvider for CliConfig {
        fn api_endpoint(&self) -> &str {
            &self.api_endpoint
        }

        fn session_path(&self) -> &str {
            &self.session_path
        }

        fn request_timeout_secs(&self) -> u64 {
            self.timeout
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_api_endpoint("api_endpoint", &self.api_endpoint)?;
            validation::validate_session_file("session_path", &self.session_path)?;
            validation::validate_timeout_secs("timeout", self.timeout)?;
            if let Command::Submit(args) = &self.command {
                validation::validate_expense_label("type", &args.expense_type)?;
                validation::validate_bill_name("name", &args.name)?;
                validation::validate_bill_date("date", &args.date)?;
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::utils::error::BillError;

        #[test]
        fn test_parse_submit_command() {
            let config = CliConfig::parse_from([
                "expense-bills",
                "--api-endpoint",
                "http://localhost:5678",
                "submit",
                "--type",
                "Transports",
                "--name",
                "Vol Paris Londres",
                "--amount",
                "348",
                "--date",
                "2022-03-01",
                "--file",
                "billet.png",
            ]);

            assert!(config.validate().is_ok());
            let Command::Submit(args) = &config.command else {
                panic!("expected submit command");
            };
            let values = args.form_values();
            assert_eq!(values.expense_type, "Transports");
            assert_eq!(values.pct, "");
            assert_eq!(args.content_type_for("billet.png"), "image/png");
            assert_eq!(args.content_type_for("billet.GIF"), "image/gif");
        }

        #[test]
        fn test_submit_rejects_unknown_type_and_bad_date() {
            let submit = |expense_type: &str, date: &str| {
                CliConfig::parse_from([
                    "expense-bills",
                    "submit",
                    "--type",
                    expense_type,
                    "--name",
                    "Hôtel Lyon",
                    "--amount",
                    "120",
                    "--date",
                    date,
                ])
            };

            assert!(submit("Hôtel et logement", "2022-03-01").validate().is_ok());

            let err = submit("Voyage", "2022-03-01").validate().unwrap_err();
            assert!(matches!(&err, BillError::InvalidFieldError { field, .. } if field == "type"));
            assert!(err.to_string().contains("Transports"));

            let err = submit("Transports", "01/03/2022").validate().unwrap_err();
            assert!(matches!(&err, BillError::InvalidFieldError { field, .. } if field == "date"));
            assert_ne!(err.exit_code(), 0);
        }

        #[test]
        fn test_invalid_endpoint_fails_validation() {
            let config = CliConfig::parse_from(["expense-bills", "--api-endpoint", "nope", "list"]);
            assert!(config.validate().is_err());
        }
    }
}
