use clap::{Parser, Subcommand};
use heartcure_core::Workflow;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "heartcure")]
#[command(author, version, about = "Diabetes, heart disease and Parkinson's prediction")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "heartcure.yaml", global = true)]
    pub config: String,

    /// Directory holding the model artifacts
    #[arg(short, long, env = "HEARTCURE_MODELS_DIR", global = true)]
    pub models_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve predictions over HTTP
    Serve {
        /// Listen address
        #[arg(short, long)]
        listen: Option<String>,

        /// Listen port
        #[arg(short = 'P', long)]
        port: Option<u16>,
    },

    /// Run a single prediction and print the diagnosis
    Predict {
        /// Workflow to run (diabetes, heart_disease, parkinsons)
        #[arg(short, long, value_parser = parse_workflow)]
        workflow: Workflow,

        /// Field value as KEY=VALUE; repeat for each field
        #[arg(long = "value", value_parser = parse_key_value)]
        values: Vec<(String, String)>,

        /// All values in field order, comma separated; leave a slot empty to use its default
        #[arg(long, value_delimiter = ',', conflicts_with = "values")]
        ordered: Option<Vec<String>>,
    },

    /// List workflows and their input fields
    Workflows,
}

fn parse_workflow(s: &str) -> Result<Workflow, String> {
    s.parse().map_err(|e: heartcure_core::Error| e.to_string())
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_predict_named() {
        let cli = Cli::try_parse_from([
            "heartcure",
            "predict",
            "--workflow",
            "heart-disease",
            "--value",
            "sex=1",
            "--value",
            "MDVP:Fo(Hz)=119.99",
        ])
        .unwrap();

        match cli.command {
            Commands::Predict {
                workflow, values, ..
            } => {
                assert_eq!(workflow, Workflow::HeartDisease);
                assert_eq!(values[0], ("sex".to_string(), "1".to_string()));
                assert_eq!(values[1], ("MDVP:Fo(Hz)".to_string(), "119.99".to_string()));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_predict_ordered() {
        let cli = Cli::try_parse_from([
            "heartcure",
            "--verbose",
            "predict",
            "-w",
            "diabetes",
            "--ordered",
            "2,120,,30,80,25,0.5,35",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Predict { ordered, .. } => {
                let ordered = ordered.unwrap();
                assert_eq!(ordered.len(), 8);
                assert_eq!(ordered[2], "");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_workflow() {
        assert!(Cli::try_parse_from(["heartcure", "predict", "-w", "cancer"]).is_err());
    }

    #[test]
    fn test_rejects_malformed_value() {
        assert!(Cli::try_parse_from([
            "heartcure",
            "predict",
            "-w",
            "diabetes",
            "--value",
            "Glucose"
        ])
        .is_err());
    }
}
