use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::info;

use crate::{
    config::AppConfig,
    init_data::{self, schemas::InitDataParams, signature::KeyScheme},
};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionalField {
    StartParam,
    ChatType,
    ChatInstance,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Bare query string
    #[default]
    Raw,
    /// `{"initDataRaw": "..."}` request body
    Body,
}

/// Payload values. Anything not given falls back to the params file, then to
/// the reference sample.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamsArgs {
    /// JSON file with the init data params
    #[arg(long)]
    params_file: Option<PathBuf>,

    #[arg(long)]
    user_id: Option<i64>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    language_code: Option<String>,
    #[arg(long, action = ArgAction::Set)]
    is_premium: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    allows_write_to_pm: Option<bool>,

    #[arg(long, conflicts_with = "now")]
    auth_date: Option<String>,
    /// Stamp auth_date with the current time
    #[arg(long)]
    now: bool,

    #[arg(long)]
    start_param: Option<String>,
    #[arg(long)]
    chat_type: Option<String>,
    #[arg(long)]
    chat_instance: Option<String>,
    /// Leave an optional field out of the payload
    #[arg(long, value_enum)]
    omit: Vec<OptionalField>,
}

impl ParamsArgs {
    pub fn to_params(&self) -> anyhow::Result<InitDataParams> {
        let mut params = match &self.params_file {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read params file {}", path.display()))?;
                InitDataParams::from_json(&raw)?
            }
            None => InitDataParams::sample(),
        };

        let user = &mut params.user;
        if let Some(id) = self.user_id {
            user.id = id;
        }
        override_with(&mut user.first_name, &self.first_name);
        override_with(&mut user.last_name, &self.last_name);
        override_with(&mut user.username, &self.username);
        override_with(&mut user.language_code, &self.language_code);
        if let Some(is_premium) = self.is_premium {
            user.is_premium = is_premium;
        }
        if let Some(allows_write_to_pm) = self.allows_write_to_pm {
            user.allows_write_to_pm = allows_write_to_pm;
        }

        if self.now {
            params.auth_date = chrono::Utc::now().timestamp().to_string();
        }
        override_with(&mut params.auth_date, &self.auth_date);

        if self.start_param.is_some() {
            params.start_param = self.start_param.clone();
        }
        if self.chat_type.is_some() {
            params.chat_type = self.chat_type.clone();
        }
        if self.chat_instance.is_some() {
            params.chat_instance = self.chat_instance.clone();
        }

        for field in &self.omit {
            match field {
                OptionalField::StartParam => params.start_param = None,
                OptionalField::ChatType => params.chat_type = None,
                OptionalField::ChatInstance => params.chat_instance = None,
            }
        }

        Ok(params)
    }
}

fn override_with(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    params: ParamsArgs,

    #[arg(long, value_enum, default_value_t)]
    key_scheme: KeyScheme,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Action {
    /// Print signed init data, reading the token from BOT_TOKEN
    Generate(GenerateArgs),
    /// Print the data check string the signature is computed over
    DataCheckString(ParamsArgs),
}

/// Generates signed init data fixtures for testing backend validators
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct AppArgs {
    #[command(subcommand)]
    pub action: Action,
}

impl AppArgs {
    /// Runs the action and returns the text to print
    pub fn run(&self, config: &AppConfig) -> anyhow::Result<String> {
        match &self.action {
            Action::Generate(GenerateArgs {
                params,
                key_scheme,
                format,
            }) => {
                let bot_token = config.bot_token()?;
                let signed = init_data::generate(&params.to_params()?, bot_token, *key_scheme)?;

                info!(
                    "generated init data for POST with \"Content-Type: application/json\" and body {{\"initDataRaw\": \"...\"}}"
                );

                Ok(match format {
                    OutputFormat::Raw => signed.to_query_string(),
                    OutputFormat::Body => signed.to_request_body()?,
                })
            }
            Action::DataCheckString(params) => {
                let payload = init_data::fields::Payload::from_params(&params.to_params()?)?;

                Ok(init_data::signature::canonicalize(payload.fields()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envconfig::Envconfig;
    use std::collections::HashMap;

    const SAMPLE_HASH: &str = "e470d5238366d1e52e28e266f87aed2734a401bc1fe8fe4e3bf7d93e1107e3c9";

    fn config_with_token(token: Option<&str>) -> AppConfig {
        let mut vars = HashMap::new();
        if let Some(token) = token {
            vars.insert("BOT_TOKEN".to_string(), token.to_string());
        }
        AppConfig::init_from_hashmap(&vars).unwrap()
    }

    fn argv<'a>(args: &[&'a str]) -> Vec<&'a str> {
        let mut argv = vec!["init-data-mock"];
        argv.extend_from_slice(args);
        argv
    }

    fn run(args: &[&str], token: Option<&str>) -> anyhow::Result<String> {
        let args = AppArgs::try_parse_from(argv(args))?;
        args.run(&config_with_token(token))
    }

    #[test]
    fn test_generate_defaults_to_sample() {
        let output = run(&["generate"], Some("test_bot_token")).unwrap();

        assert!(output.starts_with("user=%257B%2522id%2522%253A99281932"));
        assert!(output.ends_with(&format!("&hash={SAMPLE_HASH}")));
    }

    #[test]
    fn test_generate_body_format() {
        let output = run(&["generate", "--format", "body"], Some("test_bot_token")).unwrap();

        let body: serde_json::Value = serde_json::from_str(&output).unwrap();
        let raw = body["initDataRaw"].as_str().unwrap();
        assert!(raw.ends_with(&format!("&hash={SAMPLE_HASH}")));
    }

    #[test]
    fn test_generate_without_token_names_variable() {
        let err = run(&["generate"], None).unwrap_err();

        assert!(
            err.to_string().contains("BOT_TOKEN"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_key_scheme_flag() {
        let output = run(
            &["generate", "--key-scheme", "web-app-data-keyed"],
            Some("test_bot_token"),
        )
        .unwrap();

        let expected = "&hash=de81b5e54c9fb20e82525e8b0d0238b56f3e67c881cee1526f81da5859e5c069";
        assert!(output.ends_with(expected));
    }

    #[test]
    fn test_data_check_string_needs_no_token() {
        let output = run(&["data-check-string", "--omit", "start-param"], None).unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[..3],
            [
                "auth_date=1716922846",
                "chat_instance=8428209589180549439",
                "chat_type=sender",
            ]
        );
        assert!(lines[3].starts_with("user="));
        assert!(!output.contains("start_param"));
    }

    #[test]
    fn test_overrides_apply_on_top_of_sample() {
        let args = AppArgs::try_parse_from([
            "init-data-mock",
            "data-check-string",
            "--first-name",
            "Ana",
            "--is-premium",
            "false",
            "--auth-date",
            "1700000000",
            "--chat-type",
            "private",
        ])
        .unwrap();
        let Action::DataCheckString(params) = &args.action else {
            panic!("parsed the wrong action");
        };

        let params = params.to_params().unwrap();

        assert_eq!(params.user.first_name, "Ana");
        assert!(!params.user.is_premium);
        assert_eq!(params.user.last_name, "Rogue");
        assert_eq!(params.auth_date, "1700000000");
        assert_eq!(params.chat_type.as_deref(), Some("private"));
    }

    #[test]
    fn test_now_conflicts_with_auth_date() {
        let result = AppArgs::try_parse_from(argv(&["generate", "--now", "--auth-date", "1"]));

        assert!(result.is_err());
    }

    #[test]
    fn test_now_stamps_current_time() {
        let before = chrono::Utc::now().timestamp();
        let params = ParamsArgs {
            now: true,
            ..Default::default()
        }
        .to_params()
        .unwrap();

        let stamped: i64 = params.auth_date.parse().unwrap();
        assert!(stamped >= before);
        assert!(stamped - before < 60);
    }

    #[test]
    fn test_params_file_with_overrides() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/sample_params.json");

        let output = run(&["generate", "--params-file", path], Some("test_bot_token")).unwrap();
        assert!(output.ends_with(&format!("&hash={SAMPLE_HASH}")));

        let output = run(
            &["generate", "--params-file", path, "--username", "other"],
            Some("test_bot_token"),
        )
        .unwrap();
        assert!(!output.ends_with(&format!("&hash={SAMPLE_HASH}")));
    }

    #[test]
    fn test_missing_params_file() {
        let args = ["generate", "--params-file", "does/not/exist.json"];

        let err = run(&args, Some("t")).unwrap_err();

        assert!(
            err.to_string().contains("does/not/exist.json"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let err = run(&["generate", "--username", ""], Some("test_bot_token")).unwrap_err();

        assert!(
            err.to_string().contains("username"),
            "unexpected error: {err}"
        );
    }
}
