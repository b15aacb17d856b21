use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use brickken_api::{BrickkenClient, ClientConfig, Credentials};
use brickken_registry::{Catalog, build_clap, build_operation};
use brickken_types::{Environment, FieldKind, OperationSpec, RequestPlan};
use brickken_util::keystore;

#[tokio::main]
async fn main() -> Result<()> {
    let catalog = Catalog::builtin();
    let cli = with_auth_cli(build_clap(&catalog)).arg_required_else_help(true);
    let matches = cli.get_matches();
    init_tracing(matches.get_flag("verbose"));

    if let Some(("auth", sub)) = matches.subcommand() {
        return run_auth_cmd(sub).await;
    }

    run_operation(&catalog, &matches).await
}

fn init_tracing(verbose: bool) {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| if verbose { "debug".into() } else { "info".into() });
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn run_operation(catalog: &Catalog, matches: &ArgMatches) -> Result<()> {
    let (group, group_matches) = matches
        .subcommand()
        .context("expected a resource group subcommand")?;
    let (action, cmd_matches) = group_matches
        .subcommand()
        .context("expected an operation under the group")?;

    let spec = catalog
        .find(group, action)
        .with_context(|| format!("unknown operation '{group}:{action}'"))?;

    let values = collect_values(spec, cmd_matches);
    let operation = build_operation(&spec.name, &values)?;
    let plan = operation.request_plan()?;
    debug!(operation = %spec.name, method = %plan.method, path = %plan.path, "built request plan");

    let config = ClientConfig::load();
    let environment = config.effective_environment();

    if matches.get_flag("dry-run") {
        return print_dry_run(spec, &plan, environment);
    }

    let credentials = Credentials::discover(environment)?;
    let client = BrickkenClient::new(&credentials)?;
    let response = client.execute(&plan).await?;

    if matches.get_flag("json") {
        println!("{}", response.text);
    } else {
        match &response.json {
            Some(json) => println!("{}\n{}", response.status, serde_json::to_string_pretty(json)?),
            None => println!("{}\n{}", response.status, response.text),
        }
    }
    if !response.is_success() {
        bail!("{} returned status {}", spec.name, response.status);
    }
    Ok(())
}

/// Collect parsed argument values keyed by wire field name.
fn collect_values(spec: &OperationSpec, matches: &ArgMatches) -> IndexMap<String, Value> {
    let mut values = IndexMap::new();
    for field in &spec.fields {
        match field.kind {
            FieldKind::Array => {
                if let Some(items) = matches.get_many::<String>(&field.name) {
                    let items: Vec<Value> = items.map(|v| Value::String(v.clone())).collect();
                    values.insert(field.name.clone(), Value::Array(items));
                }
            }
            _ => {
                if let Some(value) = matches.get_one::<String>(&field.name) {
                    values.insert(field.name.clone(), Value::String(value.clone()));
                }
            }
        }
    }
    values
}

/// Print the request that would be sent, with sensitive values masked.
fn print_dry_run(
    spec: &OperationSpec,
    plan: &RequestPlan,
    environment: Environment,
) -> Result<()> {
    let base_url = std::env::var(brickken_api::API_BASE_ENV_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| environment.default_base_url().to_string());
    let url = plan
        .url(&base_url)
        .with_context(|| format!("invalid base URL '{base_url}'"))?;

    let mut rendered = serde_json::to_value(plan)?;
    redact_plan(spec, &mut rendered);
    let out = serde_json::json!({
        "environment": environment.to_string(),
        "url": url.to_string(),
        "plan": rendered,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Mask values of fields the catalog marks sensitive inside a serialized plan.
fn redact_plan(spec: &OperationSpec, rendered: &mut Value) {
    let sensitive: Vec<&str> = spec
        .fields
        .iter()
        .filter(|f| f.sensitive)
        .map(|f| f.name.as_str())
        .collect();
    if sensitive.is_empty() {
        return;
    }

    if let Some(body) = rendered.pointer_mut("/body/json").and_then(Value::as_object_mut) {
        for (key, value) in body.iter_mut() {
            if sensitive.contains(&key.as_str()) {
                *value = Value::String("<redacted>".into());
            }
        }
    }
    if let Some(parts) = rendered.pointer_mut("/body/multipart").and_then(Value::as_array_mut) {
        for part in parts {
            let is_sensitive = part
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| sensitive.contains(&name));
            if is_sensitive && let Some(value) = part.get_mut("value") {
                *value = serde_json::json!({ "text": "<redacted>" });
            }
        }
    }
    if let Some(query) = rendered.get_mut("query").and_then(Value::as_array_mut) {
        for pair in query {
            let is_sensitive = pair
                .get(0)
                .and_then(Value::as_str)
                .is_some_and(|name| sensitive.contains(&name));
            if is_sensitive && let Some(value) = pair.get_mut(1) {
                *value = Value::String("<redacted>".into());
            }
        }
    }
}

fn with_auth_cli(root: Command) -> Command {
    let auth = Command::new("auth")
        .about("Manage API credentials and environment")
        .subcommand(
            Command::new("login")
                .about("Store an API key in the OS keychain")
                .arg(
                    Arg::new("api-key")
                        .long("api-key")
                        .required(true)
                        .action(ArgAction::Set)
                        .help("Brickken API key"),
                )
                .arg(
                    Arg::new("environment")
                        .long("environment")
                        .action(ArgAction::Set)
                        .value_parser(clap::builder::PossibleValuesParser::new([
                            "sandbox",
                            "production",
                        ]))
                        .help("Also select this environment"),
                ),
        )
        .subcommand(Command::new("logout").about("Remove the stored API key"))
        .subcommand(Command::new("check").about("Verify the stored credentials against the API"))
        .subcommand(
            Command::new("env")
                .about("Show or set the selected environment")
                .arg(
                    Arg::new("environment")
                        .action(ArgAction::Set)
                        .value_parser(clap::builder::PossibleValuesParser::new([
                            "sandbox",
                            "production",
                        ]))
                        .help("Environment to select; prints the current one when omitted"),
                ),
        );
    root.subcommand(auth)
}

async fn run_auth_cmd(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("login", sub)) => {
            let key = sub
                .get_one::<String>("api-key")
                .context("--api-key is required")?;
            keystore::store_api_key(key)?;
            if let Some(raw) = sub.get_one::<String>("environment") {
                let mut config = ClientConfig::load();
                config.environment = raw.parse()?;
                config.save().context("write config file")?;
            }
            println!("API key stored; run 'brickken auth check' to verify it");
        }
        Some(("logout", _)) => {
            keystore::remove_api_key()?;
            println!("API key removed");
        }
        Some(("check", _)) => {
            let config = ClientConfig::load();
            let environment = config.effective_environment();
            let credentials = Credentials::discover(environment)?;
            let client = BrickkenClient::new(&credentials)?;
            let response = client.check_credentials().await?;
            if response.is_success() {
                println!("credentials OK ({environment}, status {})", response.status);
            } else {
                bail!(
                    "credential check against {environment} failed with status {}",
                    response.status
                );
            }
        }
        Some(("env", sub)) => {
            let mut config = ClientConfig::load();
            match sub.get_one::<String>("environment") {
                Some(raw) => {
                    let environment: Environment = raw.parse()?;
                    config.environment = environment;
                    config.save().context("write config file")?;
                    println!("environment set to {environment}");
                }
                None => println!("{}", config.effective_environment()),
            }
        }
        _ => bail!("available auth subcommands: login, logout, check, env"),
    }
    Ok(())
}
