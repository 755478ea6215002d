use clap::Parser;
use modlr_cli::{execute, Cli, Command, RunStatus};
use modlr_storage::{SqliteOptions, SqliteStore};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const USERS_CONFIG: &str = r#"
[persisters.default]
type = "sqlite"
parameters = { path = "app.db" }

[[models]]
type = "user"
collection = "users"
fields = [{ name = "email", type = "text" }, { name = "created", type = "datetime" }]

[[schema.indices]]
name = "by_email"
model_type = "user"
keys = [["email", 1]]
options = { unique = true }
"#;

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("modlr.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

fn cli(config: &Path, command: Command) -> Cli {
    Cli {
        config: config.to_path_buf(),
        verbose: false,
        command,
    }
}

fn run(cli: &Cli) -> (anyhow::Result<RunStatus>, String) {
    let mut out = Vec::new();
    let status = execute(cli, &mut out);
    (status, String::from_utf8(out).unwrap())
}

fn create_indices(model_type: Option<&str>) -> Command {
    Command::CreateIndices {
        model_type: model_type.map(str::to_string),
    }
}

// ── Argument parsing ────────────────────────────────────────────

#[test]
fn parses_subcommands_and_scope() {
    let cli = Cli::try_parse_from(["modlr", "--config", "x.toml", "create-indices", "user"]).unwrap();
    assert_eq!(cli.config, PathBuf::from("x.toml"));
    assert_eq!(cli.command.scope(), Some("user"));

    let cli = Cli::try_parse_from(["modlr", "create-schemata", "-v"]).unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.command, Command::CreateSchemata { model_type: None });
}

#[test]
fn empty_type_means_all_types() {
    let cli = Cli::try_parse_from(["modlr", "list-indices", ""]).unwrap();
    assert_eq!(cli.command.scope(), None);
}

#[test]
fn exit_codes() {
    assert_eq!(RunStatus::Success.exit_code(), 0);
    assert_eq!(RunStatus::ItemsFailed.exit_code(), 1);
    assert_eq!(modlr_cli::EXIT_FATAL, 2);
}

// ── create-indices ──────────────────────────────────────────────

#[test]
fn create_indices_prints_progress_and_creates_index() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, USERS_CONFIG);

    let (status, output) = run(&cli(&config, create_indices(None)));

    assert_eq!(status.unwrap(), RunStatus::Success);
    assert_eq!(
        output,
        "Creating 1 index for all types\n\
         \x20   Creating index by_email for model user ... created\n\
         Done!\n\
         1 created, 0 already existed, 0 failed\n"
    );

    let store = SqliteStore::open(&dir.path().join("app.db"), &SqliteOptions::default()).unwrap();
    assert!(store.index_exists("users_by_email").unwrap());
}

#[test]
fn second_run_reports_already_existing() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, USERS_CONFIG);
    let cli = cli(&config, create_indices(None));

    run(&cli).0.unwrap();
    let (status, output) = run(&cli);

    assert_eq!(status.unwrap(), RunStatus::Success);
    assert!(output.contains("by_email for model user ... already exists"));
    assert!(output.ends_with("0 created, 1 already existed, 0 failed\n"));
}

#[test]
fn scope_without_indices_runs_nothing() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, USERS_CONFIG);

    let (status, output) = run(&cli(&config, create_indices(Some("post"))));

    assert_eq!(status.unwrap(), RunStatus::Success);
    assert_eq!(
        output,
        "Creating 0 indices for model type \"post\"\nDone!\n0 created, 0 already existed, 0 failed\n"
    );
}

#[test]
fn failed_item_sets_status_and_others_still_run() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        &format!(
            "{USERS_CONFIG}
[[schema.indices]]
name = \"ttl\"
model_type = \"user\"
keys = [[\"created\", 1]]
options = {{ expire_after_seconds = 3600 }}

[[schema.indices]]
name = \"by_created\"
model_type = \"user\"
keys = [[\"created\", -1]]
"
        ),
    );

    let (status, output) = run(&cli(&config, create_indices(Some("user"))));

    assert_eq!(status.unwrap(), RunStatus::ItemsFailed);
    assert!(output.starts_with("Creating 3 indices for model type \"user\"\n"));
    assert!(output.contains(
        "index ttl for model user ... failed: option 'expire_after_seconds' is not supported by the sqlite persister"
    ));
    assert!(output.ends_with("2 created, 0 already existed, 1 failed\n"));

    let store = SqliteStore::open(&dir.path().join("app.db"), &SqliteOptions::default()).unwrap();
    assert!(store.index_exists("users_by_created").unwrap());
    assert!(!store.index_exists("users_ttl").unwrap());
}

#[test]
fn profiling_summary_follows_the_run() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        &USERS_CONFIG.replace(
            "parameters = { path = \"app.db\" }",
            "parameters = { path = \"app.db\", profiling = true }",
        ),
    );

    let (status, output) = run(&cli(&config, create_indices(None)));

    assert_eq!(status.unwrap(), RunStatus::Success);
    let last = output.lines().last().unwrap();
    assert!(last.starts_with("Persister default: "), "{last}");
    assert!(last.contains(" statements in "));
}

// ── create-schemata ─────────────────────────────────────────────

#[test]
fn create_schemata_creates_tables_for_all_models() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        &USERS_CONFIG.replace(
            "[[schema.indices]]",
            "[[models]]\ntype = \"post\"\ncollection = \"posts\"\n\n[[schema.indices]]",
        ),
    );

    let (status, output) = run(&cli(&config, Command::CreateSchemata { model_type: None }));

    assert_eq!(status.unwrap(), RunStatus::Success);
    assert_eq!(
        output,
        "Creating 2 schemata for all types\n\
         \x20   Creating schema for model user ... created\n\
         \x20   Creating schema for model post ... created\n\
         Done!\n\
         2 created, 0 already existed, 0 failed\n"
    );

    let store = SqliteStore::open(&dir.path().join("app.db"), &SqliteOptions::default()).unwrap();
    assert_eq!(store.table_columns("users").unwrap(), vec!["id", "email", "created"]);
    assert!(store.table_exists("posts").unwrap());
}

#[test]
fn create_schemata_for_unknown_type_fails_that_item() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, USERS_CONFIG);

    let (status, output) = run(&cli(
        &config,
        Command::CreateSchemata {
            model_type: Some("ghost".to_string()),
        },
    ));

    assert_eq!(status.unwrap(), RunStatus::ItemsFailed);
    assert!(output.contains("schema for model ghost ... failed: unknown model type: ghost"));
}

// ── list-indices ────────────────────────────────────────────────

#[test]
fn list_indices_is_read_only() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, USERS_CONFIG);

    let (status, output) = run(&cli(&config, Command::ListIndices { model_type: None }));

    assert_eq!(status.unwrap(), RunStatus::Success);
    assert_eq!(output, "user  by_email  [[\"email\",1]]  {\"unique\":true}\n");
    assert!(!dir.path().join("app.db").exists());
}

// ── Fatal configuration errors ──────────────────────────────────

#[test]
fn invalid_index_config_fails_before_opening_storage() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &USERS_CONFIG.replace("keys = [[\"email\", 1]]\n", ""));

    let (status, output) = run(&cli(&config, create_indices(None)));

    let err = status.unwrap_err();
    assert!(format!("{err:#}").contains("missing keys"), "{err:#}");
    assert!(output.is_empty());
    assert!(!dir.path().join("app.db").exists());
}

#[test]
fn unsupported_persister_type_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &USERS_CONFIG.replace("type = \"sqlite\"", "type = \"mongodb\""));

    let (status, _) = run(&cli(&config, create_indices(None)));

    let err = status.unwrap_err();
    assert!(format!("{err:#}").contains("the persister type \"mongodb\" is currently not supported"));
    assert!(!dir.path().join("app.db").exists());
}

#[test]
fn model_on_unconfigured_persister_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        &USERS_CONFIG.replace("collection = \"users\"", "collection = \"users\"\npersister = \"archive\""),
    );

    let (status, _) = run(&cli(&config, Command::CreateSchemata { model_type: None }));

    let err = status.unwrap_err();
    assert!(format!("{err:#}").contains("persister 'archive', which is not configured"));
}

#[test]
fn unknown_config_keys_are_rejected() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &format!("{USERS_CONFIG}\n[extra]\nvalue = 1\n"));

    let (status, _) = run(&cli(&config, Command::ListIndices { model_type: None }));

    assert!(status.is_err());
}

#[test]
fn missing_config_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let (status, _) = run(&cli(&dir.path().join("absent.toml"), create_indices(None)));

    let err = status.unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read configuration file"));
}
