use std::io::{self, Read};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use tutorial_api::{ApiConfig, AppState};
use tutorial_auth::{
  AccessGate, DEFAULT_SESSION_TTL_SECS, InMemorySessionStore, MAX_SESSION_TTL_SECS,
  SqliteCredentialStore,
};
use tutorial_store::{NewTutorial, SqliteStore, Store};

const DEFAULT_LOG_FILTER: &str = "tutorial_cms=info,tutorial_api=info,tutorial_store=info";

/// Tutorial CMS - branching troubleshooting guides built in a graph editor
#[derive(Parser)]
#[command(name = "tutorial-cms")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.tutorial-cms)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Database URL (default: sqlite://<data-dir>/tutorials.db)
  #[arg(long, global = true)]
  database_url: Option<String>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the HTTP API
  Serve {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Session lifetime in seconds (1 to ten years)
    #[arg(
      long,
      default_value_t = DEFAULT_SESSION_TTL_SECS,
      value_parser = clap::value_parser!(i64).range(1..=MAX_SESSION_TTL_SECS)
    )]
    session_ttl_secs: i64,

    /// Editing interface link reported by /api/me
    #[arg(long, default_value = "/admin/")]
    admin_url: String,
  },

  /// Manage tutorials
  Tutorial {
    #[command(subcommand)]
    action: TutorialAction,
  },

  /// Manage editor accounts
  User {
    #[command(subcommand)]
    action: UserAction,
  },

  /// Compile a graph file and print the document (use - for stdin)
  Compile {
    /// Path to the editor graph JSON
    graph_file: PathBuf,
  },
}

#[derive(Subcommand)]
enum TutorialAction {
  /// Create an empty tutorial
  Create {
    #[arg(long)]
    title: String,

    /// Derived from the title when omitted
    #[arg(long)]
    slug: Option<String>,

    #[arg(long, default_value = "")]
    description: String,
  },

  /// List all tutorials
  List,
}

#[derive(Subcommand)]
enum UserAction {
  /// Create an account. The password is read from stdin when not given.
  Create {
    username: String,

    #[arg(long)]
    password: Option<String>,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".tutorial-cms"),
  };
  let database_url = cli.database_url;

  let rt = tokio::runtime::Runtime::new()?;

  match cli.command {
    Some(Commands::Serve {
      bind,
      session_ttl_secs,
      admin_url,
    }) => {
      let config = ApiConfig {
        admin_url,
        session_ttl_secs,
      };
      rt.block_on(serve(&data_dir, database_url, bind, config))
    }
    Some(Commands::Tutorial { action }) => rt.block_on(async {
      let store = open_store(&data_dir, database_url).await?;
      match action {
        TutorialAction::Create {
          title,
          slug,
          description,
        } => create_tutorial(&store, title, slug, description).await,
        TutorialAction::List => list_tutorials(&store).await,
      }
    }),
    Some(Commands::User { action }) => rt.block_on(async {
      let store = open_store(&data_dir, database_url).await?;
      match action {
        UserAction::Create { username, password } => {
          let password = match password {
            Some(password) => password,
            None => read_password_from_stdin()?,
          };
          create_user(&store, &username, &password).await
        }
      }
    }),
    Some(Commands::Compile { graph_file }) => compile_file(&graph_file),
    None => {
      println!("tutorial-cms - use --help to see available commands");
      Ok(())
    }
  }
}

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(io::stderr))
    .init();
}

async fn open_store(data_dir: &Path, database_url: Option<String>) -> Result<SqliteStore> {
  let url = match database_url {
    Some(url) => url,
    None => {
      std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory: {}", data_dir.display()))?;
      format!("sqlite://{}", data_dir.join("tutorials.db").display())
    }
  };

  let store = SqliteStore::connect(&url)
    .await
    .with_context(|| format!("failed to open database: {}", url))?;
  store.migrate().await.context("failed to run migrations")?;

  tracing::debug!(%url, "opened tutorial database");
  Ok(store)
}

async fn serve(
  data_dir: &Path,
  database_url: Option<String>,
  bind: SocketAddr,
  config: ApiConfig,
) -> Result<()> {
  let store = open_store(data_dir, database_url).await?;
  let credentials = SqliteCredentialStore::new(store.pool().clone());
  let sessions = InMemorySessionStore::with_ttl(chrono::Duration::seconds(config.session_ttl_secs));

  let gate = AccessGate::new(Arc::new(credentials), Arc::new(sessions));
  let state = AppState::new(Arc::new(store), gate, config);

  let listener = tokio::net::TcpListener::bind(bind)
    .await
    .with_context(|| format!("failed to bind {}", bind))?;

  tutorial_api::serve(listener, state)
    .await
    .context("server error")
}

async fn create_tutorial(
  store: &SqliteStore,
  title: String,
  slug: Option<String>,
  description: String,
) -> Result<()> {
  if title.trim().is_empty() {
    bail!("title must not be empty");
  }

  let tutorial = store
    .create_tutorial(&NewTutorial {
      title,
      slug,
      description,
    })
    .await
    .context("failed to create tutorial")?;

  println!("{}\t{}\t{}", tutorial.id, tutorial.slug, tutorial.title);
  Ok(())
}

async fn list_tutorials(store: &SqliteStore) -> Result<()> {
  let tutorials = store
    .list_tutorials()
    .await
    .context("failed to list tutorials")?;

  for tutorial in tutorials {
    let live = tutorial
      .live_revision
      .map(|r| format!("r{}", r))
      .unwrap_or_else(|| "-".to_string());
    println!("{}\t{}\t{}\t{}", tutorial.id, live, tutorial.slug, tutorial.title);
  }
  Ok(())
}

async fn create_user(store: &SqliteStore, username: &str, password: &str) -> Result<()> {
  if username.is_empty() || password.is_empty() {
    bail!("username and password must not be empty");
  }

  let credentials = SqliteCredentialStore::new(store.pool().clone());
  let user = credentials
    .create_user(username, password)
    .await
    .context("failed to create user")?;

  eprintln!("Created user: {}", user.username);
  Ok(())
}

fn compile_file(graph_file: &Path) -> Result<()> {
  let content = if graph_file == Path::new("-") {
    let mut input = String::new();
    io::stdin()
      .read_to_string(&mut input)
      .context("failed to read graph from stdin")?;
    input
  } else {
    std::fs::read_to_string(graph_file)
      .with_context(|| format!("failed to read graph file: {}", graph_file.display()))?
  };

  let graph: serde_json::Value = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse graph file: {}", graph_file.display()))?;

  let document = tutorial_compiler::compile_json(&graph).context("failed to compile graph")?;

  for target in document.dangling_targets() {
    eprintln!("warning: option points at missing step '{}'", target);
  }
  eprintln!("Compiled {} steps", document.len());

  println!("{}", serde_json::to_string_pretty(&document)?);
  Ok(())
}

fn read_password_from_stdin() -> Result<String> {
  let mut input = String::new();
  io::stdin()
    .read_line(&mut input)
    .context("failed to read password from stdin")?;
  Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn serve_ttl(args: &[&str]) -> Result<i64, clap::Error> {
    let mut argv = vec!["tutorial-cms", "serve"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv)?;
    match cli.command {
      Some(Commands::Serve {
        session_ttl_secs, ..
      }) => Ok(session_ttl_secs),
      _ => panic!("expected serve"),
    }
  }

  #[test]
  fn test_session_ttl_defaults_to_two_weeks() {
    assert_eq!(serve_ttl(&[]).unwrap(), DEFAULT_SESSION_TTL_SECS);
    assert_eq!(serve_ttl(&["--session-ttl-secs", "60"]).unwrap(), 60);
  }

  #[test]
  fn test_session_ttl_out_of_range_is_rejected() {
    assert!(serve_ttl(&["--session-ttl-secs", "0"]).is_err());
    assert!(serve_ttl(&["--session-ttl-secs", "-1"]).is_err());
    assert!(serve_ttl(&["--session-ttl-secs", "9223372036854775807"]).is_err());
  }
}
