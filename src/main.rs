//! The `kisp` binary: an interactive prompt, or an HTTP endpoint with `--serve`.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kisp::Result;
use kisp::genealogy::Genealogy;
use kisp::interface::QueryInterface;
use kisp::interpreter::Interpreter;
use kisp::kinship::KinshipDictionary;
use kisp::server;
use kisp::settings::Settings;

fn build_interpreter(settings: &Settings) -> Result<Interpreter> {
    let genealogy = match &settings.genealogy {
        Some(path) => Genealogy::load(path)?,
        None => Genealogy::default(),
    };
    info!(people = genealogy.people().len(), bonds = genealogy.bonds().len(), "genealogy loaded");
    let dictionary = KinshipDictionary::load(&settings.kinship_dictionary)?;
    let mut interpreter = Interpreter::new(genealogy, dictionary);
    if !settings.caching {
        interpreter.disable_caching();
    }
    if let Some(prelude) = &settings.prelude {
        if prelude.exists() {
            interpreter.exec_file(prelude)?;
        }
        else {
            warn!(path = %prelude.display(), "prelude not found");
        }
    }
    if let Some(ego) = &settings.ego {
        interpreter.exec(&format!("(define ego (person '{}'))", ego.replace('\'', "")))?;
    }
    Ok(interpreter)
}

async fn serve(interface: Arc<QueryInterface>, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(%bind, "serving POST /v1/query");
    axum::serve(listener, server::router(interface)).await?;
    Ok(())
}

fn repl(interface: &QueryInterface) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    write!(stdout, "kisp> ")?;
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let query = line.trim();
        match query {
            "" => {}
            "$quit" => break,
            "$time" => match interface.last_elapsed() {
                Some(elapsed) => writeln!(stdout, "{:.3} ms", elapsed.as_secs_f64() * 1000.0)?,
                None => writeln!(stdout, "nothing evaluated yet")?,
            },
            "$nocache" => {
                interface.with(|interpreter| interpreter.disable_caching())?;
                writeln!(stdout, "caching off")?;
            }
            "$cache" => {
                interface.with(|interpreter| interpreter.enable_caching())?;
                writeln!(stdout, "caching on")?;
            }
            "$expunge" => {
                interface.with(|interpreter| interpreter.expunge_cache())?;
                writeln!(stdout, "cache expunged")?;
            }
            "$size" => {
                let size = interface.with(|interpreter| interpreter.cache().len())?;
                writeln!(stdout, "{size} cached terms")?;
            }
            "$defs" => {
                for (name, term) in interface.with(|interpreter| interpreter.definitions())? {
                    writeln!(stdout, "{name} = {term}")?;
                }
            }
            _ => match interface.run(query) {
                Ok(outcome) => writeln!(stdout, "{} : {}", outcome.value.kind(), outcome.value.to_term())?,
                Err(failure) => writeln!(stdout, "{}", failure.error)?,
            },
        }
        write!(stdout, "kisp> ")?;
        stdout.flush()?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let settings = Settings::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)))
        .with_writer(io::stderr)
        .init();

    let interface = Arc::new(QueryInterface::new(build_interpreter(&settings)?));
    let serving = settings.server.enabled || std::env::args().any(|arg| arg == "--serve");
    if serving {
        tokio::runtime::Runtime::new()?.block_on(serve(interface, &settings.server.bind))
    }
    else {
        repl(&interface)
    }
}
