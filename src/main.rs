use crossterm::style::Stylize;
use json_table::config::config::Config;
use json_table::data::data_view::DataView;
use json_table::services::{DataLoaderService, DataSource};
use json_table::state::AppState;
use json_table::table_display::render_to_string;
use json_table::ui::cell_renderer::CellRenderer;
use json_table::ui::table_renderer::build_render_state;
use std::path::PathBuf;

fn print_help() {
    println!("{}", "json-table - sortable, pinnable JSON table viewer".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  json-table [OPTIONS] [URL]");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}     - Load a local JSON file instead of the URL", "--file <PATH>".green());
    println!("  {}           - Print the table to stdout and exit", "--print".green());
    println!("  {} - Write a commented config file", "--generate-config".green());
    println!("  {}        - Show this help", "-h, --help".green());
    println!();
    println!("{}", "In the table:".yellow());
    println!("  {}       - Sort (ascending, descending, reset)", "Click header".green());
    println!("  {}  - Pin / unpin column", "Ctrl+Click header".green());
    println!("  {}                 - Full key list", "F1".green());
    println!();
}

struct Args {
    url: Option<String>,
    file: Option<PathBuf>,
    print: bool,
    generate_config: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args {
        url: None,
        file: None,
        print: false,
        generate_config: false,
        help: false,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "--print" => parsed.print = true,
            "--generate-config" => parsed.generate_config = true,
            "--file" => {
                let path = iter.next().ok_or("--file needs a path")?;
                parsed.file = Some(PathBuf::from(path));
            }
            other if other.starts_with("--") => return Err(format!("Unknown option: {}", other)),
            other => parsed.url = Some(other.to_string()),
        }
    }

    Ok(parsed)
}

fn generate_config() -> anyhow::Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, Config::create_default_with_comments())?;
    println!("Configuration file created at: {:?}", path);
    Ok(())
}

/// Load synchronously and print the rendered table. Returns false on a failed load.
fn print_table(config: &Config, source: DataSource) -> anyhow::Result<bool> {
    let cells = CellRenderer::new(&config.display)?;
    let view = DataView::with_default_sort_column(config.behavior.default_sort_column.clone());
    let mut state = AppState::new(view).with_sort_on_load(config.behavior.sort_on_load);

    let service = DataLoaderService::new(source.clone(), config.api.timeout());
    state.begin_load(&source.describe());
    state.finish_load(service.load());

    let output = render_to_string(&build_render_state(&state, &cells), cells.icons());
    match state.error() {
        Some(_) => {
            eprintln!("{}", output.red());
            Ok(false)
        }
        None => {
            println!("{}", output);
            Ok(true)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = match parse_args(&raw_args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e.red());
            print_help();
            std::process::exit(2);
        }
    };

    if args.help {
        print_help();
        return Ok(());
    }

    if args.generate_config {
        return generate_config();
    }

    json_table::utils::logging::init_tracing_with_dual_logging();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(target: "json-table", "Falling back to default config: {:#}", e);
            Config::default()
        }
    };

    let source = match (args.file, args.url) {
        (Some(path), _) => DataSource::File(path),
        (None, Some(url)) => DataSource::Url(url),
        (None, None) => DataSource::Url(config.api.url.clone()),
    };

    if args.print {
        if !print_table(&config, source)? {
            std::process::exit(1);
        }
        return Ok(());
    }

    if let Some(dual_logger) = json_table::utils::dual_logging::get_dual_logger() {
        eprintln!("📝 Debug logs will be written to:");
        eprintln!("   {}", dual_logger.log_path().display());
    }

    json_table::tui_app::run_tui(config, source)
}
