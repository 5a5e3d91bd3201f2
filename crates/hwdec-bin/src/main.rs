use clap::{Parser, Subcommand};
use hwdec_client::{lib_file_name, load, HwdecClient};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Print the backend descriptor exported by the plug-in
    Info,
    /// Explain a hardware layer status code the way the decoder logs it
    Explain {
        #[arg(allow_negative_numbers = true)]
        code: i32,
        #[arg(long, default_value = "failed to init hardware decoder")]
        message: String,
    },
}

#[derive(Parser)]
struct Cli {
    /// Plug-in library to load (defaults to HWDEC_LIB_PATH, then ./target/debug)
    #[arg(long)]
    lib: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

fn run(client: &HwdecClient, command: Command) {
    match command {
        Command::Info => {
            let backend = &client.backend;
            println!("api: {}", &*backend.api_name);
            println!("capability: {:?}", backend.hwdec_type);
            println!("image format: {:?}", backend.image_format);
        }
        Command::Explain { code, message } => {
            println!("{}", client.explain(&message, code));
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_lib_path = PathBuf::from("./target/debug").join(lib_file_name());
    let lib_path = cli.lib.clone().unwrap_or_else(|| {
        env::var("HWDEC_LIB_PATH")
            .map(PathBuf::from)
            .unwrap_or(default_lib_path)
    });

    let client = match load(&lib_path) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("failed to load {}: {}", lib_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    run(&client, cli.command);
    ExitCode::SUCCESS
}
