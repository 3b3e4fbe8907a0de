use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = deskmail::cli::Cli::parse();

    if let Err(err) = deskmail::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
