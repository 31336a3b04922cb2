use clap::CommandFactory;
use std::io;
use std::path::PathBuf;

/// Writes wolcheck(1) and one page per subcommand into the directory given
/// as the first argument (default `man`).
fn main() -> io::Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));
    std::fs::create_dir_all(&out_dir)?;

    clap_mangen::generate_to(wolcheck::cli::Cli::command(), &out_dir)?;

    let mut pages: Vec<_> = std::fs::read_dir(&out_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    pages.sort();
    for page in pages {
        println!("Generated {}", page.display());
    }

    Ok(())
}
