fn main() {
    if let Err(e) = classcope_cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
