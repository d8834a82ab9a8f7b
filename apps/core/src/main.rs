fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match quicklaunch_core::cli::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[quicklaunch-core] {error}");
            std::process::exit(2);
        }
    };

    if let Err(error) = quicklaunch_core::logging::init() {
        eprintln!("[quicklaunch-core] logging disabled: {error}");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(error) = quicklaunch_core::cli::run_with_output(options, &mut out) {
        eprintln!("[quicklaunch-core] {error}");
        std::process::exit(1);
    }
}
