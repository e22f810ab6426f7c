#![forbid(unsafe_code)]

fn main() {
    setlist_harness::logging::init();
    if let Err(error) = setlist_harness::run_from_env() {
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
