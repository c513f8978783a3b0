use reporter::ui::output;

fn main() {
    if let Err(err) = reporter::cli::run() {
        output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
